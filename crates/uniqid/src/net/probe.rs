use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::sync::OnceLock;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::{Error, Result};

/// Hosts dialed, in order, to discover the outbound interface address.
pub const DEFAULT_PROBE_TARGETS: [&str; 3] = ["google.com:80", "facebook.com:80", "msn.com:80"];

/// Something that can tell which IPv4 address this machine uses externally.
pub trait AddressSource {
    /// Resolves the external IPv4 address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalAddress`] when no address can be determined.
    fn resolve(&self) -> Result<Ipv4Addr>;
}

/// Discovers the local outbound IPv4 address by connecting a UDP socket.
///
/// `connect` on a UDP socket only selects a route; no packet is sent. The
/// socket's local address is then the address of the interface that would be
/// used to reach the target. Targets are tried in order until one succeeds.
#[derive(Clone, Debug)]
pub struct UdpProbe {
    targets: Vec<String>,
}

impl UdpProbe {
    /// Creates a probe over custom `host:port` targets.
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    /// The targets this probe dials, in order.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    fn probe(target: &str) -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect(target)?;
        Ok(socket.local_addr()?.ip())
    }
}

impl Default for UdpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TARGETS)
    }
}

impl AddressSource for UdpProbe {
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self), err))]
    fn resolve(&self) -> Result<Ipv4Addr> {
        let mut last_err = String::from("no probe targets configured");
        for target in &self.targets {
            match Self::probe(target) {
                Ok(IpAddr::V4(ip)) if !ip.is_unspecified() => return Ok(ip),
                Ok(ip) => last_err = format!("{target}: unusable local address {ip}"),
                Err(e) => last_err = format!("{target}: {e}"),
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(probe = %target, error = %last_err, "address probe failed");
        }
        Err(Error::ExternalAddress {
            reason: format!("dialed {:?}, last error: {last_err}", self.targets),
        })
    }
}

/// A fixed address, for configured deployments and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticAddress(pub Ipv4Addr);

impl AddressSource for StaticAddress {
    fn resolve(&self) -> Result<Ipv4Addr> {
        Ok(self.0)
    }
}

/// Returns the machine's outbound IPv4 address, probing
/// [`DEFAULT_PROBE_TARGETS`] on first success and caching the answer for the
/// rest of the process.
///
/// # Errors
///
/// Returns [`Error::ExternalAddress`] if every target fails. Failures are not
/// cached; a later call probes again.
pub fn external_ip() -> Result<Ipv4Addr> {
    static EXTERNAL_IP: OnceLock<Ipv4Addr> = OnceLock::new();
    if let Some(ip) = EXTERNAL_IP.get() {
        return Ok(*ip);
    }
    let ip = UdpProbe::default().resolve()?;
    Ok(*EXTERNAL_IP.get_or_init(|| ip))
}
