use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::{
    error::{Error, Result},
    hex::nibble,
};

/// Parses a dotted-quad IPv4 address into its big-endian `u32`.
///
/// Returns `0` if `s` is not a valid dotted quad.
///
/// ```
/// assert_eq!(uniqid::inet_aton(b"10.0.1.2"), 0x0A00_0102);
/// assert_eq!(uniqid::inet_aton(b"10.0.1"), 0);
/// ```
#[must_use]
pub fn inet_aton(s: &[u8]) -> u32 {
    core::str::from_utf8(s)
        .ok()
        .and_then(|s| s.parse::<Ipv4Addr>().ok())
        .map_or(0, u32::from)
}

/// Converts an IPv4 (or IPv4-mapped IPv6) address to a `u32`.
///
/// Returns `0` for any other IPv6 address.
#[must_use]
pub fn ip_to_u32(ip: IpAddr) -> u32 {
    match ip {
        IpAddr::V4(v4) => u32::from(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(0, u32::from),
    }
}

/// Converts a big-endian `u32` to an IPv4 address.
#[must_use]
pub fn u32_to_ip(n: u32) -> Ipv4Addr {
    Ipv4Addr::from(n)
}

/// Derives a server identifier from the last two octets of `ip`.
///
/// ```
/// use std::net::Ipv4Addr;
///
/// assert_eq!(uniqid::server_id_from_ip(Ipv4Addr::new(10, 0, 1, 2)), 0x0102);
/// ```
#[must_use]
pub fn server_id_from_ip(ip: Ipv4Addr) -> u16 {
    let [_, _, hi, lo] = ip.octets();
    u16::from_be_bytes([hi, lo])
}

/// Renders an address as lowercase hex of its big-endian bytes.
///
/// Leading zero bytes are dropped, so `0.0.0.0` renders as an empty string.
///
/// ```
/// use std::net::{IpAddr, Ipv4Addr};
///
/// assert_eq!(uniqid::ip_to_hex(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1))), "c0a80001");
/// assert_eq!(uniqid::ip_to_hex(IpAddr::V4(Ipv4Addr::new(0, 0, 1, 2))), "0102");
/// ```
#[must_use]
pub fn ip_to_hex(ip: IpAddr) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let bytes: Vec<u8> = match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    };
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let mut out = String::with_capacity((bytes.len() - start) * 2);
    for &b in &bytes[start..] {
        out.push(char::from(DIGITS[usize::from(b >> 4)]));
        out.push(char::from(DIGITS[usize::from(b & 0x0F)]));
    }
    out
}

/// Parses the output of [`ip_to_hex`] back into an address.
///
/// Up to 4 bytes decode as IPv4 and 5 to 16 bytes as IPv6, in both cases
/// left-padded with zero bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] for odd-length input, non-hex characters,
/// or more than 16 bytes.
pub fn hex_to_ip(s: &str) -> Result<IpAddr> {
    let invalid = || Error::InvalidAddress {
        input: s.to_owned(),
    };
    let raw = s.as_bytes();
    if raw.len() % 2 != 0 || raw.len() > 32 {
        return Err(invalid());
    }
    let mut bytes = Vec::with_capacity(raw.len() / 2);
    for pair in raw.chunks_exact(2) {
        let hi = nibble(pair[0]).ok_or_else(invalid)?;
        let lo = nibble(pair[1]).ok_or_else(invalid)?;
        bytes.push((hi << 4) | lo);
    }

    if bytes.len() <= 4 {
        let mut octets = [0_u8; 4];
        octets[4 - bytes.len()..].copy_from_slice(&bytes);
        Ok(IpAddr::V4(Ipv4Addr::from(octets)))
    } else {
        let mut octets = [0_u8; 16];
        octets[16 - bytes.len()..].copy_from_slice(&bytes);
        Ok(IpAddr::V6(Ipv6Addr::from(octets)))
    }
}

/// Appends the textual form of `ip` to `dst`.
///
/// IPv4 renders as a dotted quad; IPv6 follows RFC 5952, compressing the
/// longest run of zero groups with `::`.
pub fn append_ip(ip: IpAddr, dst: &mut Vec<u8>) {
    let _ = write!(dst, "{ip}");
}
