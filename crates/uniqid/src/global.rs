//! Process-wide ID generation.
//!
//! These functions share one [`AtomicUniqIdGenerator`] and one
//! [`ServerIdCell`] for the lifetime of the process. The server identifier is
//! either assigned with [`set_server_id`] before the first ID is generated, or
//! derived on first use from the last two octets of the machine's outbound
//! IPv4 address. The address comes from the [`AddressSource`] installed with
//! [`set_address_source`], or from [`external_ip`] when none is installed.
//!
//! Misconfiguration is fatal: assigning the server identifier twice, or
//! failing to derive one, panics with a diagnostic. The `try_*` variants
//! return the [`Error`] instead.
//!
//! For independent generators (tests, multi-tenant processes), construct an
//! [`AtomicUniqIdGenerator`] directly.

use std::sync::OnceLock;

use crate::{
    error::{Error, Result},
    generator::{AtomicUniqIdGenerator, ServerIdCell},
    hex,
    net::{AddressSource, external_ip, server_id_from_ip},
    time::SystemClock,
};

type DynAddressSource = Box<dyn AddressSource + Send + Sync>;

static SERVER_ID: ServerIdCell = ServerIdCell::new();
static GENERATOR: OnceLock<AtomicUniqIdGenerator> = OnceLock::new();
static ADDRESS_SOURCE: OnceLock<DynAddressSource> = OnceLock::new();

/// Installs the [`AddressSource`] used to derive the server identifier.
///
/// Only consulted when no server identifier was set explicitly. Must be called
/// before the first [`get`] / [`append`], and at most once.
///
/// ```no_run
/// use std::net::Ipv4Addr;
/// use uniqid::StaticAddress;
///
/// uniqid::set_address_source(StaticAddress(Ipv4Addr::new(10, 0, 1, 2)));
/// assert_eq!(uniqid::get() >> 48, 0x0102);
/// ```
///
/// # Panics
///
/// Panics if a source was already installed or the server identifier is
/// already in effect.
#[track_caller]
pub fn set_address_source<A>(source: A)
where
    A: AddressSource + Send + Sync + 'static,
{
    if let Err(e) = try_set_address_source(source) {
        fatal("set_address_source", &e);
    }
}

/// Fallible form of [`set_address_source`].
///
/// # Errors
///
/// - [`Error::ServerIdAlreadySet`] if the server identifier is already in
///   effect. The source would never be consulted.
/// - [`Error::AddressSourceAlreadySet`] if a source was installed before.
pub fn try_set_address_source<A>(source: A) -> Result<()>
where
    A: AddressSource + Send + Sync + 'static,
{
    if let Some(current) = SERVER_ID.get() {
        return Err(Error::ServerIdAlreadySet { current });
    }
    ADDRESS_SOURCE
        .set(Box::new(source))
        .map_err(|_| Error::AddressSourceAlreadySet)?;
    #[cfg(feature = "tracing")]
    tracing::debug!("address source installed");
    Ok(())
}

/// Assigns the process server identifier.
///
/// Must be called before the first [`get`] / [`append`], and at most once.
///
/// # Panics
///
/// Panics if the server identifier is already set (explicitly or lazily), or
/// if `id` is the reserved value `0`.
#[track_caller]
pub fn set_server_id(id: u16) {
    if let Err(e) = try_set_server_id(id) {
        fatal("set_server_id", &e);
    }
}

/// Fallible form of [`set_server_id`].
///
/// # Errors
///
/// - [`Error::ReservedServerId`] if `id` is `0`.
/// - [`Error::ServerIdAlreadySet`] if a server identifier is already in
///   effect.
pub fn try_set_server_id(id: u16) -> Result<()> {
    SERVER_ID.set(id)?;
    #[cfg(feature = "tracing")]
    tracing::info!(server_id = id, "server id assigned");
    Ok(())
}

/// Returns the process server identifier, if one has been assigned or derived.
pub fn server_id() -> Option<u16> {
    SERVER_ID.get()
}

/// Generates a fresh process-unique ID.
///
/// # Panics
///
/// Panics on the first call if no server identifier was set and none can be
/// derived from the external address (see [`set_address_source`]).
#[track_caller]
#[inline]
pub fn get() -> u64 {
    match try_get() {
        Ok(id) => id,
        Err(e) => fatal("get", &e),
    }
}

/// Fallible form of [`get`].
///
/// # Errors
///
/// Returns [`Error::ExternalAddress`] (or [`Error::ReservedServerId`] when the
/// address ends in `.0.0`) if the server identifier has to be derived and
/// derivation fails. A later call retries the derivation.
#[inline]
pub fn try_get() -> Result<u64> {
    Ok(generator()?.next_id().to_raw())
}

/// Generates a fresh ID and appends its 16 hex characters to `dst`.
///
/// # Panics
///
/// See [`get`].
#[track_caller]
pub fn append(dst: &mut Vec<u8>) {
    hex::append_hex(get(), dst);
}

#[inline]
fn generator() -> Result<&'static AtomicUniqIdGenerator> {
    if let Some(generator) = GENERATOR.get() {
        return Ok(generator);
    }
    let server_id = SERVER_ID.get_or_try_init(derive_server_id)?;
    Ok(GENERATOR.get_or_init(|| AtomicUniqIdGenerator::new(server_id, &SystemClock)))
}

fn derive_server_id() -> Result<u16> {
    let ip = match ADDRESS_SOURCE.get() {
        Some(source) => source.resolve()?,
        None => external_ip()?,
    };
    let server_id = server_id_from_ip(ip);
    #[cfg(feature = "tracing")]
    tracing::info!(%ip, server_id, "server id derived from external address");
    Ok(server_id)
}

#[cold]
#[track_caller]
fn fatal(op: &str, err: &Error) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(op, error = %err, "fatal uniqid misconfiguration");
    panic!("uniqid::{op}: {err}");
}
