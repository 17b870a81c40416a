//! An external address ending in `.0.0` maps to the reserved server id.

use std::net::Ipv4Addr;

use uniqid::{Error, StaticAddress};

#[test]
fn address_ending_in_zero_zero_is_rejected() {
    uniqid::set_address_source(StaticAddress(Ipv4Addr::new(172, 16, 0, 0)));
    assert_eq!(uniqid::try_get(), Err(Error::ReservedServerId));
    // Failed derivation leaves the id unset, so an explicit id still wins.
    assert_eq!(uniqid::server_id(), None);
    uniqid::set_server_id(3);
    assert_eq!(uniqid::get() >> 48, 3);
}
