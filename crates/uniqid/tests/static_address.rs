//! Server id derived through an installed `StaticAddress`.

use std::net::Ipv4Addr;

use uniqid::{Error, StaticAddress, UniqId};

#[test]
fn derives_server_id_from_installed_address() {
    uniqid::set_address_source(StaticAddress(Ipv4Addr::new(10, 20, 1, 2)));
    assert_eq!(uniqid::server_id(), None);

    let first = UniqId::from_raw(uniqid::get());
    let second = UniqId::from_raw(uniqid::get());
    assert_eq!(first.server_id(), (1 << 8) | 2);
    assert_eq!(second.server_id(), 0x0102);
    assert_eq!(second.sequence(), first.sequence() + 1);
    assert_eq!(uniqid::server_id(), Some(0x0102));

    // The derived id is now fixed.
    assert_eq!(
        uniqid::try_set_address_source(StaticAddress(Ipv4Addr::new(10, 20, 3, 4))),
        Err(Error::ServerIdAlreadySet { current: 0x0102 })
    );
    assert_eq!(
        uniqid::try_set_server_id(5),
        Err(Error::ServerIdAlreadySet { current: 0x0102 })
    );
}
