//! The server id can only be assigned once per process.

#[test]
#[should_panic(expected = "already set")]
fn second_set_server_id_panics() {
    uniqid::set_server_id(41);
    uniqid::set_server_id(42);
}
