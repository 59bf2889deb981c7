use crate::keycodes;

pub fn kc(name: &str) -> u16 {
    match keycodes::key_code(name) {
        Some(kc) => kc,
        None => panic!("Unknown key name: {name:?}"),
    }
}

#[test]
fn kc_lookup() {
    assert_eq!(kc("a"), 4);
    assert_eq!(kc("LeftShift"), 0xe1);
}
