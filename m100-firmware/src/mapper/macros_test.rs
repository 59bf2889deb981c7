use m100_common::keycodes::hid;

use super::*;

extern crate std;
use std::vec::Vec;

fn keys(output: MacroOutput<'_>) -> Vec<KeyPlusMod> {
    let mut run = MacroRun::new(output).unwrap();
    let mut keys = Vec::new();
    while let Some(k) = run.next_key() {
        keys.push(k);
    }
    keys
}

#[test]
fn arrow_text() {
    let arrow = TypeText(&["->"]);
    assert_eq!(arrow.handle(KeyState::Held), MacroOutput::None);
    assert_eq!(arrow.handle(KeyState::ToggledOff), MacroOutput::None);
    assert_eq!(
        keys(arrow.handle(KeyState::ToggledOn)),
        [
            KeyPlusMod::new(hid::MINUS, 0),
            KeyPlusMod::new(hid::PERIOD, modifiers::LEFT_SHIFT)
        ]
    );
}

#[test]
fn version_info() {
    let v = VersionInfo::new("v1.2*::abc");
    let MacroOutput::Text(segments) = v.handle(KeyState::ToggledOn) else {
        panic!("expected text");
    };
    assert_eq!(segments, ["Keyboardio Model 100 - Firmware version ", "v1.2*::abc"]);

    let typed = keys(v.handle(KeyState::ToggledOn));
    assert_eq!(typed[0], KeyPlusMod::new(hid::K, modifiers::LEFT_SHIFT));
    assert_eq!(typed[1], KeyPlusMod::new(hid::E, 0));
    assert_eq!(
        typed[typed.len() - 6..],
        [
            KeyPlusMod::new(hid::N8, modifiers::LEFT_SHIFT),
            KeyPlusMod::new(hid::SEMICOLON, modifiers::LEFT_SHIFT),
            KeyPlusMod::new(hid::SEMICOLON, modifiers::LEFT_SHIFT),
            KeyPlusMod::new(hid::A, 0),
            KeyPlusMod::new(hid::B, 0),
            KeyPlusMod::new(hid::C, 0),
        ]
    );
    assert_eq!(v.handle(KeyState::ToggledOff), MacroOutput::None);
}

#[test]
fn unmapped_chars_skipped() {
    assert_eq!(
        keys(MacroOutput::Text(&["", "a\u{e9}b", ""])),
        [KeyPlusMod::new(hid::A, 0), KeyPlusMod::new(hid::B, 0)]
    );
    assert!(MacroRun::new(MacroOutput::None).is_none());
}

#[test]
fn key_list() {
    let list = [
        KeyPlusMod::new(hid::F1, modifiers::LEFT_CONTROL),
        KeyPlusMod::new(hid::ENTER, 0),
    ];
    assert_eq!(keys(MacroOutput::Keys(&list)), list);
}

#[test]
fn registry() {
    let arrow = TypeText(&["->"]);
    let mut registry = MacroRegistry::default();
    registry.register(1, &arrow).unwrap();
    assert_eq!(registry.register(1, &arrow), Err(RegistryError::Duplicate));

    assert!(matches!(
        registry.get(1).handle(KeyState::ToggledOn),
        MacroOutput::Text(_)
    ));
    assert_eq!(
        registry.get(9).handle(KeyState::ToggledOn),
        MacroOutput::None
    );

    for id in 2..MACRO_MAX_NUM as u8 + 1 {
        registry.register(id, &arrow).unwrap();
    }
    assert_eq!(registry.register(200, &arrow), Err(RegistryError::Full));
}
