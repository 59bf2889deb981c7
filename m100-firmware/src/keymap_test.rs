use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use m100_common::{
    globals,
    keycodes::{char_to_key, key_range},
    version::{BuildVersion, VERSION_INFO_PREFIX},
};

use crate::{
    layout::LayerStack,
    leds::LedEvent,
    mapper::macros::{KeyState, MacroHandler, MacroOutput},
    scan::{ScanKey, TimedScanKey},
};

use super::*;

extern crate std;
use std::vec::Vec;

type Channel = ReportChannel<NoopRawMutex, 1024>;

fn drain(channel: &Channel) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    while let Some(ev) = channel.try_receive() {
        events.push(ev);
    }
    events
}

fn setup(channel: &Channel) -> Model100Processor<'_, NoopRawMutex, 1024> {
    let processor = processor(channel, &Settings::default()).unwrap();
    drain(channel);
    processor
}

fn key(
    t: &mut Model100Processor<'_, NoopRawMutex, 1024>,
    row: u8,
    col: u8,
    down: bool,
    time: u64,
) {
    t.key_switch(TimedScanKey(ScanKey::new(row, col, down), time));
}

#[test]
fn every_base_position_is_bound() {
    assert_eq!(KEYMAP.dead_positions().count(), 0);
}

#[test]
fn symbol_layer_f1() {
    let mut stack = LayerStack::new();
    let f1_pos = pos(0, 1);
    assert_eq!(KEYMAP.resolve(f1_pos, &stack), Some(k(hid::N1)));

    stack.shift(SYMBOL, pos(3, 6));
    assert_eq!(KEYMAP.resolve(f1_pos, &stack), Some(k(hid::F1)));
    assert_eq!(
        KEYMAP.resolve(pos(1, 7), &stack),
        Some(k(hid::DELETE)),
        "thumb key on symbol layer"
    );
    assert_eq!(KEYMAP.resolve(pos(0, 7), &stack), Some(k(hid::LEFT_CONTROL)));

    stack.unshift(pos(3, 6));
    assert_eq!(KEYMAP.resolve(f1_pos, &stack), Some(k(hid::N1)));
}

#[test]
fn fn_f1_via_processor() {
    let channel = Channel::default();
    let mut t = setup(&channel);
    key(&mut t, 3, 9, true, 10);
    key(&mut t, 0, 1, true, 20);
    key(&mut t, 0, 1, false, 30);
    key(&mut t, 3, 9, false, 40);
    key(&mut t, 0, 1, true, 50);
    assert_eq!(
        drain(&channel),
        [
            KeyEvent::Basic(hid::F1 as u8, true),
            KeyEvent::Basic(hid::F1 as u8, false),
            KeyEvent::Basic(hid::N1 as u8, true),
        ]
    );
}

#[test]
fn backspace_control() {
    let channel = Channel::default();
    let mut t = setup(&channel);
    key(&mut t, 1, 7, true, 10);
    key(&mut t, 2, 1, true, 20);
    key(&mut t, 2, 1, false, 30);
    key(&mut t, 1, 7, false, 40);
    assert_eq!(
        drain(&channel),
        [
            KeyEvent::Basic(hid::LEFT_CONTROL as u8, true),
            KeyEvent::Basic(hid::A as u8, true),
            KeyEvent::Basic(hid::A as u8, false),
            KeyEvent::Basic(hid::LEFT_CONTROL as u8, false),
        ]
    );

    key(&mut t, 1, 7, true, 100);
    key(&mut t, 1, 7, false, 150);
    assert_eq!(
        drain(&channel),
        [
            KeyEvent::Basic(hid::BACKSPACE as u8, true),
            KeyEvent::Basic(hid::BACKSPACE as u8, false),
        ]
    );
}

#[test]
fn version_info_macro() {
    let MacroOutput::Text(segments) = VERSION_INFO.handle(KeyState::ToggledOn) else {
        panic!("expected text");
    };
    assert_eq!(segments[0], VERSION_INFO_PREFIX);
    assert_eq!(segments[0], "Keyboardio Model 100 - Firmware version ");
    assert_eq!(segments[1], BUILD_VERSION);
    assert!(BuildVersion::parse(BUILD_VERSION).is_some());
    assert_eq!(VERSION_INFO.handle(KeyState::ToggledOff), MacroOutput::None);
}

#[test]
fn version_info_typed() {
    let channel = Channel::default();
    let mut t = setup(&channel);
    key(&mut t, 3, 6, true, 10);
    key(&mut t, 0, 9, true, 20);
    assert!(!t.is_macro_running());
    let typed: Vec<KeyEvent> = drain(&channel)
        .into_iter()
        .filter(|e| matches!(e, KeyEvent::Basic(code, true) if (*code as u16) < key_range::MODIFIER_MIN))
        .collect();
    let expected = VERSION_INFO_PREFIX
        .chars()
        .chain(BUILD_VERSION.chars())
        .filter_map(char_to_key)
        .count();
    assert_eq!(typed.len(), expected);
    assert_eq!(typed[0], KeyEvent::Basic(hid::K as u8, true));
}

#[test]
fn arrow_macro() {
    let channel = Channel::default();
    let mut t = setup(&channel);
    key(&mut t, 0, 9, true, 10);
    key(&mut t, 0, 9, false, 20);
    assert_eq!(
        drain(&channel),
        [
            KeyEvent::Basic(hid::MINUS as u8, true),
            KeyEvent::Basic(hid::MINUS as u8, false),
            KeyEvent::Basic(hid::LEFT_SHIFT as u8, true),
            KeyEvent::Basic(hid::PERIOD as u8, true),
            KeyEvent::Basic(hid::PERIOD as u8, false),
            KeyEvent::Basic(hid::LEFT_SHIFT as u8, false),
        ]
    );
}

#[test]
fn toggle_protocol_combo() {
    let channel = Channel::default();
    let mut t = setup(&channel);
    key(&mut t, 3, 6, true, 10);
    key(&mut t, 2, 6, true, 20);
    key(&mut t, 3, 7, true, 30);
    let events = drain(&channel);
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == KeyEvent::ToggleProtocol)
            .count(),
        1
    );

    key(&mut t, 3, 7, false, 40);
    key(&mut t, 3, 7, true, 50);
    assert!(drain(&channel).contains(&KeyEvent::ToggleProtocol));
}

#[test]
fn toggle_leds_combo() {
    let channel = Channel::default();
    let mut t = setup(&channel);
    key(&mut t, 3, 6, true, 10);
    key(&mut t, 0, 0, true, 20);
    key(&mut t, 0, 6, true, 30);
    let events = drain(&channel);
    assert!(events.contains(&KeyEvent::Led(LedEvent::Enabled(false))));
}

#[test]
fn mouse_layer_lock() {
    let channel = Channel::default();
    let mut t = setup(&channel);
    key(&mut t, 0, 15, true, 10);
    key(&mut t, 0, 15, false, 20);
    key(&mut t, 1, 11, true, 30);
    key(&mut t, 2, 1, true, 40);
    key(&mut t, 0, 15, true, 50);
    key(&mut t, 0, 15, false, 60);
    key(&mut t, 2, 1, false, 70);
    key(&mut t, 2, 1, true, 80);
    assert_eq!(
        drain(&channel),
        [
            KeyEvent::Mouse(0, true),
            KeyEvent::Basic(hid::A as u8, true),
        ]
    );
}

#[test]
fn startup_uses_settings() {
    let channel = Channel::default();
    let mut settings = Settings::default();
    settings.set(globals::LED_EFFECT, 6).unwrap();
    let _t = processor(&channel, &settings).unwrap();
    assert_eq!(
        drain(&channel),
        [
            KeyEvent::Led(LedEvent::Brightness(160)),
            KeyEvent::Led(LedEvent::Effect(LedEffect::Rainbow)),
            KeyEvent::Led(LedEvent::Enabled(true)),
        ]
    );
}
