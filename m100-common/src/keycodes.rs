pub mod key_range {
    pub const BASIC_MIN: u16 = 0x4;
    pub const BASIC_A: u16 = 0x4;
    pub const BASIC_1: u16 = 0x1e;
    pub const BASIC_0: u16 = 0x27;
    pub const BASIC_MAX: u16 = 0xfe;
    pub const MODIFIER_MIN: u16 = 0xe0;
    pub const MODIFIER_MAX: u16 = 0xe7;
    pub const CONSUMER_MIN: u16 = 0x100;
    pub const CONSUMER_MAX: u16 = 0x3a0;
    pub const SYS_CTL_MIN: u16 = 0x3a1;
    pub const SYS_CTL_MAX: u16 = 0x3d5;
    pub const MOUSE_MIN: u16 = 0x400;
    pub const MOUSE_MAX: u16 = MOUSE_MIN + 0xff;

    pub const FIRMWARE_MIN: u16 = 0x2000;
    pub const FIRMWARE_MAX: u16 = FIRMWARE_MIN + 0xff;

    pub const FW_LED_NEXT: u16 = FIRMWARE_MIN;
    pub const FW_LED_PREV: u16 = FIRMWARE_MIN + 1;
    pub const FW_LED_TOGGLE: u16 = FIRMWARE_MIN + 2;

    pub const MOUSE_BUTTON: u16 = 0;
    pub const MOUSE_BUTTON_END: u16 = 7;
    pub const MOUSE_DELTA: u16 = MOUSE_BUTTON_END + 1;
    pub const MOUSE_DELTA_END: u16 = MOUSE_DELTA + 7;

    pub const SYS_CTL_BASE: u16 = 0x81;
}

/// Keyboard page usages (and the extended code ranges) used by the keymap.
pub mod hid {
    use super::key_range::{CONSUMER_MIN, FW_LED_NEXT, FW_LED_PREV, FW_LED_TOGGLE, MOUSE_MIN};

    pub const A: u16 = 0x04;
    pub const B: u16 = 0x05;
    pub const C: u16 = 0x06;
    pub const D: u16 = 0x07;
    pub const E: u16 = 0x08;
    pub const F: u16 = 0x09;
    pub const G: u16 = 0x0a;
    pub const H: u16 = 0x0b;
    pub const I: u16 = 0x0c;
    pub const J: u16 = 0x0d;
    pub const K: u16 = 0x0e;
    pub const L: u16 = 0x0f;
    pub const M: u16 = 0x10;
    pub const N: u16 = 0x11;
    pub const O: u16 = 0x12;
    pub const P: u16 = 0x13;
    pub const Q: u16 = 0x14;
    pub const R: u16 = 0x15;
    pub const S: u16 = 0x16;
    pub const T: u16 = 0x17;
    pub const U: u16 = 0x18;
    pub const V: u16 = 0x19;
    pub const W: u16 = 0x1a;
    pub const X: u16 = 0x1b;
    pub const Y: u16 = 0x1c;
    pub const Z: u16 = 0x1d;
    pub const N1: u16 = 0x1e;
    pub const N2: u16 = 0x1f;
    pub const N3: u16 = 0x20;
    pub const N4: u16 = 0x21;
    pub const N5: u16 = 0x22;
    pub const N6: u16 = 0x23;
    pub const N7: u16 = 0x24;
    pub const N8: u16 = 0x25;
    pub const N9: u16 = 0x26;
    pub const N0: u16 = 0x27;
    pub const ENTER: u16 = 0x28;
    pub const ESCAPE: u16 = 0x29;
    pub const BACKSPACE: u16 = 0x2a;
    pub const TAB: u16 = 0x2b;
    pub const SPACE: u16 = 0x2c;
    pub const MINUS: u16 = 0x2d;
    pub const EQUALS: u16 = 0x2e;
    pub const LEFT_BRACKET: u16 = 0x2f;
    pub const RIGHT_BRACKET: u16 = 0x30;
    pub const BACKSLASH: u16 = 0x31;
    pub const SEMICOLON: u16 = 0x33;
    pub const QUOTE: u16 = 0x34;
    pub const BACKTICK: u16 = 0x35;
    pub const COMMA: u16 = 0x36;
    pub const PERIOD: u16 = 0x37;
    pub const SLASH: u16 = 0x38;
    pub const CAPS_LOCK: u16 = 0x39;
    pub const F1: u16 = 0x3a;
    pub const F2: u16 = 0x3b;
    pub const F3: u16 = 0x3c;
    pub const F4: u16 = 0x3d;
    pub const F5: u16 = 0x3e;
    pub const F6: u16 = 0x3f;
    pub const F7: u16 = 0x40;
    pub const F8: u16 = 0x41;
    pub const F9: u16 = 0x42;
    pub const F10: u16 = 0x43;
    pub const F11: u16 = 0x44;
    pub const F12: u16 = 0x45;
    pub const PRINT_SCREEN: u16 = 0x46;
    pub const SCROLL_LOCK: u16 = 0x47;
    pub const PAUSE: u16 = 0x48;
    pub const INSERT: u16 = 0x49;
    pub const HOME: u16 = 0x4a;
    pub const PAGE_UP: u16 = 0x4b;
    pub const DELETE: u16 = 0x4c;
    pub const END: u16 = 0x4d;
    pub const PAGE_DOWN: u16 = 0x4e;
    pub const RIGHT_ARROW: u16 = 0x4f;
    pub const LEFT_ARROW: u16 = 0x50;
    pub const DOWN_ARROW: u16 = 0x51;
    pub const UP_ARROW: u16 = 0x52;
    pub const APPLICATION: u16 = 0x65;

    pub const LEFT_CONTROL: u16 = 0xe0;
    pub const LEFT_SHIFT: u16 = 0xe1;
    pub const LEFT_ALT: u16 = 0xe2;
    pub const LEFT_GUI: u16 = 0xe3;
    pub const RIGHT_CONTROL: u16 = 0xe4;
    pub const RIGHT_SHIFT: u16 = 0xe5;
    pub const RIGHT_ALT: u16 = 0xe6;
    pub const RIGHT_GUI: u16 = 0xe7;

    pub const MEDIA_NEXT: u16 = CONSUMER_MIN + 0xb5;
    pub const MEDIA_PREVIOUS: u16 = CONSUMER_MIN + 0xb6;
    pub const MEDIA_STOP: u16 = CONSUMER_MIN + 0xb7;
    pub const MEDIA_PLAY_PAUSE: u16 = CONSUMER_MIN + 0xcd;
    pub const MUTE: u16 = CONSUMER_MIN + 0xe2;
    pub const VOLUME_UP: u16 = CONSUMER_MIN + 0xe9;
    pub const VOLUME_DOWN: u16 = CONSUMER_MIN + 0xea;

    pub const MOUSE_BUTTON_LEFT: u16 = MOUSE_MIN;
    pub const MOUSE_BUTTON_RIGHT: u16 = MOUSE_MIN + 1;
    pub const MOUSE_BUTTON_MIDDLE: u16 = MOUSE_MIN + 2;
    pub const MOUSE_UP: u16 = MOUSE_MIN + 8;
    pub const MOUSE_DOWN: u16 = MOUSE_MIN + 9;
    pub const MOUSE_LEFT: u16 = MOUSE_MIN + 10;
    pub const MOUSE_RIGHT: u16 = MOUSE_MIN + 11;
    pub const MOUSE_WHEEL_UP: u16 = MOUSE_MIN + 12;
    pub const MOUSE_WHEEL_DOWN: u16 = MOUSE_MIN + 13;
    pub const MOUSE_WHEEL_LEFT: u16 = MOUSE_MIN + 14;
    pub const MOUSE_WHEEL_RIGHT: u16 = MOUSE_MIN + 15;

    pub const LED_NEXT: u16 = FW_LED_NEXT;
    pub const LED_PREV: u16 = FW_LED_PREV;
    pub const LED_TOGGLE: u16 = FW_LED_TOGGLE;
}

/// Modifier bit masks as they appear in the HID boot report modifier byte.
pub mod modifiers {
    pub const LEFT_CONTROL: u8 = 1;
    pub const LEFT_SHIFT: u8 = 1 << 1;
    pub const LEFT_ALT: u8 = 1 << 2;
    pub const LEFT_GUI: u8 = 1 << 3;
    pub const RIGHT_CONTROL: u8 = 1 << 4;
    pub const RIGHT_SHIFT: u8 = 1 << 5;
    pub const RIGHT_ALT: u8 = 1 << 6;
    pub const RIGHT_GUI: u8 = 1 << 7;
}

const SHIFTED_PAIRS: &[u8] = br#"`~-_=+[{]}\|;:'",<.>/?1!2@3#4$5%6^7&8*9(0)"#;

/// Map a printable character to the key that types it on a US layout and whether shift is needed.
///
/// ```
/// use m100_common::keycodes::{char_to_key, hid};
/// assert_eq!(char_to_key('>'), Some((hid::PERIOD, true)));
/// assert_eq!(char_to_key('-'), Some((hid::MINUS, false)));
/// ```
pub fn char_to_key(c: char) -> Option<(u16, bool)> {
    Some(match c {
        'a'..='z' => (hid::A + (c as u16 - 'a' as u16), false),
        'A'..='Z' => (hid::A + (c as u16 - 'A' as u16), true),
        '1'..='9' => (key_range::BASIC_1 + (c as u16 - '1' as u16), false),
        '0' => (key_range::BASIC_0, false),
        ' ' => (hid::SPACE, false),
        '\n' => (hid::ENTER, false),
        '\t' => (hid::TAB, false),
        c if c.is_ascii() => {
            let b = c as u8;
            let i = SHIFTED_PAIRS.iter().position(|p| *p == b)?;
            let base = SHIFTED_PAIRS[i & !1] as char;
            let shift = i & 1 == 1;
            let code = match base {
                '1'..='9' | '0' => return char_to_key(base).map(|(k, _)| (k, shift)),
                '`' => hid::BACKTICK,
                '-' => hid::MINUS,
                '=' => hid::EQUALS,
                '[' => hid::LEFT_BRACKET,
                ']' => hid::RIGHT_BRACKET,
                '\\' => hid::BACKSLASH,
                ';' => hid::SEMICOLON,
                '\'' => hid::QUOTE,
                ',' => hid::COMMA,
                '.' => hid::PERIOD,
                '/' => hid::SLASH,
                _ => return None,
            };
            (code, shift)
        }
        _ => return None,
    })
}

/// Names accepted by the config tool, in keymap order of appearance.
pub const KEY_NAMES: &[(&str, u16)] = &[
    ("A", hid::A),
    ("B", hid::B),
    ("C", hid::C),
    ("D", hid::D),
    ("E", hid::E),
    ("F", hid::F),
    ("G", hid::G),
    ("H", hid::H),
    ("I", hid::I),
    ("J", hid::J),
    ("K", hid::K),
    ("L", hid::L),
    ("M", hid::M),
    ("N", hid::N),
    ("O", hid::O),
    ("P", hid::P),
    ("Q", hid::Q),
    ("R", hid::R),
    ("S", hid::S),
    ("T", hid::T),
    ("U", hid::U),
    ("V", hid::V),
    ("W", hid::W),
    ("X", hid::X),
    ("Y", hid::Y),
    ("Z", hid::Z),
    ("1", hid::N1),
    ("2", hid::N2),
    ("3", hid::N3),
    ("4", hid::N4),
    ("5", hid::N5),
    ("6", hid::N6),
    ("7", hid::N7),
    ("8", hid::N8),
    ("9", hid::N9),
    ("0", hid::N0),
    ("Enter", hid::ENTER),
    ("Escape", hid::ESCAPE),
    ("Backspace", hid::BACKSPACE),
    ("Tab", hid::TAB),
    ("Space", hid::SPACE),
    ("Minus", hid::MINUS),
    ("Equals", hid::EQUALS),
    ("LeftBracket", hid::LEFT_BRACKET),
    ("RightBracket", hid::RIGHT_BRACKET),
    ("Backslash", hid::BACKSLASH),
    ("Semicolon", hid::SEMICOLON),
    ("Quote", hid::QUOTE),
    ("Backtick", hid::BACKTICK),
    ("Comma", hid::COMMA),
    ("Period", hid::PERIOD),
    ("Slash", hid::SLASH),
    ("CapsLock", hid::CAPS_LOCK),
    ("F1", hid::F1),
    ("F2", hid::F2),
    ("F3", hid::F3),
    ("F4", hid::F4),
    ("F5", hid::F5),
    ("F6", hid::F6),
    ("F7", hid::F7),
    ("F8", hid::F8),
    ("F9", hid::F9),
    ("F10", hid::F10),
    ("F11", hid::F11),
    ("F12", hid::F12),
    ("PrintScreen", hid::PRINT_SCREEN),
    ("ScrollLock", hid::SCROLL_LOCK),
    ("Pause", hid::PAUSE),
    ("Insert", hid::INSERT),
    ("Home", hid::HOME),
    ("PageUp", hid::PAGE_UP),
    ("Delete", hid::DELETE),
    ("End", hid::END),
    ("PageDown", hid::PAGE_DOWN),
    ("RightArrow", hid::RIGHT_ARROW),
    ("LeftArrow", hid::LEFT_ARROW),
    ("DownArrow", hid::DOWN_ARROW),
    ("UpArrow", hid::UP_ARROW),
    ("Application", hid::APPLICATION),
    ("LeftControl", hid::LEFT_CONTROL),
    ("LeftShift", hid::LEFT_SHIFT),
    ("LeftAlt", hid::LEFT_ALT),
    ("LeftGui", hid::LEFT_GUI),
    ("RightControl", hid::RIGHT_CONTROL),
    ("RightShift", hid::RIGHT_SHIFT),
    ("RightAlt", hid::RIGHT_ALT),
    ("RightGui", hid::RIGHT_GUI),
    ("MediaNext", hid::MEDIA_NEXT),
    ("MediaPrevious", hid::MEDIA_PREVIOUS),
    ("MediaStop", hid::MEDIA_STOP),
    ("MediaPlayPause", hid::MEDIA_PLAY_PAUSE),
    ("Mute", hid::MUTE),
    ("VolumeUp", hid::VOLUME_UP),
    ("VolumeDown", hid::VOLUME_DOWN),
    ("MouseButtonLeft", hid::MOUSE_BUTTON_LEFT),
    ("MouseButtonRight", hid::MOUSE_BUTTON_RIGHT),
    ("MouseButtonMiddle", hid::MOUSE_BUTTON_MIDDLE),
    ("MouseUp", hid::MOUSE_UP),
    ("MouseDown", hid::MOUSE_DOWN),
    ("MouseLeft", hid::MOUSE_LEFT),
    ("MouseRight", hid::MOUSE_RIGHT),
    ("MouseWheelUp", hid::MOUSE_WHEEL_UP),
    ("MouseWheelDown", hid::MOUSE_WHEEL_DOWN),
    ("MouseWheelLeft", hid::MOUSE_WHEEL_LEFT),
    ("MouseWheelRight", hid::MOUSE_WHEEL_RIGHT),
    ("LedNext", hid::LED_NEXT),
    ("LedPrevious", hid::LED_PREV),
    ("LedToggle", hid::LED_TOGGLE),
];

pub fn key_name(code: u16) -> Option<&'static str> {
    KEY_NAMES.iter().find(|(_, c)| *c == code).map(|(n, _)| *n)
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
