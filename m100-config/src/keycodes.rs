use std::collections::HashMap;

use lazy_static::lazy_static;
use m100_common::keycodes::{key_range, KEY_NAMES};

const DASH_USCORE: [char; 2] = ['_', '-'];

lazy_static! {
    static ref NAME_MAP: HashMap<String, u16> = {
        let mut m = HashMap::new();
        for (name, code) in KEY_NAMES {
            m.insert(normalize(name), *code);
        }
        m
    };
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !DASH_USCORE.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Look up a key by name. Case, dashes and underscores are ignored.
pub fn key_code(name: &str) -> Option<u16> {
    NAME_MAP.get(&normalize(name)).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeType {
    Basic,
    Modifier,
    Consumer,
    System,
    Mouse,
    Firmware,
}

pub fn code_type(code: u16) -> Option<CodeType> {
    Some(match code {
        key_range::MODIFIER_MIN..=key_range::MODIFIER_MAX => CodeType::Modifier,
        key_range::BASIC_MIN..=key_range::BASIC_MAX => CodeType::Basic,
        key_range::CONSUMER_MIN..=key_range::CONSUMER_MAX => CodeType::Consumer,
        key_range::SYS_CTL_MIN..=key_range::SYS_CTL_MAX => CodeType::System,
        key_range::MOUSE_MIN..=key_range::MOUSE_MAX => CodeType::Mouse,
        key_range::FIRMWARE_MIN..=key_range::FIRMWARE_MAX => CodeType::Firmware,
        _ => return None,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct KeycodeDef {
    pub name: &'static str,
    pub code: u16,
}

pub fn keycodes_iter() -> impl Iterator<Item = KeycodeDef> {
    KEY_NAMES
        .iter()
        .map(|(name, code)| KeycodeDef {
            name: *name,
            code: *code,
        })
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
