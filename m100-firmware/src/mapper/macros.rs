use heapless::Vec;
use m100_common::{
    keycodes::{char_to_key, modifiers},
    version::VERSION_INFO_PREFIX,
};

use crate::layout::KeyPlusMod;

use super::RegistryError;

pub const MACRO_MAX_NUM: usize = 16;

#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    ToggledOn,
    Held,
    ToggledOff,
}

/// What a macro asks to be typed.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum MacroOutput<'a> {
    None,
    /// Typed one character at a time, segments in order.
    Text(&'a [&'a str]),
    /// Each key tapped in order.
    Keys(&'a [KeyPlusMod]),
}

pub trait MacroHandler {
    fn handle(&self, state: KeyState) -> MacroOutput<'_>;
}

pub struct NoopMacro;
impl MacroHandler for NoopMacro {
    fn handle(&self, _state: KeyState) -> MacroOutput<'_> {
        MacroOutput::None
    }
}

static NOOP: NoopMacro = NoopMacro;

/// Types fixed text when its key is pressed.
pub struct TypeText<'a>(pub &'a [&'a str]);
impl MacroHandler for TypeText<'_> {
    fn handle(&self, state: KeyState) -> MacroOutput<'_> {
        match state {
            KeyState::ToggledOn => MacroOutput::Text(self.0),
            _ => MacroOutput::None,
        }
    }
}

/// Types the firmware banner followed by the build version.
pub struct VersionInfo<'a> {
    segments: [&'a str; 2],
}
impl<'a> VersionInfo<'a> {
    pub const fn new(version: &'a str) -> Self {
        Self {
            segments: [VERSION_INFO_PREFIX, version],
        }
    }
}
impl MacroHandler for VersionInfo<'_> {
    fn handle(&self, state: KeyState) -> MacroOutput<'_> {
        match state {
            KeyState::ToggledOn => MacroOutput::Text(&self.segments),
            _ => MacroOutput::None,
        }
    }
}

/// Macro handlers by id. Ids with no handler dispatch to a no-op.
pub struct MacroRegistry<'c> {
    entries: Vec<(u8, &'c dyn MacroHandler), MACRO_MAX_NUM>,
}

impl Default for MacroRegistry<'_> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<'c> MacroRegistry<'c> {
    pub fn register(&mut self, id: u8, handler: &'c dyn MacroHandler) -> Result<(), RegistryError> {
        if self.entries.iter().any(|(i, _)| *i == id) {
            return Err(RegistryError::Duplicate);
        }
        self.entries
            .push((id, handler))
            .map_err(|_| RegistryError::Full)
    }

    pub fn get(&self, id: u8) -> &'c dyn MacroHandler {
        match self.entries.iter().find(|(i, _)| *i == id) {
            Some((_, handler)) => *handler,
            None => {
                crate::debug!("no macro {}", id);
                &NOOP
            }
        }
    }
}

/// A macro's output being typed out. Each step yields one key to tap.
pub(crate) struct MacroRun<'a> {
    output: MacroOutput<'a>,
    segment: usize,
    offset: usize,
}

impl<'a> MacroRun<'a> {
    pub(crate) fn new(output: MacroOutput<'a>) -> Option<Self> {
        match output {
            MacroOutput::None => None,
            output => Some(Self {
                output,
                segment: 0,
                offset: 0,
            }),
        }
    }

    pub(crate) fn next_key(&mut self) -> Option<KeyPlusMod> {
        match self.output {
            MacroOutput::None => None,
            MacroOutput::Keys(keys) => {
                let key = keys.get(self.segment).copied();
                self.segment += 1;
                key
            }
            MacroOutput::Text(segments) => loop {
                let text = segments.get(self.segment)?;
                let Some(c) = text[self.offset..].chars().next() else {
                    self.segment += 1;
                    self.offset = 0;
                    continue;
                };
                self.offset += c.len_utf8();
                match char_to_key(c) {
                    Some((code, shift)) => {
                        return Some(KeyPlusMod::new(
                            code,
                            if shift { modifiers::LEFT_SHIFT } else { 0 },
                        ))
                    }
                    None => crate::debug!("no key for char {}", c as u32),
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "macros_test.rs"]
mod test;
