use heapless::Vec;

use crate::{leds::LedCommand, scan::KeyPosition};

use super::{KeyEvent, RegistryError};

pub const COMBO_MAX_NUM: usize = 8;
pub const COMBO_MAX_LENGTH: usize = 4;

/// What a combo handler asks the processor to do.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComboOutcome {
    Nothing,
    Report(KeyEvent),
    Led(LedCommand),
}

pub trait ComboHandler {
    fn activate(&self) -> ComboOutcome;
}

/// Runs when every key of a combo is held at once.
pub struct MagicCombo<'c> {
    keys: Vec<KeyPosition, COMBO_MAX_LENGTH>,
    handler: &'c dyn ComboHandler,
    /// bit `i` is set while `keys[i]` is held
    state: u8,
    matched: bool,
}

impl<'c> MagicCombo<'c> {
    fn new(keys: &[KeyPosition], handler: &'c dyn ComboHandler) -> Result<Self, RegistryError> {
        if keys.is_empty() {
            return Err(RegistryError::Empty);
        }
        if keys.iter().enumerate().any(|(i, k)| keys[..i].contains(k)) {
            return Err(RegistryError::Duplicate);
        }
        let keys = Vec::from_slice(keys).map_err(|_| RegistryError::TooManyKeys)?;
        Ok(Self {
            keys,
            handler,
            state: 0,
            matched: false,
        })
    }

    fn done(&self) -> bool {
        self.state.count_ones() == self.keys.len() as u32
    }

    /// Returns the handler on the transition into fully held.
    fn key_down(&mut self, pos: KeyPosition) -> Option<&'c dyn ComboHandler> {
        let i = self.keys.iter().position(|k| *k == pos)?;
        self.state |= 1 << i;
        if self.done() && !self.matched {
            self.matched = true;
            Some(self.handler)
        } else {
            None
        }
    }

    fn key_up(&mut self, pos: KeyPosition) {
        if let Some(i) = self.keys.iter().position(|k| *k == pos) {
            self.state &= !(1 << i);
            self.matched = false;
        }
    }
}

/// Magic combos keyed on physical positions; layers and dual-role keys play no part.
pub struct ComboDetector<'c, const ROWS: usize, const COLS: usize> {
    combos: Vec<MagicCombo<'c>, COMBO_MAX_NUM>,
}

impl<const ROWS: usize, const COLS: usize> Default for ComboDetector<'_, ROWS, COLS> {
    fn default() -> Self {
        Self { combos: Vec::new() }
    }
}

impl<'c, const ROWS: usize, const COLS: usize> ComboDetector<'c, ROWS, COLS> {
    pub fn register(
        &mut self,
        keys: &[KeyPosition],
        handler: &'c dyn ComboHandler,
    ) -> Result<(), RegistryError> {
        if keys
            .iter()
            .any(|k| k.row as usize >= ROWS || k.col as usize >= COLS)
        {
            return Err(RegistryError::OutOfRange);
        }
        let combo = MagicCombo::new(keys, handler)?;
        self.combos.push(combo).map_err(|_| RegistryError::Full)
    }

    pub(crate) fn len(&self) -> usize {
        self.combos.len()
    }

    /// The handlers of every combo completed by pressing `pos`.
    pub(crate) fn key_down(&mut self, pos: KeyPosition) -> Vec<&'c dyn ComboHandler, COMBO_MAX_NUM> {
        let mut fired = Vec::new();
        for combo in self.combos.iter_mut() {
            if let Some(handler) = combo.key_down(pos) {
                let _ = fired.push(handler);
            }
        }
        fired
    }

    pub(crate) fn key_up(&mut self, pos: KeyPosition) {
        for combo in self.combos.iter_mut() {
            combo.key_up(pos);
        }
    }

    pub(crate) fn clear(&mut self) {
        for combo in self.combos.iter_mut() {
            combo.state = 0;
            combo.matched = false;
        }
    }
}

/// Emits a fixed outcome.
pub struct ComboAction(pub ComboOutcome);
impl ComboHandler for ComboAction {
    fn activate(&self) -> ComboOutcome {
        self.0
    }
}

#[cfg(test)]
#[path = "combos_test.rs"]
mod test;
