use heapless::Vec;

use crate::scan::KeyPosition;

/// A key code paired with the modifiers to hold while it is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPlusMod(pub(crate) u16, pub(crate) u8);
impl KeyPlusMod {
    pub const fn new(code: u16, modifiers: u8) -> Self {
        Self(code, modifiers)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }

    pub const fn modifiers(&self) -> u8 {
        self.1
    }
}

/// What a dual-role key does once it resolves to its secondary role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldRole {
    Modifier(u8),
    Layer(u8),
}

/// The binding of one key position on one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Emit a key code; consumer, system control, mouse and firmware codes are all key codes.
    Key(KeyPlusMod),
    /// Defer to the next lower active layer.
    Transparent,
    /// Produce nothing and stop the lookup.
    Blocked,
    /// Activate a layer while held.
    ShiftToLayer(u8),
    /// Toggle a layer on each press.
    LockLayer(u8),
    /// Tap for `tap`, hold for `hold`.
    DualRole { tap: KeyPlusMod, hold: HoldRole },
    Macro(u8),
    /// A position that only exists to take part in magic combos.
    ComboMember,
}

pub const fn k(code: u16) -> Action {
    Action::Key(KeyPlusMod::new(code, 0))
}

pub const fn kmod(code: u16, modifiers: u8) -> Action {
    Action::Key(KeyPlusMod::new(code, modifiers))
}

pub const ___: Action = Action::Transparent;
pub const XXX: Action = Action::Blocked;

/// Immutable layer data: `LAYERS` grids of `ROWS` x `COLS` actions. Layer 0 is the base layer.
pub struct Keymap<const LAYERS: usize, const ROWS: usize, const COLS: usize> {
    layers: [[[Action; COLS]; ROWS]; LAYERS],
}

impl<const LAYERS: usize, const ROWS: usize, const COLS: usize> Keymap<LAYERS, ROWS, COLS> {
    /// Build a keymap. Any layer reference to a layer that does not exist fails; in a `const`
    /// context this is a compile error.
    pub const fn new(layers: [[[Action; COLS]; ROWS]; LAYERS]) -> Self {
        assert!(LAYERS > 0, "keymap needs a base layer");
        assert!(LAYERS <= u8::MAX as usize);
        let mut l = 0;
        while l < LAYERS {
            let mut r = 0;
            while r < ROWS {
                let mut c = 0;
                while c < COLS {
                    let target = match layers[l][r][c] {
                        Action::ShiftToLayer(n)
                        | Action::LockLayer(n)
                        | Action::DualRole {
                            hold: HoldRole::Layer(n),
                            ..
                        } => n as usize,
                        _ => 0,
                    };
                    if target >= LAYERS {
                        panic!("keymap refers to a layer that does not exist");
                    }
                    c += 1;
                }
                r += 1;
            }
            l += 1;
        }
        Self { layers }
    }

    pub fn contains(&self, pos: KeyPosition) -> bool {
        (pos.row as usize) < ROWS && (pos.col as usize) < COLS
    }

    pub fn get(&self, layer: u8, pos: KeyPosition) -> Option<Action> {
        self.layers
            .get(layer as usize)?
            .get(pos.row as usize)?
            .get(pos.col as usize)
            .copied()
    }

    /// Find the action for `pos`: walk the active layers from the most recently activated down to
    /// the base layer, skipping [Action::Transparent]. [Action::Blocked] stops the walk with no
    /// action.
    pub fn resolve(&self, pos: KeyPosition, stack: &LayerStack) -> Option<Action> {
        for layer in stack.active_layers() {
            match self.get(layer, pos)? {
                Action::Transparent => continue,
                Action::Blocked => return None,
                action => return Some(action),
            }
        }
        None
    }

    /// Base layer positions that can never produce anything.
    pub fn dead_positions(&self) -> impl Iterator<Item = KeyPosition> + '_ {
        self.layers[0].iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, a)| {
                matches!(a, Action::Transparent | Action::Blocked)
                    .then_some(KeyPosition::new(r as u8, c as u8))
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerSource {
    /// Held by the key at this position.
    Shift(KeyPosition),
    Lock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerEntry {
    pub layer: u8,
    pub source: LayerSource,
}

pub const LAYER_STACK_SIZE: usize = 16;

/// Active layers in activation order. The base layer is always active and never stored.
#[derive(Debug, Default)]
pub struct LayerStack {
    entries: Vec<LayerEntry, LAYER_STACK_SIZE>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `layer` for as long as the key at `pos` is held. Returns false if `pos` already
    /// holds a layer or the stack is full.
    pub fn shift(&mut self, layer: u8, pos: KeyPosition) -> bool {
        let source = LayerSource::Shift(pos);
        if self.entries.iter().any(|e| e.source == source) {
            return false;
        }
        if self.entries.push(LayerEntry { layer, source }).is_err() {
            crate::warn!("layer stack full; ignoring layer {}", layer);
            return false;
        }
        true
    }

    /// Remove the layer held by `pos`, if any.
    pub fn unshift(&mut self, pos: KeyPosition) -> Option<u8> {
        let source = LayerSource::Shift(pos);
        let i = self.entries.iter().rposition(|e| e.source == source)?;
        Some(self.entries.remove(i).layer)
    }

    /// Lock `layer` on, or unlock it if already locked. Returns true if the layer is now locked.
    pub fn toggle_lock(&mut self, layer: u8) -> bool {
        if let Some(i) = self
            .entries
            .iter()
            .rposition(|e| e.layer == layer && e.source == LayerSource::Lock)
        {
            self.entries.remove(i);
            return false;
        }
        if self
            .entries
            .push(LayerEntry {
                layer,
                source: LayerSource::Lock,
            })
            .is_err()
        {
            crate::warn!("layer stack full; ignoring lock {}", layer);
            return false;
        }
        true
    }

    /// The layer that takes precedence over all others.
    pub fn top(&self) -> u8 {
        self.entries.last().map_or(0, |e| e.layer)
    }

    /// Active layers, highest precedence first, ending with the base layer.
    pub fn active_layers(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries
            .iter()
            .rev()
            .map(|e| e.layer)
            .chain(core::iter::once(0))
    }

    pub fn entries(&self) -> &[LayerEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod test;
