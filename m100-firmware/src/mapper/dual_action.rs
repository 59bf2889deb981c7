use heapless::Deque;

use crate::{
    layout::{HoldRole, KeyPlusMod},
    scan::{KeyPosition, TimedScanKey},
};

use DualRoleKeyState::*;

pub const QUEUE_SIZE: usize = 16;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DualRoleKeyState {
    #[default]
    Idle,
    Awaiting {
        start: u64,
        tap: KeyPlusMod,
        hold: HoldRole,
    },
    Primary(KeyPlusMod),
    Secondary(HoldRole),
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Primary(KeyPlusMod),
    Secondary(HoldRole),
}

#[derive(Debug, PartialEq)]
pub(crate) enum Gate {
    /// No key is awaiting; process the event now.
    Pass,
    /// The event was held back until the awaiting key resolves.
    Queued,
    /// The awaiting key at `pos` resolved. Emit the role press, replay the queue and then process
    /// `then`.
    Resolved {
        pos: KeyPosition,
        role: Role,
        then: Option<TimedScanKey>,
    },
}

/// Decides tap or hold for dual-role keys by watching the keys pressed while one is awaiting
/// resolution.
pub(crate) struct DualRoleResolver<const ROWS: usize, const COLS: usize> {
    states: [[DualRoleKeyState; COLS]; ROWS],
    awaiting: Option<KeyPosition>,
    queue: Deque<TimedScanKey, QUEUE_SIZE>,
}

impl<const ROWS: usize, const COLS: usize> Default for DualRoleResolver<ROWS, COLS> {
    fn default() -> Self {
        Self {
            states: [[Idle; COLS]; ROWS],
            awaiting: None,
            queue: Deque::new(),
        }
    }
}

impl<const ROWS: usize, const COLS: usize> DualRoleResolver<ROWS, COLS> {
    pub(crate) fn start(&mut self, pos: KeyPosition, start: u64, tap: KeyPlusMod, hold: HoldRole) {
        debug_assert!(self.awaiting.is_none());
        *self.state_mut(pos) = Awaiting { start, tap, hold };
        self.awaiting = Some(pos);
    }

    pub(crate) fn state(&self, pos: KeyPosition) -> DualRoleKeyState {
        self.states[pos.row as usize][pos.col as usize]
    }

    fn state_mut(&mut self, pos: KeyPosition) -> &mut DualRoleKeyState {
        &mut self.states[pos.row as usize][pos.col as usize]
    }

    pub(crate) fn is_awaiting(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Route `k` while a key may be awaiting. `threshold` is the overlap percentage needed for a
    /// rollover to resolve as [Role::Secondary].
    pub(crate) fn key_switch(&mut self, k: TimedScanKey, threshold: u8) -> Gate {
        let Some(pos) = self.awaiting else {
            return Gate::Pass;
        };
        let Awaiting { start, tap, hold } = self.state(pos) else {
            self.awaiting = None;
            return Gate::Pass;
        };

        if k.position() == pos {
            if k.is_down() {
                crate::warn!("press of awaiting key {:?}", pos);
                return Gate::Queued;
            }
            let role = match self.queue.iter().find(|q| q.is_down()) {
                Some(other) if overlap(start, other.time(), k.time()) >= threshold as u64 => {
                    Role::Secondary(hold)
                }
                _ => Role::Primary(tap),
            };
            return self.resolve(pos, role, Some(k));
        }

        if k.is_down() {
            if self.queue.is_full() {
                crate::debug!("dual-role queue full");
                return self.resolve(pos, Role::Primary(tap), Some(k));
            }
        } else if self
            .queue
            .iter()
            .any(|q| q.is_down() && q.position() == k.position())
        {
            let then = self.queue.push_back(k).err();
            return self.resolve(pos, Role::Secondary(hold), then);
        } else {
            // pressed before the awaiting key; its press has already been processed
            return Gate::Pass;
        }

        match self.queue.push_back(k) {
            Ok(()) => Gate::Queued,
            Err(k) => self.resolve(pos, Role::Primary(tap), Some(k)),
        }
    }

    fn resolve(&mut self, pos: KeyPosition, role: Role, then: Option<TimedScanKey>) -> Gate {
        *self.state_mut(pos) = match role {
            Role::Primary(tap) => Primary(tap),
            Role::Secondary(hold) => Secondary(hold),
        };
        self.awaiting = None;
        Gate::Resolved { pos, role, then }
    }

    /// The queued events, in arrival order.
    pub(crate) fn take_queue(&mut self) -> Deque<TimedScanKey, QUEUE_SIZE> {
        core::mem::replace(&mut self.queue, Deque::new())
    }

    /// The key at `pos` was released; forget its state and return the role it resolved to.
    pub(crate) fn release(&mut self, pos: KeyPosition) -> Option<Role> {
        match core::mem::take(self.state_mut(pos)) {
            Primary(tap) => Some(Role::Primary(tap)),
            Secondary(hold) => Some(Role::Secondary(hold)),
            Idle => None,
            Awaiting { .. } => {
                crate::error!("release of unresolved key {:?}", pos);
                self.awaiting = None;
                None
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Percentage of the awaiting key's hold time during which the other key was also down.
fn overlap(start: u64, other_press: u64, release: u64) -> u64 {
    let held = release.saturating_sub(start);
    if held == 0 {
        return 100;
    }
    release.saturating_sub(other_press) * 100 / held
}

#[cfg(test)]
#[path = "dual_action_test.rs"]
mod test;
