use m100_common::keycodes::{hid, modifiers};

use crate::scan::ScanKey;

use super::*;

extern crate std;
use std::vec::Vec;

const TAP: KeyPlusMod = KeyPlusMod::new(hid::BACKSPACE, 0);
const HOLD: HoldRole = HoldRole::Modifier(modifiers::LEFT_CONTROL);
const QUKEY: KeyPosition = KeyPosition::new(1, 7);

fn ev(row: u8, col: u8, down: bool, time: u64) -> TimedScanKey {
    TimedScanKey(ScanKey::new(row, col, down), time)
}

fn started() -> DualRoleResolver<4, 16> {
    let mut r = DualRoleResolver::<4, 16>::default();
    r.start(QUKEY, 100, TAP, HOLD);
    r
}

fn queued(r: &mut DualRoleResolver<4, 16>) -> Vec<TimedScanKey> {
    r.take_queue().iter().copied().collect()
}

#[test]
fn pass_when_idle() {
    let mut r = DualRoleResolver::<4, 16>::default();
    assert_eq!(r.key_switch(ev(0, 0, true, 1), 80), Gate::Pass);
    assert!(!r.is_awaiting());
}

#[test]
fn tap_alone() {
    let mut r = started();
    let up = ev(1, 7, false, 150);
    assert_eq!(
        r.key_switch(up, 80),
        Gate::Resolved {
            pos: QUKEY,
            role: Role::Primary(TAP),
            then: Some(up)
        }
    );
    assert_eq!(r.state(QUKEY), DualRoleKeyState::Primary(TAP));
    assert_eq!(r.release(QUKEY), Some(Role::Primary(TAP)));
    assert_eq!(r.state(QUKEY), DualRoleKeyState::Idle);
}

#[test]
fn full_cycle_is_secondary() {
    let mut r = started();
    assert_eq!(r.key_switch(ev(2, 1, true, 110), 80), Gate::Queued);
    assert_eq!(
        r.key_switch(ev(2, 1, false, 120), 80),
        Gate::Resolved {
            pos: QUKEY,
            role: Role::Secondary(HOLD),
            then: None
        }
    );
    assert!(!r.is_awaiting());
    assert_eq!(
        queued(&mut r),
        [ev(2, 1, true, 110), ev(2, 1, false, 120)]
    );
    assert_eq!(r.release(QUKEY), Some(Role::Secondary(HOLD)));
}

#[test]
fn earlier_key_release_passes() {
    let mut r = started();
    assert_eq!(r.key_switch(ev(0, 3, false, 110), 80), Gate::Pass);
    assert!(r.is_awaiting());
    assert!(queued(&mut r).is_empty());
}

#[test]
fn rollover_below_threshold_is_primary() {
    let mut r = started();
    r.key_switch(ev(2, 1, true, 190), 80);
    let up = ev(1, 7, false, 200);
    assert_eq!(
        r.key_switch(up, 80),
        Gate::Resolved {
            pos: QUKEY,
            role: Role::Primary(TAP),
            then: Some(up)
        }
    );
    assert_eq!(queued(&mut r), [ev(2, 1, true, 190)]);
}

#[test]
fn rollover_above_threshold_is_secondary() {
    let mut r = started();
    r.key_switch(ev(2, 1, true, 110), 80);
    let up = ev(1, 7, false, 200);
    assert_eq!(
        r.key_switch(up, 80),
        Gate::Resolved {
            pos: QUKEY,
            role: Role::Secondary(HOLD),
            then: Some(up)
        }
    );
}

#[test]
fn threshold_is_tunable() {
    let mut r = started();
    r.key_switch(ev(2, 1, true, 150), 50);
    assert!(matches!(
        r.key_switch(ev(1, 7, false, 200), 50),
        Gate::Resolved {
            role: Role::Secondary(_),
            ..
        }
    ));

    let mut r = started();
    r.key_switch(ev(2, 1, true, 150), 51);
    assert!(matches!(
        r.key_switch(ev(1, 7, false, 200), 51),
        Gate::Resolved {
            role: Role::Primary(_),
            ..
        }
    ));
}

#[test]
fn overflow_forces_primary() {
    let mut r = started();
    for i in 0..QUEUE_SIZE as u8 {
        assert_eq!(r.key_switch(ev(0, i, true, 110), 80), Gate::Queued);
    }
    let extra = ev(3, 0, true, 120);
    assert_eq!(
        r.key_switch(extra, 80),
        Gate::Resolved {
            pos: QUKEY,
            role: Role::Primary(TAP),
            then: Some(extra)
        }
    );
    assert_eq!(queued(&mut r).len(), QUEUE_SIZE);
    assert_eq!(r.key_switch(ev(1, 7, false, 130), 80), Gate::Pass);
}

#[test]
fn overlap_percent() {
    assert_eq!(overlap(100, 150, 200), 50);
    assert_eq!(overlap(100, 100, 200), 100);
    assert_eq!(overlap(100, 100, 100), 100);
    assert_eq!(overlap(100, 199, 200), 1);
}
