use m100_common::globals;

use super::*;

const EFFECTS: [LedEffect; 4] = [
    LedEffect::Off,
    LedEffect::Solid(rgb(160, 0, 0)),
    LedEffect::Rainbow,
    LedEffect::Chase { distance: 5 },
];

fn settings(timeout: u16) -> Settings {
    let mut s = Settings::default();
    s.set(globals::IDLE_LED_TIMEOUT, timeout).unwrap();
    s.set(globals::LED_EFFECT, 2).unwrap();
    s.set(globals::LED_BRIGHTNESS, 90).unwrap();
    s
}

#[test]
fn startup_reports_state() {
    let mut leds = Leds::new(&EFFECTS);
    leds.apply_settings(&settings(0));

    let events = leds.host_power(HostPowerEvent::Startup, 5);
    assert_eq!(
        events.as_slice(),
        &[
            LedEvent::Brightness(90),
            LedEvent::Effect(LedEffect::Rainbow),
            LedEvent::Enabled(true),
        ]
    );
}

#[test]
fn effect_out_of_range_uses_first() {
    let mut leds = Leds::new(&EFFECTS[..2]);
    leds.apply_settings(&settings(0));
    assert_eq!(leds.current_effect(), LedEffect::Off);
}

#[test]
fn cycle_effects() {
    let mut leds = Leds::new(&EFFECTS);
    assert_eq!(
        leds.command(LedCommand::Next).as_slice(),
        &[LedEvent::Effect(LedEffect::Solid(rgb(160, 0, 0)))]
    );
    assert_eq!(
        leds.command(LedCommand::Previous).as_slice(),
        &[LedEvent::Effect(LedEffect::Off)]
    );
    assert_eq!(
        leds.command(LedCommand::Previous).as_slice(),
        &[LedEvent::Effect(LedEffect::Chase { distance: 5 })]
    );

    let mut empty = Leds::new(&[]);
    assert!(empty.command(LedCommand::Next).is_empty());
    assert_eq!(empty.current_effect(), LedEffect::Off);
}

#[test]
fn effect_changed_while_off_is_sent_on_wake() {
    let mut leds = Leds::new(&EFFECTS);
    assert_eq!(
        leds.command(LedCommand::Toggle).as_slice(),
        &[LedEvent::Enabled(false)]
    );
    assert!(leds.command(LedCommand::Next).is_empty());
    assert!(leds.command(LedCommand::Next).is_empty());
    assert_eq!(leds.current_effect(), LedEffect::Rainbow);
    assert_eq!(
        leds.command(LedCommand::Toggle).as_slice(),
        &[
            LedEvent::Effect(LedEffect::Rainbow),
            LedEvent::Enabled(true),
        ]
    );

    leds.host_power(HostPowerEvent::Suspend, 10);
    assert!(leds.command(LedCommand::Previous).is_empty());
    assert_eq!(
        leds.host_power(HostPowerEvent::Resume, 20).as_slice(),
        &[
            LedEvent::Effect(LedEffect::Solid(rgb(160, 0, 0))),
            LedEvent::Enabled(true),
        ]
    );
}

#[test]
fn suspend_resume() {
    let mut leds = Leds::new(&EFFECTS);
    assert_eq!(
        leds.host_power(HostPowerEvent::Suspend, 10).as_slice(),
        &[LedEvent::Enabled(false)]
    );
    assert!(leds.host_power(HostPowerEvent::Suspend, 11).is_empty());
    assert_eq!(
        leds.host_power(HostPowerEvent::Resume, 20).as_slice(),
        &[LedEvent::Effect(LedEffect::Off), LedEvent::Enabled(true)]
    );

    leds.command(LedCommand::Toggle);
    leds.host_power(HostPowerEvent::Suspend, 30);
    assert!(
        leds.host_power(HostPowerEvent::Resume, 40).is_empty(),
        "user disabled leds stay off"
    );
    assert!(!leds.is_lit());
}

#[test]
fn idle_timeout() {
    let mut leds = Leds::new(&EFFECTS);
    leds.apply_settings(&settings(2));
    leds.host_power(HostPowerEvent::Startup, 1000);

    assert_eq!(leds.idle_deadline(), Some(3000));
    assert!(leds.check_idle(2999).is_empty());

    assert!(leds.key_activity(2500).is_empty());
    assert_eq!(leds.idle_deadline(), Some(4500));
    assert!(leds.check_idle(3000).is_empty());
    assert_eq!(
        leds.check_idle(4500).as_slice(),
        &[LedEvent::Enabled(false)]
    );
    assert_eq!(leds.idle_deadline(), None);
    assert!(!leds.is_lit());

    assert_eq!(
        leds.key_activity(5000).as_slice(),
        &[LedEvent::Effect(LedEffect::Rainbow), LedEvent::Enabled(true)]
    );
    assert_eq!(leds.idle_deadline(), Some(7000));
}

#[test]
fn idle_disabled() {
    let mut leds = Leds::new(&EFFECTS);
    leds.apply_settings(&settings(0));
    assert_eq!(leds.idle_deadline(), None);
    assert!(leds.check_idle(u64::MAX).is_empty());
}
