use heapless::Vec;
use m100_common::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedEffect {
    Off,
    Solid(Rgb),
    Rainbow,
    RainbowWave,
    Breathe { hue: u8, saturation: u8 },
    Chase { distance: u8 },
}

/// A change for the LED driver to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedEvent {
    Enabled(bool),
    Effect(LedEffect),
    Brightness(u8),
}

pub type LedEvents = Vec<LedEvent, 3>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedCommand {
    Next,
    Previous,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostPowerEvent {
    Startup,
    Suspend,
    Resume,
}

/// LED state. The lights are lit only while the user has them enabled, the host is awake and the
/// keyboard has not been idle for longer than the idle timeout.
pub struct Leds<'c> {
    effects: &'c [LedEffect],
    current: usize,
    brightness: u8,
    user_enabled: bool,
    suspended: bool,
    idle: bool,
    idle_timeout_ms: u64,
    last_activity: u64,
}

impl<'c> Leds<'c> {
    pub fn new(effects: &'c [LedEffect]) -> Self {
        Self {
            effects,
            current: 0,
            brightness: 160,
            user_enabled: true,
            suspended: false,
            idle: false,
            idle_timeout_ms: 0,
            last_activity: 0,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.brightness = settings.led_brightness();
        self.idle_timeout_ms = settings.idle_led_timeout() as u64 * 1000;
        let effect = settings.led_effect() as usize;
        if effect < self.effects.len() {
            self.current = effect;
        } else {
            crate::warn!("led effect {} out of range", effect);
            self.current = 0;
        }
    }

    pub fn is_lit(&self) -> bool {
        self.user_enabled && !self.suspended && !self.idle
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn current_effect(&self) -> LedEffect {
        self.effects
            .get(self.current)
            .copied()
            .unwrap_or(LedEffect::Off)
    }

    pub fn command(&mut self, command: LedCommand) -> LedEvents {
        match command {
            LedCommand::Next | LedCommand::Previous => {
                let len = self.effects.len();
                let mut events = LedEvents::new();
                if len == 0 {
                    return events;
                }
                self.current = if command == LedCommand::Next {
                    (self.current + 1) % len
                } else {
                    (self.current + len - 1) % len
                };
                if self.is_lit() {
                    let _ = events.push(LedEvent::Effect(self.current_effect()));
                }
                events
            }
            LedCommand::Toggle => self.lit_change(|leds| leds.user_enabled = !leds.user_enabled),
        }
    }

    /// Apply a host power event. Startup reports the full LED state.
    pub fn host_power(&mut self, event: HostPowerEvent, now: u64) -> LedEvents {
        match event {
            HostPowerEvent::Startup => {
                self.suspended = false;
                self.idle = false;
                self.last_activity = now;
                let mut events = LedEvents::new();
                let _ = events.push(LedEvent::Brightness(self.brightness));
                let _ = events.push(LedEvent::Effect(self.current_effect()));
                let _ = events.push(LedEvent::Enabled(self.is_lit()));
                events
            }
            HostPowerEvent::Suspend => self.lit_change(|leds| leds.suspended = true),
            HostPowerEvent::Resume => {
                self.last_activity = now;
                self.lit_change(|leds| {
                    leds.suspended = false;
                    leds.idle = false;
                })
            }
        }
    }

    /// Note a key press; wakes the LEDs from idle.
    pub fn key_activity(&mut self, now: u64) -> LedEvents {
        self.last_activity = now;
        self.lit_change(|leds| leds.idle = false)
    }

    /// Go idle if the idle deadline has passed.
    pub fn check_idle(&mut self, now: u64) -> LedEvents {
        match self.idle_deadline() {
            Some(deadline) if now >= deadline => self.lit_change(|leds| leds.idle = true),
            _ => LedEvents::new(),
        }
    }

    /// When the LEDs will go idle, if no key is pressed before then.
    pub fn idle_deadline(&self) -> Option<u64> {
        if self.idle_timeout_ms == 0 || self.idle || self.suspended {
            None
        } else {
            Some(self.last_activity + self.idle_timeout_ms)
        }
    }

    /// Apply `f` and report a change of lit state. Lighting up re-sends the current effect since it
    /// may have changed while the LEDs were off.
    fn lit_change(&mut self, f: impl FnOnce(&mut Self)) -> LedEvents {
        let before = self.is_lit();
        f(self);
        let after = self.is_lit();
        let mut events = LedEvents::new();
        if before != after {
            if after {
                let _ = events.push(LedEvent::Effect(self.current_effect()));
            }
            let _ = events.push(LedEvent::Enabled(after));
        }
        events
    }
}

#[cfg(test)]
#[path = "leds_test.rs"]
mod test;
