pub const QUKEYS_OVERLAP: u16 = 0;
pub const IDLE_LED_TIMEOUT: u16 = 1;
pub const LED_BRIGHTNESS: u16 = 2;
pub const LED_EFFECT: u16 = 3;

pub const QUKEYS_OVERLAP_DEFAULT: u16 = 80;
pub const IDLE_LED_TIMEOUT_DEFAULT: u16 = 600;
pub const LED_BRIGHTNESS_DEFAULT: u16 = 160;
pub const LED_EFFECT_DEFAULT: u16 = 0;

pub const COUNT: usize = 4;

pub const DEFAULTS: [u16; COUNT] = [
    QUKEYS_OVERLAP_DEFAULT,
    IDLE_LED_TIMEOUT_DEFAULT,
    LED_BRIGHTNESS_DEFAULT,
    LED_EFFECT_DEFAULT,
];

pub const NAMES: [&str; COUNT] = [
    "qukeys_overlap",
    "idle_led_timeout",
    "led_brightness",
    "led_effect",
];

/// Largest accepted value for each global.
pub const MAX: [u16; COUNT] = [100, u16::MAX, 255, 255];
