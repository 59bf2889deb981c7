//! The Model 100 configuration: three layers, the version and arrow macros, magic combos and the
//! LED effect table.

use embassy_sync::blocking_mutex::raw::RawMutex;
use m100_common::{
    keycodes::{hid, modifiers},
    layers::{self, MOUSE, PRIMARY, SYMBOL},
    macro_ids,
    settings::Settings,
    COL_COUNT, ROW_COUNT,
};

use crate::{
    layout::{k, kmod, Action, HoldRole, KeyPlusMod, Keymap, ___, XXX},
    leds::{rgb, HostPowerEvent, LedCommand, LedEffect, Leds},
    mapper::{
        combos::{ComboAction, ComboOutcome},
        macros::{TypeText, VersionInfo},
        EventProcessor, KeyEvent, RegistryError, ReportChannel,
    },
    scan::KeyPosition,
};

/// Lay out a keymap in the order the keys sit on the two halves of the keyboard: each half's four
/// rows, then its thumb arc, then its palm key.
macro_rules! keymap_stacked {
    (
        $r0c0:expr, $r0c1:expr, $r0c2:expr, $r0c3:expr, $r0c4:expr, $r0c5:expr, $r0c6:expr,
        $r1c0:expr, $r1c1:expr, $r1c2:expr, $r1c3:expr, $r1c4:expr, $r1c5:expr, $r1c6:expr,
        $r2c0:expr, $r2c1:expr, $r2c2:expr, $r2c3:expr, $r2c4:expr, $r2c5:expr,
        $r3c0:expr, $r3c1:expr, $r3c2:expr, $r3c3:expr, $r3c4:expr, $r3c5:expr, $r2c6:expr,
        $r0c7:expr, $r1c7:expr, $r2c7:expr, $r3c7:expr,
        $r3c6:expr,

        $r0c9:expr, $r0c10:expr, $r0c11:expr, $r0c12:expr, $r0c13:expr, $r0c14:expr, $r0c15:expr,
        $r1c9:expr, $r1c10:expr, $r1c11:expr, $r1c12:expr, $r1c13:expr, $r1c14:expr, $r1c15:expr,
        $r2c10:expr, $r2c11:expr, $r2c12:expr, $r2c13:expr, $r2c14:expr, $r2c15:expr,
        $r2c9:expr, $r3c10:expr, $r3c11:expr, $r3c12:expr, $r3c13:expr, $r3c14:expr, $r3c15:expr,
        $r3c8:expr, $r2c8:expr, $r1c8:expr, $r0c8:expr,
        $r3c9:expr $(,)?
    ) => {
        [
            [
                $r0c0, $r0c1, $r0c2, $r0c3, $r0c4, $r0c5, $r0c6, $r0c7, $r0c8, $r0c9, $r0c10,
                $r0c11, $r0c12, $r0c13, $r0c14, $r0c15,
            ],
            [
                $r1c0, $r1c1, $r1c2, $r1c3, $r1c4, $r1c5, $r1c6, $r1c7, $r1c8, $r1c9, $r1c10,
                $r1c11, $r1c12, $r1c13, $r1c14, $r1c15,
            ],
            [
                $r2c0, $r2c1, $r2c2, $r2c3, $r2c4, $r2c5, $r2c6, $r2c7, $r2c8, $r2c9, $r2c10,
                $r2c11, $r2c12, $r2c13, $r2c14, $r2c15,
            ],
            [
                $r3c0, $r3c1, $r3c2, $r3c3, $r3c4, $r3c5, $r3c6, $r3c7, $r3c8, $r3c9, $r3c10,
                $r3c11, $r3c12, $r3c13, $r3c14, $r3c15,
            ],
        ]
    };
}

pub type Model100Keymap = Keymap<{ layers::COUNT }, ROW_COUNT, COL_COUNT>;
pub type Model100Processor<'c, M, const N: usize> =
    EventProcessor<'c, { layers::COUNT }, ROW_COUNT, COL_COUNT, M, N>;

const fn shifted(code: u16) -> Action {
    kmod(code, modifiers::LEFT_SHIFT)
}

const PROG: Action = Action::ComboMember;
const FN: Action = Action::ShiftToLayer(SYMBOL);
const BKSP_CTRL: Action = Action::DualRole {
    tap: KeyPlusMod::new(hid::BACKSPACE, 0),
    hold: HoldRole::Modifier(modifiers::LEFT_CONTROL),
};

#[rustfmt::skip]
pub static KEYMAP: Model100Keymap = Keymap::new([
    // PRIMARY
    keymap_stacked!(
        PROG,              k(hid::N1), k(hid::N2), k(hid::N3), k(hid::N4), k(hid::N5), k(hid::LED_NEXT),
        k(hid::BACKTICK),  k(hid::Q),  k(hid::W),  k(hid::E),  k(hid::R),  k(hid::T),  k(hid::TAB),
        k(hid::PAGE_UP),   k(hid::A),  k(hid::S),  k(hid::D),  k(hid::F),  k(hid::G),
        k(hid::PAGE_DOWN), k(hid::Z),  k(hid::X),  k(hid::C),  k(hid::V),  k(hid::B),  k(hid::ESCAPE),
        k(hid::LEFT_CONTROL), BKSP_CTRL, k(hid::LEFT_GUI), k(hid::LEFT_SHIFT),
        FN,

        Action::Macro(macro_ids::ARROW), k(hid::N6), k(hid::N7), k(hid::N8), k(hid::N9), k(hid::N0), Action::LockLayer(MOUSE),
        k(hid::ENTER),     k(hid::Y),  k(hid::U),  k(hid::I),     k(hid::O),      k(hid::P),         k(hid::EQUALS),
                           k(hid::H),  k(hid::J),  k(hid::K),     k(hid::L),      k(hid::SEMICOLON), k(hid::QUOTE),
        k(hid::RIGHT_ALT), k(hid::N),  k(hid::M),  k(hid::COMMA), k(hid::PERIOD), k(hid::SLASH),     k(hid::MINUS),
        k(hid::RIGHT_SHIFT), k(hid::LEFT_ALT), k(hid::SPACE), k(hid::RIGHT_CONTROL),
        FN,
    ),
    // SYMBOL
    keymap_stacked!(
        ___,               k(hid::F1), k(hid::F2), k(hid::F3), k(hid::F4), k(hid::F5), k(hid::LED_PREV),
        k(hid::TAB),       shifted(hid::N1), shifted(hid::N2), shifted(hid::N3), shifted(hid::N4), shifted(hid::N5), k(hid::LED_TOGGLE),
        k(hid::HOME),      shifted(hid::LEFT_BRACKET), shifted(hid::RIGHT_BRACKET), shifted(hid::N9), shifted(hid::N0), k(hid::BACKTICK),
        k(hid::END),       k(hid::PRINT_SCREEN), k(hid::INSERT), k(hid::LEFT_BRACKET), k(hid::RIGHT_BRACKET), shifted(hid::BACKTICK), ___,
        ___, k(hid::DELETE), ___, ___,
        ___,

        Action::Macro(macro_ids::VERSION_INFO), k(hid::F6), k(hid::F7), k(hid::F8), k(hid::F9), k(hid::F10), k(hid::F11),
        k(hid::MEDIA_PLAY_PAUSE), shifted(hid::N6), shifted(hid::N7), shifted(hid::N8), k(hid::MINUS), shifted(hid::EQUALS), k(hid::F12),
                           k(hid::LEFT_ARROW), k(hid::DOWN_ARROW), k(hid::UP_ARROW), k(hid::RIGHT_ARROW), XXX, XXX,
        k(hid::APPLICATION), k(hid::MUTE), k(hid::VOLUME_DOWN), k(hid::VOLUME_UP), k(hid::BACKSLASH), shifted(hid::BACKSLASH), k(hid::MEDIA_NEXT),
        ___, ___, k(hid::ENTER), ___,
        ___,
    ),
    // MOUSE
    keymap_stacked!(
        ___, ___, ___, ___, ___, ___, ___,
        ___, XXX, XXX, XXX, XXX, XXX, ___,
        ___, XXX, XXX, XXX, XXX, XXX,
        ___, XXX, XXX, XXX, XXX, XXX, ___,
        ___, ___, ___, ___,
        ___,

        ___, ___, ___, ___, ___, ___, ___,
        ___, k(hid::MOUSE_WHEEL_UP), k(hid::MOUSE_BUTTON_LEFT), k(hid::MOUSE_UP), k(hid::MOUSE_BUTTON_RIGHT), XXX, ___,
             k(hid::MOUSE_WHEEL_DOWN), k(hid::MOUSE_LEFT), k(hid::MOUSE_DOWN), k(hid::MOUSE_RIGHT), XXX, ___,
        ___, XXX, k(hid::MOUSE_BUTTON_MIDDLE), XXX, XXX, XXX, ___,
        ___, k(hid::MOUSE_BUTTON_LEFT), k(hid::MOUSE_BUTTON_RIGHT), ___,
        ___,
    ),
]);

/// `<framework>::<config>` as described by the build script.
pub const BUILD_VERSION: &str = env!("M100_BUILD_VERSION");

pub static VERSION_INFO: VersionInfo<'static> = VersionInfo::new(BUILD_VERSION);
pub static ARROW: TypeText<'static> = TypeText(&["->"]);

const fn pos(row: u8, col: u8) -> KeyPosition {
    KeyPosition::new(row, col)
}

/// Left Fn + Esc + left Shift.
pub const TOGGLE_PROTOCOL_KEYS: [KeyPosition; 3] = [pos(3, 6), pos(2, 6), pos(3, 7)];
/// Left Fn + Prog + LED.
pub const TOGGLE_LEDS_KEYS: [KeyPosition; 3] = [pos(3, 6), pos(0, 0), pos(0, 6)];

static TOGGLE_PROTOCOL: ComboAction = ComboAction(ComboOutcome::Report(KeyEvent::ToggleProtocol));
static TOGGLE_LEDS: ComboAction = ComboAction(ComboOutcome::Led(LedCommand::Toggle));

pub static LED_EFFECTS: [LedEffect; 10] = [
    LedEffect::Off,
    LedEffect::Solid(rgb(160, 0, 0)),
    LedEffect::Solid(rgb(140, 70, 0)),
    LedEffect::Solid(rgb(130, 100, 0)),
    LedEffect::Solid(rgb(0, 160, 0)),
    LedEffect::Solid(rgb(0, 0, 160)),
    LedEffect::Rainbow,
    LedEffect::RainbowWave,
    LedEffect::Breathe {
        hue: 170,
        saturation: 255,
    },
    LedEffect::Chase { distance: 5 },
];

/// Build the Model 100 event processor: register macros and combos, apply `settings` and report
/// the startup LED state.
pub fn processor<'c, M: RawMutex, const N: usize>(
    report_channel: &'c ReportChannel<M, N>,
    settings: &Settings,
) -> Result<Model100Processor<'c, M, N>, RegistryError> {
    let mut processor =
        EventProcessor::new(&KEYMAP, report_channel).with_leds(Leds::new(&LED_EFFECTS));
    processor.register_macro(macro_ids::VERSION_INFO, &VERSION_INFO)?;
    processor.register_macro(macro_ids::ARROW, &ARROW)?;
    processor.register_combo(&TOGGLE_PROTOCOL_KEYS, &TOGGLE_PROTOCOL)?;
    processor.register_combo(&TOGGLE_LEDS_KEYS, &TOGGLE_LEDS)?;
    processor.apply_settings(settings);
    processor.host_power(HostPowerEvent::Startup);
    crate::info!("Model 100 {} ready, base layer {}", BUILD_VERSION, PRIMARY);
    Ok(processor)
}

#[cfg(test)]
#[path = "keymap_test.rs"]
mod test;
