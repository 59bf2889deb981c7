#![no_std]
pub mod globals;
pub mod keycodes;
pub mod settings;
pub mod version;

/// Layer indices used by the Model 100 keymap.
pub mod layers {
    pub const PRIMARY: u8 = 0;
    pub const SYMBOL: u8 = 1;
    pub const MOUSE: u8 = 2;

    pub const COUNT: usize = 3;
}

/// Macro ids bound in the keymap.
pub mod macro_ids {
    pub const VERSION_INFO: u8 = 0;
    pub const ARROW: u8 = 1;
}

pub const ROW_COUNT: usize = 4;
pub const COL_COUNT: usize = 16;
