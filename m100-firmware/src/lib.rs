#![no_std]
pub mod keymap;
pub mod layout;
pub mod leds;
pub mod mapper;
pub mod scan;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod flash_test_stub;
#[cfg(test)]
pub mod time_driver_test_stub;

#[macro_use]
mod macros;
