pub mod builder;
pub mod keycodes;
pub mod settings_file;
pub mod version;

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;
