//! Settings images on the host: the same framed little-endian words the firmware keeps in flash.

use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use m100_common::{globals, settings::Settings};

pub fn encode(settings: &Settings) -> Vec<u8> {
    settings
        .image()
        .flat_map(|w| u16::from_le(w).to_le_bytes())
        .collect()
}

pub fn decode(bytes: &[u8]) -> Result<Settings> {
    if bytes.len() % 2 != 0 {
        return Err(anyhow!("settings image has an odd length ({})", bytes.len()));
    }
    Settings::from_image(
        bytes
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]).to_le()),
    )
    .map_err(|err| anyhow!("invalid settings image: {err:?}"))
}

pub fn read_file(path: &Path) -> Result<Settings> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode(&bytes).with_context(|| path.display().to_string())
}

/// Read `path`, or the default settings when it does not exist yet.
pub fn read_or_default(path: &Path) -> Result<Settings> {
    if fs::exists(path)? {
        read_file(path)
    } else {
        log::info!("{} not found; starting from defaults", path.display());
        Ok(Settings::default())
    }
}

pub fn write_file(path: &Path, settings: &Settings) -> Result<()> {
    fs::write(path, encode(settings)).with_context(|| format!("writing {}", path.display()))
}

pub fn setting_id(name: &str) -> Option<u16> {
    globals::NAMES
        .iter()
        .position(|n| n.eq_ignore_ascii_case(name))
        .map(|i| i as u16)
}

/// Apply a `name=value` assignment.
pub fn assign(settings: &mut Settings, assignment: &str) -> Result<()> {
    let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("expected name=value, got {assignment:?}"))?;
    let name = name.trim();
    let id = setting_id(name).ok_or_else(|| anyhow!("unknown setting {name:?}"))?;
    let value: u16 = value
        .trim()
        .parse()
        .with_context(|| format!("value for {name}"))?;
    settings
        .set(id, value)
        .map_err(|err| anyhow!("{name}={value}: {err:?}"))?;
    log::debug!("{name} set to {value}");
    Ok(())
}

/// `name = value` lines in id order.
pub fn describe(settings: &Settings) -> Vec<String> {
    globals::NAMES
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            settings
                .get(i as u16)
                .map(|value| format!("{name} = {value}"))
        })
        .collect()
}

#[cfg(test)]
#[path = "settings_file_test.rs"]
mod test;
