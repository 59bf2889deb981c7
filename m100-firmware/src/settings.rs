use embedded_storage::nor_flash::{NorFlash, NorFlashError, NorFlashErrorKind};
use m100_common::settings::{LoadError, Settings, IMAGE_MAX_PAYLOAD};

const IMAGE_MAX_BYTES: usize = (IMAGE_MAX_PAYLOAD + 3) * 2;
const BUF_SIZE: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    Flash,
    OutOfBounds,
    Unaligned,
    Load(LoadError),
}
impl From<LoadError> for SettingsError {
    fn from(err: LoadError) -> Self {
        Self::Load(err)
    }
}

fn flash_error<E: NorFlashError>(err: E) -> SettingsError {
    match err.kind() {
        NorFlashErrorKind::OutOfBounds => SettingsError::OutOfBounds,
        NorFlashErrorKind::NotAligned => SettingsError::Unaligned,
        _ => SettingsError::Flash,
    }
}

const fn round_up(n: usize, align: usize) -> usize {
    n.div_ceil(align) * align
}

/// Keeps the settings image in one erase sector of `flash`, starting at `offset`.
pub struct SettingsStore<F: NorFlash> {
    flash: F,
    offset: u32,
}

impl<F: NorFlash> SettingsStore<F> {
    pub fn new(flash: F, offset: u32) -> Self {
        Self { flash, offset }
    }

    pub fn into_inner(self) -> F {
        self.flash
    }

    pub fn read(&mut self) -> Result<Settings, SettingsError> {
        let mut buf = [0u8; BUF_SIZE];
        let buf = buf
            .get_mut(..round_up(IMAGE_MAX_BYTES, F::READ_SIZE))
            .ok_or(SettingsError::OutOfBounds)?;
        self.flash.read(self.offset, buf).map_err(flash_error)?;
        // the image words are stored little-endian, as produced by Settings::image
        Ok(Settings::from_image(
            buf.chunks_exact(2)
                .map(|b| u16::from_ne_bytes([b[0], b[1]])),
        )?)
    }

    /// Read the stored settings, falling back to defaults when the image is missing or damaged.
    pub fn load(&mut self) -> Settings {
        match self.read() {
            Ok(settings) => {
                crate::info!("settings loaded");
                settings
            }
            Err(SettingsError::Load(LoadError::Blank)) => {
                crate::info!("no stored settings");
                Settings::default()
            }
            Err(err) => {
                crate::error!("stored settings unusable {:?}", err);
                Settings::default()
            }
        }
    }

    pub fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        if self.offset as usize % F::ERASE_SIZE != 0 {
            return Err(SettingsError::Unaligned);
        }
        let mut buf = [0xffu8; BUF_SIZE];
        let mut n = 0;
        for (w, b) in settings.image().zip(buf.chunks_exact_mut(2)) {
            b.copy_from_slice(&w.to_ne_bytes());
            n += 2;
        }
        let len = round_up(n, F::WRITE_SIZE);
        if len > BUF_SIZE || n != settings.image_len() * 2 {
            return Err(SettingsError::OutOfBounds);
        }

        let erase_end = self.offset as usize + round_up(len, F::ERASE_SIZE);
        self.flash
            .erase(self.offset, erase_end as u32)
            .map_err(flash_error)?;
        self.flash
            .write(self.offset, &buf[..len])
            .map_err(flash_error)?;
        crate::debug!("settings saved {} bytes", n);
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod test;
