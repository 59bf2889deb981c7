use crate::globals;

pub const SETTINGS_VERSION: u16 = 1;
/// First word of a stored settings image.
pub const IMAGE_MAGIC: u16 = 0x4d31;
/// Largest payload, in words, a settings image may carry.
pub const IMAGE_MAX_PAYLOAD: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    VersionMismatch,
    Corrupt,
    Blank,
    Checksum,
    UnknownSetting(u16),
    OutOfRange(u16),
}

/// Tunables read at startup. Serialized as little-endian words:
///
/// settings version
/// word count of the id/value pairs that follow
/// (id, value) pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    values: [u16; globals::COUNT],
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            values: globals::DEFAULTS,
        }
    }
}

impl Settings {
    pub fn get(&self, id: u16) -> Option<u16> {
        self.values.get(id as usize).copied()
    }

    pub fn set(&mut self, id: u16, value: u16) -> Result<(), LoadError> {
        let max = *globals::MAX
            .get(id as usize)
            .ok_or(LoadError::UnknownSetting(id))?;
        if value > max {
            return Err(LoadError::OutOfRange(id));
        }
        self.values[id as usize] = value;
        Ok(())
    }

    /// Percentage of overlap needed for a dual-role key to take its hold role on rollover.
    pub fn qukeys_overlap(&self) -> u8 {
        self.values[globals::QUKEYS_OVERLAP as usize] as u8
    }

    /// Seconds without key activity before the LEDs switch off; 0 disables.
    pub fn idle_led_timeout(&self) -> u16 {
        self.values[globals::IDLE_LED_TIMEOUT as usize]
    }

    pub fn led_brightness(&self) -> u8 {
        self.values[globals::LED_BRIGHTNESS as usize] as u8
    }

    pub fn led_effect(&self) -> u8 {
        self.values[globals::LED_EFFECT as usize] as u8
    }

    pub fn load(iter: impl IntoIterator<Item = u16>) -> Result<Self, LoadError> {
        let mut iter = iter.into_iter();
        if u16::from_le(iter.next().ok_or(LoadError::Corrupt)?) != SETTINGS_VERSION {
            return Err(LoadError::VersionMismatch);
        }
        let mut count = u16::from_le(iter.next().ok_or(LoadError::Corrupt)?);
        if count & 1 == 1 {
            return Err(LoadError::Corrupt);
        }

        let mut settings = Self::default();
        while count != 0 {
            let id = u16::from_le(iter.next().ok_or(LoadError::Corrupt)?);
            let value = u16::from_le(iter.next().ok_or(LoadError::Corrupt)?);
            settings.set(id, value)?;
            count -= 2;
        }
        Ok(settings)
    }

    pub fn serialize(&self) -> impl Iterator<Item = u16> + '_ {
        [SETTINGS_VERSION, (self.values.len() * 2) as u16]
            .into_iter()
            .chain(
                self.values
                    .iter()
                    .enumerate()
                    .flat_map(|(i, v)| [i as u16, *v]),
            )
            .map(u16::to_le)
    }

    pub fn serialized_len(&self) -> usize {
        2 + self.values.len() * 2
    }

    /// The serialized words framed for storage:
    ///
    /// [IMAGE_MAGIC], payload length, payload, checksum
    pub fn image(&self) -> impl Iterator<Item = u16> + '_ {
        let len = self.serialized_len() as u16;
        let sum = checksum(
            [IMAGE_MAGIC, len]
                .into_iter()
                .chain(self.serialize().map(u16::from_le)),
        );
        [IMAGE_MAGIC, len]
            .into_iter()
            .map(u16::to_le)
            .chain(self.serialize())
            .chain([sum.to_le()])
    }

    pub fn image_len(&self) -> usize {
        self.serialized_len() + 3
    }

    /// Unframe and load a stored image. Words following the checksum are ignored.
    pub fn from_image(iter: impl IntoIterator<Item = u16>) -> Result<Self, LoadError> {
        let mut iter = iter.into_iter().map(u16::from_le);
        let magic = iter.next().ok_or(LoadError::Corrupt)?;
        if magic == 0xffff || magic == 0 {
            return Err(LoadError::Blank);
        }
        if magic != IMAGE_MAGIC {
            return Err(LoadError::Corrupt);
        }
        let len = iter.next().ok_or(LoadError::Corrupt)?;
        if len as usize > IMAGE_MAX_PAYLOAD {
            return Err(LoadError::Corrupt);
        }
        let mut payload = [0u16; IMAGE_MAX_PAYLOAD];
        for w in payload.iter_mut().take(len as usize) {
            *w = iter.next().ok_or(LoadError::Corrupt)?;
        }
        let payload = &payload[..len as usize];
        let sum = iter.next().ok_or(LoadError::Corrupt)?;
        if checksum([IMAGE_MAGIC, len].into_iter().chain(payload.iter().copied())) != sum {
            return Err(LoadError::Checksum);
        }
        Self::load(payload.iter().map(|w| w.to_le()))
    }
}

fn checksum(words: impl Iterator<Item = u16>) -> u16 {
    words.fold(0x5a5a, |acc, w| acc.rotate_left(3) ^ w)
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod test;
