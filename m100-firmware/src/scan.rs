use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};

/// A physical key position on the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPosition {
    pub row: u8,
    pub col: u8,
}
impl KeyPosition {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// A key switch change as delivered by the matrix scanner. Bit 7 of `row` is set while the switch
/// is down.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanKey {
    row: u8,
    col: u8,
}
impl ScanKey {
    pub fn new(row: u8, col: u8, is_down: bool) -> Self {
        Self {
            row: (row & 0x7f) | if is_down { 0x80 } else { 0 },
            col,
        }
    }

    pub fn position(&self) -> KeyPosition {
        KeyPosition::new(self.row & 0x7f, self.col)
    }

    pub fn is_down(&self) -> bool {
        self.row & 0x80 == 0x80
    }
}

/// A [ScanKey] stamped with the millisecond it was processed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedScanKey(pub ScanKey, pub u64);
impl TimedScanKey {
    pub fn position(&self) -> KeyPosition {
        self.0.position()
    }

    pub fn is_down(&self) -> bool {
        self.0.is_down()
    }

    pub fn time(&self) -> u64 {
        self.1
    }
}

pub struct KeyScannerChannel<M: RawMutex, const N: usize>(Channel<M, ScanKey, N>);
impl<M: RawMutex, const N: usize> Default for KeyScannerChannel<M, N> {
    fn default() -> Self {
        Self(Channel::new())
    }
}
impl<M: RawMutex, const N: usize> KeyScannerChannel<M, N> {
    pub async fn receive(&self) -> ScanKey {
        self.0.receive().await
    }

    pub fn try_send(&self, msg: ScanKey) {
        if self.0.try_send(msg).is_err() {
            crate::warn!("scan channel full, dropped {:?}", msg);
        }
    }
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod test;
