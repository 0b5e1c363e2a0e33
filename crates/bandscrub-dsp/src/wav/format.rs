//! WAV file format parameters.

/// Format of the files this crate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (always 16 for written files).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// 16-bit mono at `sample_rate`.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    pub(crate) fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}
