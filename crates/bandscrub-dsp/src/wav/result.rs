//! Encoded WAV output.

use std::path::Path;

use crate::error::DspResult;
use crate::signal::Signal;

use super::format::WavFormat;
use super::writer::{samples_to_pcm16, write_wav_to_vec};

/// An encoded 16-bit mono WAV file.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM payload only.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes mono samples.
    pub fn from_mono(samples: &[f64], sample_rate: u32) -> Self {
        let pcm = samples_to_pcm16(samples);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let wav_data = write_wav_to_vec(&WavFormat::mono(sample_rate), &pcm);

        Self {
            wav_data,
            pcm_hash,
            sample_rate,
            num_samples: samples.len(),
        }
    }

    /// Encodes a signal.
    pub fn from_signal(signal: &Signal) -> Self {
        Self::from_mono(signal.samples(), signal.sample_rate())
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples as f64 / self.sample_rate as f64
    }

    /// Writes the file to `path`.
    pub fn write_to(&self, path: &Path) -> DspResult<()> {
        std::fs::write(path, &self.wav_data)?;
        Ok(())
    }
}
