//! WAV decoding with down-mix to mono.

use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::error::{DspError, DspResult};
use crate::signal::Signal;

/// Reads a WAV file into a mono signal.
///
/// Integer PCM of 8, 16, 24 or 32 bits and 32-bit float are accepted.
/// Channels are averaged and samples normalized to [-1, 1].
pub fn read_wav(path: &Path) -> DspResult<Signal> {
    let reader = WavReader::open(path)?;
    decode(reader)
}

/// Reads WAV data from any byte source.
pub fn read_wav_from<R: Read>(source: R) -> DspResult<Signal> {
    let reader = WavReader::new(source)?;
    decode(reader)
}

fn decode<R: Read>(mut reader: WavReader<R>) -> DspResult<Signal> {
    let spec = reader.spec();

    let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, 8) => collect_int(reader.samples::<i8>(), 128.0)?,
        (SampleFormat::Int, 16) => collect_int(reader.samples::<i16>(), 32768.0)?,
        (SampleFormat::Int, 24) => collect_int(reader.samples::<i32>(), 8_388_608.0)?,
        (SampleFormat::Int, 32) => collect_int(reader.samples::<i32>(), 2_147_483_648.0)?,
        (format, bits) => {
            return Err(DspError::invalid_param(
                "bits_per_sample",
                format!("unsupported WAV layout: {:?} at {} bits", format, bits),
            ))
        }
    };

    Signal::new(downmix(&interleaved, spec.channels), spec.sample_rate)
}

fn collect_int<T, I>(samples: I, full_scale: f64) -> DspResult<Vec<f64>>
where
    T: Into<i32>,
    I: Iterator<Item = hound::Result<T>>,
{
    samples
        .map(|s| s.map(|v| v.into() as f64 / full_scale).map_err(DspError::from))
        .collect()
}

/// Averages interleaved frames down to one channel.
fn downmix(interleaved: &[f64], channels: u16) -> Vec<f64> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}
