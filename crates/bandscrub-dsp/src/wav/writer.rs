//! WAV encoding and PCM conversion.

use std::io::{self, Write};

use super::format::WavFormat;

/// Size of the canonical RIFF/fmt/data header.
const HEADER_LEN: usize = 44;

fn header(format: &WavFormat, data_size: u32) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    let fields: [&[u8]; 13] = [
        b"RIFF",
        &data_size.saturating_add(36).to_le_bytes(),
        b"WAVE",
        b"fmt ",
        &16u32.to_le_bytes(),
        &1u16.to_le_bytes(),
        &format.channels.to_le_bytes(),
        &format.sample_rate.to_le_bytes(),
        &format.byte_rate().to_le_bytes(),
        &format.block_align().to_le_bytes(),
        &format.bits_per_sample.to_le_bytes(),
        b"data",
        &data_size.to_le_bytes(),
    ];

    let mut pos = 0;
    for field in fields {
        out[pos..pos + field.len()].copy_from_slice(field);
        pos += field.len();
    }
    out
}

/// Writes a complete WAV file.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = u32::try_from(pcm_data.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PCM data exceeds 4 GiB"))?;
    writer.write_all(&header(format, data_size))?;
    writer.write_all(pcm_data)
}

/// Encodes a complete WAV file into memory.
///
/// PCM payloads over 4 GiB have their size fields truncated.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(HEADER_LEN + pcm_data.len());
    buffer.extend_from_slice(&header(format, pcm_data.len() as u32));
    buffer.extend_from_slice(pcm_data);
    buffer
}

/// Converts samples to little-endian 16-bit PCM, clipping to [-1, 1].
pub fn samples_to_pcm16(samples: &[f64]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&sample| {
            let value = (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16;
            value.to_le_bytes()
        })
        .collect()
}
