//! WAV file I/O.
//!
//! Writing produces 16-bit PCM mono files with no timestamps or variable
//! metadata, so identical samples always give identical bytes; the BLAKE3
//! hash of the PCM payload identifies a rendering. Reading accepts the common
//! PCM layouts and down-mixes to mono.

mod format;
mod reader;
mod result;
mod writer;


pub use format::WavFormat;
pub use reader::{read_wav, read_wav_from};
pub use result::WavResult;
pub use writer::{samples_to_pcm16, write_wav, write_wav_to_vec};
