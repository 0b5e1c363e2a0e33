//! bandscrub CLI library.
//!
//! Command implementations behind the `bandscrub` binary: running the noise
//! injection pipeline, designing filters, synthesizing noise and analyzing
//! WAV files. Each command prints colored text or, with `--json`, a single
//! JSON document.

pub mod commands;
