//! Automatic splitting of long continuous session recordings into one track
//! per performed piece.
//!
//! A live-band studio session is hours of songs interleaved with talk and
//! silence. "Band playing" and "not playing" intervals are told apart by
//! combining per-frame RMS energy with spectral bandwidth: a full band
//! lights up the whole spectrum, while speech and silence stay narrow.
//! Detected quiet stretches become split points, and spuriously short
//! segments are merged into their predecessor.
//!
//! The core entry point is [`detect_splits`], a pure function over a mono
//! sample buffer. [`split_and_save`] wraps it with file decoding and
//! per-track WAV export.

pub mod analysis;
pub mod audio_file;
pub mod config;
pub mod decibel;
pub mod error;
pub mod features;
pub mod regions;
pub mod splitter;

pub use analysis::Thresholds;
pub use audio_file::{load_audio, write_wav_mono, DecodedAudio};
pub use config::{Defaults, SplitConfig};
pub use error::{AudioFileError, SplitError};
pub use regions::QuietRegion;
pub use splitter::{
    detect_splits, split_and_save, QuietSpan, Segment, SplitAnalysis, SplitResult,
};
