//! The segmentation pipeline: frame features, smoothing, adaptive
//! thresholds, quiet regions, split points, and segment merging.
//!
//! The whole pipeline is a synchronous batch computation over an immutable
//! sample buffer. It never blocks on I/O and holds no shared state, so it is
//! safe to invoke repeatedly and concurrently with different buffers.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::analysis::{self, Thresholds};
use crate::audio_file;
use crate::config::SplitConfig;
use crate::decibel;
use crate::error::{AudioFileError, SplitError};
use crate::features;
use crate::regions;

/// One performed piece within the recording.
///
/// Segments tile `[0, total_duration)`: they are contiguous, non-overlapping
/// and carry dense 0-based indices. Boundaries are constructed from sample
/// offsets, so `start_sec` and `end_sec` are exact multiples of
/// `1 / sample_rate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start_sec: f64,
    pub end_sec: f64,
    pub duration_sec: f64,
}

/// Time range of a retained quiet region, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuietSpan {
    pub start_sec: f64,
    pub end_sec: f64,
}

/// Diagnostics produced alongside the segment list, replacing print-style
/// progress reporting. Always populated, even when no split was found.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitAnalysis {
    /// Number of analysis frames.
    pub frame_count: usize,
    /// Seconds covered by one frame hop.
    pub frame_duration_sec: f64,
    /// Adaptive thresholds and the loud-region means behind them.
    pub thresholds: Thresholds,
    /// Retained quiet regions in time order.
    pub quiet_spans: Vec<QuietSpan>,
    /// Chosen split points as sample offsets, ascending.
    pub split_sample_offsets: Vec<usize>,
}

/// Segments plus the diagnostics of the run that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    pub segments: Vec<Segment>,
    pub analysis: SplitAnalysis,
}

/// Partition a mono recording into one segment per performed piece.
///
/// Identical input and configuration always yield an identical result.
/// A single-segment result (no quiet region long enough to split at) is a
/// valid outcome, not an error.
pub fn detect_splits(
    samples: &[f32],
    sample_rate: u32,
    config: &SplitConfig,
) -> Result<SplitResult, SplitError> {
    config.validate()?;
    if sample_rate == 0 {
        return Err(SplitError::InvalidInput(
            "sample rate must be positive".to_string(),
        ));
    }

    let frame_to_sec = config.hop_length as f64 / sample_rate as f64;
    // Smoothing window of about one real second of frames
    let smooth_frames = ((1.0 / frame_to_sec) as usize).max(1);

    let feats = features::extract(samples, sample_rate, config.frame_length, config.hop_length)?;
    let energy_db = analysis::smooth(&decibel::amplitude_to_db(&feats.rms), smooth_frames);
    let bandwidth_hz = analysis::smooth(&feats.bandwidth_hz, smooth_frames);

    let thresholds = analysis::estimate_thresholds(&energy_db, &bandwidth_hz);
    info!(
        "energy threshold {:.1} dB (performing mean {:.1} dB), bandwidth threshold {:.0} Hz (performing mean {:.0} Hz)",
        thresholds.energy_db,
        thresholds.energy_loud_mean_db,
        thresholds.bandwidth_hz,
        thresholds.bandwidth_loud_mean_hz
    );

    let quiet = regions::detect_quiet_regions(
        &energy_db,
        &bandwidth_hz,
        &thresholds,
        frame_to_sec,
        config.min_silence_duration,
    );
    info!("{} quiet region(s) long enough to split at", quiet.len());
    for (i, region) in quiet.iter().enumerate() {
        debug!(
            "quiet region {}: {:.1}s - {:.1}s ({:.1}s)",
            i + 1,
            region.start_sec(frame_to_sec),
            region.end_sec(frame_to_sec),
            region.duration_sec(frame_to_sec)
        );
    }

    let splits = regions::split_sample_offsets(&quiet, config.hop_length);
    let segments = build_segments(
        samples.len(),
        sample_rate,
        &splits,
        config.min_song_duration,
    );

    Ok(SplitResult {
        segments,
        analysis: SplitAnalysis {
            frame_count: feats.rms.len(),
            frame_duration_sec: frame_to_sec,
            thresholds,
            quiet_spans: quiet
                .iter()
                .map(|r| QuietSpan {
                    start_sec: r.start_sec(frame_to_sec),
                    end_sec: r.end_sec(frame_to_sec),
                })
                .collect(),
            split_sample_offsets: splits,
        },
    })
}

/// Build segments from split offsets and the buffer boundaries, merging any
/// provisional segment shorter than `min_song_duration` into its
/// predecessor.
///
/// The merge is a single left-to-right pass over provisional segments; it
/// never re-evaluates already accepted segments against later ones. The very
/// first provisional segment has no predecessor and is kept regardless of
/// its own duration. Indices are assigned once, on the freshly built final
/// list.
fn build_segments(
    total_samples: usize,
    sample_rate: u32,
    split_offsets: &[usize],
    min_song_duration: f64,
) -> Vec<Segment> {
    let mut boundaries = Vec::with_capacity(split_offsets.len() + 2);
    boundaries.push(0);
    boundaries.extend_from_slice(split_offsets);
    boundaries.push(total_samples);
    boundaries.sort_unstable();

    // Merge in the sample domain; seconds are derived once at the end.
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for pair in boundaries.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let duration_sec = (end - start) as f64 / sample_rate as f64;
        match merged.last_mut() {
            Some(prev) if duration_sec < min_song_duration => prev.1 = end,
            _ => merged.push((start, end)),
        }
    }

    merged
        .iter()
        .enumerate()
        .map(|(index, &(start, end))| {
            let start_sec = start as f64 / sample_rate as f64;
            let end_sec = end as f64 / sample_rate as f64;
            Segment {
                index,
                start_sec,
                end_sec,
                duration_sec: end_sec - start_sec,
            }
        })
        .collect()
}

/// Decode `input_path`, detect song boundaries, and write one WAV per
/// segment into `output_dir` as `{stem}_track{NN}.wav`.
///
/// The output directory is created if needed. Returns the segments and
/// diagnostics of the run.
pub fn split_and_save(
    input_path: &Path,
    output_dir: &Path,
    config: &SplitConfig,
) -> Result<SplitResult, AudioFileError> {
    fs::create_dir_all(output_dir)?;

    let decoded = audio_file::load_audio(input_path)?;
    info!(
        "loaded {}: {:.1}s at {} Hz",
        input_path.display(),
        decoded.duration_sec(),
        decoded.sample_rate
    );

    let result = detect_splits(&decoded.samples, decoded.sample_rate, config)?;

    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("session");

    for segment in &result.segments {
        let start = (segment.start_sec * decoded.sample_rate as f64).round() as usize;
        let end = ((segment.end_sec * decoded.sample_rate as f64).round() as usize)
            .min(decoded.samples.len());

        let filename = format!("{}_track{:02}.wav", stem, segment.index + 1);
        let path = output_dir.join(&filename);
        audio_file::write_wav_mono(&path, &decoded.samples[start..end], decoded.sample_rate)?;
        info!("wrote {} ({:.1}s)", path.display(), segment.duration_sec);
    }

    Ok(result)
}
