//! Per-frame feature extraction: RMS energy and spectral bandwidth.
//!
//! The recording is sliced into overlapping fixed-size frames. Each frame
//! yields two numbers:
//! - RMS energy, a proxy for loudness
//! - spectral bandwidth, the power-weighted spread of the spectrum around
//!   its centroid
//!
//! A full band lights up the whole spectrum (wide bandwidth), while talk-only
//! passages and silence stay narrow. Both features together separate
//! "playing" from "not playing" more reliably than loudness alone.

use chfft::RFft1D;

use crate::error::SplitError;

/// Total spectral power below this counts as true silence, for which
/// bandwidth is defined as 0 ("narrow") rather than dividing by zero.
const POWER_FLOOR: f64 = 1e-20;

/// Equal-length per-frame feature sequences. Frame `i` covers samples
/// `[i * hop_length, i * hop_length + frame_length)`.
#[derive(Debug, Clone)]
pub struct FrameFeatures {
    /// RMS amplitude per frame (linear, not dB).
    pub rms: Vec<f64>,
    /// Spectral bandwidth per frame in Hz.
    pub bandwidth_hz: Vec<f64>,
}

/// Number of analysis frames covering `num_samples` samples.
///
/// Fails if the buffer is shorter than a single frame; an empty feature
/// sequence is never produced silently.
pub fn frame_count(
    num_samples: usize,
    frame_length: usize,
    hop_length: usize,
) -> Result<usize, SplitError> {
    if num_samples < frame_length {
        return Err(SplitError::InvalidInput(format!(
            "buffer of {} samples is shorter than one {}-sample analysis frame",
            num_samples, frame_length
        )));
    }
    Ok(1 + (num_samples - frame_length) / hop_length)
}

/// Extract RMS energy and spectral bandwidth for every frame of the buffer.
///
/// Pure computation over fixed-size slices; each frame depends only on its
/// own samples.
pub fn extract(
    samples: &[f32],
    sample_rate: u32,
    frame_length: usize,
    hop_length: usize,
) -> Result<FrameFeatures, SplitError> {
    let n_frames = frame_count(samples.len(), frame_length, hop_length)?;

    let window = hann_window(frame_length);
    let mut fft = RFft1D::<f64>::new(frame_length);
    let mut windowed = vec![0.0_f64; frame_length];

    let mut rms = Vec::with_capacity(n_frames);
    let mut bandwidth_hz = Vec::with_capacity(n_frames);

    for i in 0..n_frames {
        let start = i * hop_length;
        let frame = &samples[start..start + frame_length];

        rms.push(frame_rms(frame));

        for (out, (&s, &w)) in windowed.iter_mut().zip(frame.iter().zip(window.iter())) {
            *out = s as f64 * w;
        }
        let spectrum = fft.forward(&windowed);
        let power: Vec<f64> = spectrum.iter().map(|c| c.norm_sqr()).collect();
        bandwidth_hz.push(spectral_bandwidth(&power, sample_rate, frame_length));
    }

    Ok(FrameFeatures { rms, bandwidth_hz })
}

/// Root mean square amplitude of one frame.
fn frame_rms(frame: &[f32]) -> f64 {
    let sum_squares: f64 = frame.iter().map(|&s| s as f64 * s as f64).sum();
    (sum_squares / frame.len() as f64).sqrt()
}

/// Power-weighted RMS deviation of bin frequencies from the spectral
/// centroid, over the non-negative frequency bins of one frame.
///
/// # Arguments
/// * `power` - Power spectrum (squared magnitudes), bin `k` at frequency
///   `k * sample_rate / frame_length`
/// * `sample_rate` - Sample rate in Hz
/// * `frame_length` - FFT size the spectrum was computed with
///
/// # Returns
/// Bandwidth in Hz, or 0 when total power is below the silence floor
fn spectral_bandwidth(power: &[f64], sample_rate: u32, frame_length: usize) -> f64 {
    let total_power: f64 = power.iter().sum();
    if total_power < POWER_FLOOR {
        return 0.0;
    }

    let bin_hz = sample_rate as f64 / frame_length as f64;

    let centroid: f64 = power
        .iter()
        .enumerate()
        .map(|(k, &p)| k as f64 * bin_hz * p)
        .sum::<f64>()
        / total_power;

    let variance: f64 = power
        .iter()
        .enumerate()
        .map(|(k, &p)| {
            let delta = k as f64 * bin_hz - centroid;
            delta * delta * p
        })
        .sum::<f64>()
        / total_power;

    variance.sqrt()
}

/// Symmetric Hann window of the given length.
fn hann_window(len: usize) -> Vec<f64> {
    if len <= 1 {
        return vec![1.0; len];
    }
    (0..len)
        .map(|n| {
            let phase = 2.0 * std::f64::consts::PI * n as f64 / (len - 1) as f64;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}
