//! Decibel conversion utilities for frame-level amplitude sequences.

/// dB value assigned to every frame when the whole buffer is silent.
pub const DB_FLOOR: f64 = -80.0;

/// Ratio floor applied before taking the logarithm, so that individual
/// silent frames inside an otherwise loud recording stay finite.
const RATIO_FLOOR: f64 = 1e-10;

/// Convert a sequence of RMS amplitudes to dB relative to the loudest frame.
///
/// The reference is the maximum amplitude across all frames, so the loudest
/// frame maps to 0 dB. If the reference is exactly zero (true silence
/// throughout) every frame is assigned [`DB_FLOOR`] instead of computing a
/// ratio.
///
/// # Arguments
/// * `amplitudes` - Per-frame RMS amplitudes
///
/// # Returns
/// Per-frame levels in dB, same length as the input
pub fn amplitude_to_db(amplitudes: &[f64]) -> Vec<f64> {
    let reference = amplitudes.iter().copied().fold(0.0_f64, f64::max);
    if reference == 0.0 {
        return vec![DB_FLOOR; amplitudes.len()];
    }

    amplitudes
        .iter()
        .map(|&a| 20.0 * (a / reference).max(RATIO_FLOOR).log10())
        .collect()
}
