//! Feature-sequence analysis: smoothing and adaptive threshold estimation.

/// dB margin below the performing-level mean for the energy threshold.
const ENERGY_MARGIN_DB: f64 = 15.0;

/// Fraction of the performing-level bandwidth below which a frame counts as
/// "narrow" (talk or silence).
const BANDWIDTH_FACTOR: f64 = 0.4;

/// Thresholds derived from the smoothed feature sequences, together with the
/// loud-region means that produced them. Exposed for diagnostics and tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Frames quieter than this are candidates for "not playing".
    pub energy_db: f64,
    /// Mean smoothed energy of the top quartile of frames.
    pub energy_loud_mean_db: f64,
    /// Frames narrower than this are candidates for "not playing".
    pub bandwidth_hz: f64,
    /// Mean smoothed bandwidth of the top quartile of frames.
    pub bandwidth_loud_mean_hz: f64,
}

/// Centered moving average with zero padding at the edges, so the output has
/// the same length as the input (a `same`-mode convolution with a uniform
/// kernel). Window sizes below 2 return the input unchanged.
pub fn smooth(data: &[f64], window_size: usize) -> Vec<f64> {
    if window_size <= 1 {
        return data.to_vec();
    }

    let len = data.len();
    // Even windows are left-biased by one sample, matching the alignment of
    // a same-mode convolution.
    let offset = (window_size - 1) / 2;
    let mut out = Vec::with_capacity(len);

    for i in 0..len {
        let hi = (i + offset).min(len - 1);
        let lo = (i + offset + 1).saturating_sub(window_size);
        let sum: f64 = data[lo..=hi].iter().sum();
        out.push(sum / window_size as f64);
    }

    out
}

/// Derive the energy and bandwidth thresholds from the smoothed sequences.
///
/// The mean of the top 25% of each sequence estimates the "during active
/// performance" level without being skewed by long quiet stretches. The
/// energy threshold sits a fixed margin below that mean; the bandwidth
/// threshold is a fixed fraction of it.
pub fn estimate_thresholds(energy_db: &[f64], bandwidth_hz: &[f64]) -> Thresholds {
    let energy_loud_mean_db = loud_mean(energy_db);
    let bandwidth_loud_mean_hz = loud_mean(bandwidth_hz);

    Thresholds {
        energy_db: energy_loud_mean_db - ENERGY_MARGIN_DB,
        energy_loud_mean_db,
        bandwidth_hz: bandwidth_loud_mean_hz * BANDWIDTH_FACTOR,
        bandwidth_loud_mean_hz,
    }
}

/// Mean of the top quartile of a sequence.
fn loud_mean(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let start = (sorted.len() as f64 * 0.75) as usize;
    let top = &sorted[start..];
    top.iter().sum::<f64>() / top.len() as f64
}
