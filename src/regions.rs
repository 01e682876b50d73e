//! Quiet-region detection and split-point selection.
//!
//! Scans the smoothed feature sequences frame by frame, tracking entry and
//! exit of "not playing" runs. Runs that last long enough become
//! [`QuietRegion`]s; each retained region contributes one split point at its
//! temporal midpoint.

use crate::analysis::Thresholds;

/// Half-open frame interval `[start_frame, end_frame)` during which
/// "not playing" held continuously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietRegion {
    pub start_frame: usize,
    pub end_frame: usize,
}

impl QuietRegion {
    pub fn start_sec(&self, frame_to_sec: f64) -> f64 {
        self.start_frame as f64 * frame_to_sec
    }

    pub fn end_sec(&self, frame_to_sec: f64) -> f64 {
        self.end_frame as f64 * frame_to_sec
    }

    pub fn duration_sec(&self, frame_to_sec: f64) -> f64 {
        (self.end_frame - self.start_frame) as f64 * frame_to_sec
    }
}

/// Collect runs of "not playing" frames lasting at least
/// `min_silence_duration` seconds.
///
/// A frame is "not playing" when either its energy or its bandwidth falls
/// below the corresponding threshold; low energy catches true silence,
/// narrow bandwidth catches talk-only passages. A run still open at the
/// final frame is closed at end-of-buffer and filtered the same way.
/// Regions are returned in frame order and never overlap.
pub fn detect_quiet_regions(
    energy_db: &[f64],
    bandwidth_hz: &[f64],
    thresholds: &Thresholds,
    frame_to_sec: f64,
    min_silence_duration: f64,
) -> Vec<QuietRegion> {
    debug_assert_eq!(energy_db.len(), bandwidth_hz.len());

    let mut regions = Vec::new();
    let mut run_start: Option<usize> = None;

    for i in 0..energy_db.len() {
        let not_playing =
            energy_db[i] < thresholds.energy_db || bandwidth_hz[i] < thresholds.bandwidth_hz;

        match (not_playing, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                close_run(&mut regions, start, i, frame_to_sec, min_silence_duration);
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        close_run(
            &mut regions,
            start,
            energy_db.len(),
            frame_to_sec,
            min_silence_duration,
        );
    }

    regions
}

fn close_run(
    regions: &mut Vec<QuietRegion>,
    start_frame: usize,
    end_frame: usize,
    frame_to_sec: f64,
    min_silence_duration: f64,
) {
    let region = QuietRegion {
        start_frame,
        end_frame,
    };
    if region.duration_sec(frame_to_sec) >= min_silence_duration {
        regions.push(region);
    }
}

/// Convert each quiet region into a single sample-offset split point: the
/// midpoint frame of the run, as a sample index.
///
/// Splitting in the middle of the quiet stretch rather than at its edges
/// leaves silence padding on both sides of the cut.
pub fn split_sample_offsets(regions: &[QuietRegion], hop_length: usize) -> Vec<usize> {
    regions
        .iter()
        .map(|r| ((r.start_frame + r.end_frame) / 2) * hop_length)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds {
            energy_db: -20.0,
            energy_loud_mean_db: -5.0,
            bandwidth_hz: 1000.0,
            bandwidth_loud_mean_hz: 2500.0,
        }
    }

    // One frame per second keeps the test arithmetic readable.
    const FRAME_TO_SEC: f64 = 1.0;

    #[test]
    fn test_quiet_run_in_the_middle() {
        let energy = vec![-5.0, -5.0, -30.0, -30.0, -30.0, -5.0, -5.0];
        let bandwidth = vec![2000.0; 7];
        let regions = detect_quiet_regions(&energy, &bandwidth, &thresholds(), FRAME_TO_SEC, 3.0);

        assert_eq!(
            regions,
            vec![QuietRegion {
                start_frame: 2,
                end_frame: 5
            }]
        );
    }

    #[test]
    fn test_short_run_is_filtered() {
        let energy = vec![-5.0, -30.0, -30.0, -5.0];
        let bandwidth = vec![2000.0; 4];
        let regions = detect_quiet_regions(&energy, &bandwidth, &thresholds(), FRAME_TO_SEC, 3.0);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_narrow_bandwidth_alone_is_not_playing() {
        // Loud talk: energy above threshold, bandwidth narrow.
        let energy = vec![-5.0; 6];
        let bandwidth = vec![2000.0, 500.0, 500.0, 500.0, 500.0, 2000.0];
        let regions = detect_quiet_regions(&energy, &bandwidth, &thresholds(), FRAME_TO_SEC, 3.0);

        assert_eq!(
            regions,
            vec![QuietRegion {
                start_frame: 1,
                end_frame: 5
            }]
        );
    }

    #[test]
    fn test_open_run_closes_at_end_of_buffer() {
        let energy = vec![-5.0, -5.0, -30.0, -30.0, -30.0];
        let bandwidth = vec![2000.0; 5];
        let regions = detect_quiet_regions(&energy, &bandwidth, &thresholds(), FRAME_TO_SEC, 3.0);

        assert_eq!(
            regions,
            vec![QuietRegion {
                start_frame: 2,
                end_frame: 5
            }]
        );
    }

    #[test]
    fn test_open_run_at_end_still_duration_filtered() {
        let energy = vec![-5.0, -5.0, -5.0, -30.0, -30.0];
        let bandwidth = vec![2000.0; 5];
        let regions = detect_quiet_regions(&energy, &bandwidth, &thresholds(), FRAME_TO_SEC, 3.0);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_multiple_regions_stay_ordered() {
        let energy = vec![
            -30.0, -30.0, -30.0, -5.0, -5.0, -5.0, -30.0, -30.0, -30.0, -30.0,
        ];
        let bandwidth = vec![2000.0; 10];
        let regions = detect_quiet_regions(&energy, &bandwidth, &thresholds(), FRAME_TO_SEC, 3.0);

        assert_eq!(regions.len(), 2);
        assert!(regions[0].end_frame <= regions[1].start_frame);
    }

    #[test]
    fn test_split_offsets_at_region_midpoints() {
        let regions = vec![
            QuietRegion {
                start_frame: 2,
                end_frame: 5,
            },
            QuietRegion {
                start_frame: 10,
                end_frame: 15,
            },
        ];
        // (2 + 5) / 2 = 3, (10 + 15) / 2 = 12
        assert_eq!(split_sample_offsets(&regions, 2048), vec![3 * 2048, 12 * 2048]);
    }
}
