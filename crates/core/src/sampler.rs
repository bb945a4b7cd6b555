/// Sampling timestamps for visual analysis: evenly spaced over the first 90%
/// of the clip. The final 10% is skipped since it is often credits or fade.
///
/// Returns an empty sequence for non-positive durations or a zero frame
/// count; callers treat that as "no visual signal", not as an error.
pub fn sample_times(duration: f64, num_frames: usize) -> Vec<f64> {
    if duration <= 0.0 || num_frames == 0 {
        return Vec::new();
    }
    if num_frames == 1 {
        return vec![0.0];
    }

    let end = duration * 0.9;
    let step = end / (num_frames - 1) as f64;
    (0..num_frames).map(|i| i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_exact_count_within_bounds() {
        for &(duration, n) in &[(10.0, 5), (1.0, 3), (120.0, 7), (0.5, 1)] {
            let times = sample_times(duration, n);
            assert_eq!(times.len(), n);
            for t in &times {
                assert!(*t >= 0.0 && *t <= duration * 0.9 + 1e-9);
            }
        }
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let times = sample_times(33.3, 9);
        for pair in times.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn spans_the_first_ninety_percent() {
        let times = sample_times(10.0, 5);
        assert_eq!(times[0], 0.0);
        assert!((times[4] - 9.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_inputs_yield_empty() {
        assert!(sample_times(0.0, 5).is_empty());
        assert!(sample_times(-2.0, 5).is_empty());
        assert!(sample_times(10.0, 0).is_empty());
    }

    #[test]
    fn single_frame_samples_the_start() {
        assert_eq!(sample_times(60.0, 1), vec![0.0]);
    }
}
