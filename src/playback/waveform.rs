//! Waveform peaks for the bar-style track renderer.
//!
//! A decoded track is reduced once to a fixed number of peak values (the
//! loudest absolute sample per bucket, across all channels), normalized so the
//! loudest bar reaches 1.0. Drawing then only resamples those peaks to the
//! width at hand.

/// Reduce interleaved samples to `buckets` normalized peaks.
pub fn compute_peaks(samples: &[f32], channels: u16, buckets: usize) -> Vec<f32> {
    if buckets == 0 {
        return Vec::new();
    }
    let channels = channels.max(1) as usize;
    let frames = samples.len() / channels;
    if frames == 0 {
        return vec![0.0; buckets];
    }

    let frames_per_bucket = frames as f64 / buckets as f64;
    let mut peaks: Vec<f32> = (0..buckets)
        .map(|i| {
            let start = (i as f64 * frames_per_bucket) as usize;
            let end = (((i + 1) as f64 * frames_per_bucket) as usize)
                .max(start + 1)
                .min(frames);
            samples[start * channels..end * channels]
                .iter()
                .fold(0.0f32, |peak, s| peak.max(s.abs()))
        })
        .collect();

    normalize(&mut peaks);
    peaks
}

fn normalize(peaks: &mut [f32]) {
    let max = peaks.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        for peak in peaks.iter_mut() {
            *peak = (*peak / max).min(1.0);
        }
    }
}

/// Resample peaks to `count` bars for display.
pub fn display_bars(peaks: &[f32], count: usize) -> Vec<f32> {
    if peaks.is_empty() {
        return vec![0.0; count];
    }

    let step = peaks.len() as f32 / count as f32;
    (0..count)
        .map(|i| {
            let idx = (i as f32 * step) as usize;
            peaks.get(idx).copied().unwrap_or(0.0)
        })
        .collect()
}

/// Convert amplitude to terminal block characters for visualization
pub fn amplitude_to_blocks(amplitude: f32) -> &'static str {
    let normalized = amplitude.abs().min(1.0);
    let index = (normalized * 8.0) as usize;

    match index {
        0 => " ",
        1 => "▁",
        2 => "▂",
        3 => "▃",
        4 => "▄",
        5 => "▅",
        6 => "▆",
        7 => "▇",
        _ => "█",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_peaks_normalizes() {
        let samples = [0.1, -0.5, 0.25, 0.0];
        let peaks = compute_peaks(&samples, 1, 2);
        assert_eq!(peaks, vec![1.0, 0.5]);
    }

    #[test]
    fn test_compute_peaks_folds_channels() {
        // Two stereo frames: the right channel carries the peak of frame 2
        let samples = [0.2, 0.1, 0.1, -0.8];
        let peaks = compute_peaks(&samples, 2, 2);
        assert_eq!(peaks, vec![0.25, 1.0]);
    }

    #[test]
    fn test_compute_peaks_silence_and_empty() {
        assert_eq!(compute_peaks(&[0.0; 8], 1, 4), vec![0.0; 4]);
        assert_eq!(compute_peaks(&[], 2, 3), vec![0.0; 3]);
        assert!(compute_peaks(&[0.5], 1, 0).is_empty());
    }

    #[test]
    fn test_compute_peaks_more_buckets_than_frames() {
        let peaks = compute_peaks(&[0.5, 1.0], 1, 4);
        assert_eq!(peaks.len(), 4);
        assert!(peaks.iter().all(|p| *p > 0.0));
    }

    #[test]
    fn test_display_bars_empty() {
        let bars = display_bars(&[], 10);
        assert_eq!(bars.len(), 10);
        assert!(bars.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_display_bars_downsampling() {
        let peaks = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
        let bars = display_bars(&peaks, 5);
        assert_eq!(bars, vec![0.1, 0.3, 0.5, 0.7, 0.9]);
    }

    #[test]
    fn test_amplitude_to_blocks() {
        assert_eq!(amplitude_to_blocks(0.0), " ");
        assert_eq!(amplitude_to_blocks(0.13), "▁");
        assert_eq!(amplitude_to_blocks(0.5), "▄");
        assert_eq!(amplitude_to_blocks(0.88), "▇");
        assert_eq!(amplitude_to_blocks(1.0), "█");
        assert_eq!(amplitude_to_blocks(1.5), "█");
        assert_eq!(amplitude_to_blocks(-0.9), "▇");
    }
}
