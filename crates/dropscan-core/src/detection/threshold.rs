use ndarray::Array2;

use crate::consts::OTSU_HISTOGRAM_BINS;

use super::config::Polarity;

/// Otsu's thresholding on an 8-bit plane: the level that maximizes the
/// between-class variance of the pixels at or below it versus the pixels above it.
///
/// A constant plane has no second class and yields 0.
pub fn otsu_threshold(data: &Array2<u8>) -> u8 {
    let mut histogram = [0u64; OTSU_HISTOGRAM_BINS];
    for &v in data.iter() {
        histogram[v as usize] += 1;
    }

    let total = data.len() as f64;
    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut weight_bg: f64 = 0.0;
    let mut sum_bg: f64 = 0.0;
    let mut best_variance = 0.0_f64;
    let mut best_bin = 0usize;

    for (i, &count) in histogram.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += i as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between_variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);

        if between_variance > best_variance {
            best_variance = between_variance;
            best_bin = i;
        }
    }

    best_bin as u8
}

/// Binarize an 8-bit plane against `threshold` with the given polarity.
pub fn binarize(data: &Array2<u8>, threshold: u8, polarity: Polarity) -> Array2<bool> {
    match polarity {
        Polarity::DarkOnLight => data.mapv(|v| v <= threshold),
        Polarity::LightOnDark => data.mapv(|v| v > threshold),
    }
}
