use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{BINOMIAL_KERNEL_5, PARALLEL_PIXEL_THRESHOLD};

/// Blur an 8-bit plane with a `ksize` x `ksize` Gaussian, rounding back to 8 bits.
///
/// The sigma is derived from the kernel size the same way common vision
/// libraries do when none is given: `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`.
/// Borders are reflected without repeating the edge pixel.
pub fn gaussian_blur_u8(data: &Array2<u8>, ksize: usize) -> Array2<u8> {
    let kernel = gaussian_kernel(ksize);
    let as_float = data.mapv(|v| v as f32);
    let row_pass = convolve_rows(&as_float, &kernel);
    convolve_cols(&row_pass, &kernel).mapv(|v| v.round().clamp(0.0, 255.0) as u8)
}

/// Build a normalized 1D Gaussian kernel of odd length `ksize`.
/// Even sizes are rounded up to the next odd size.
pub fn gaussian_kernel(ksize: usize) -> Vec<f32> {
    let size = ksize.max(1) | 1;
    if size == BINOMIAL_KERNEL_5.len() {
        return BINOMIAL_KERNEL_5.to_vec();
    }
    if size == 1 {
        return vec![1.0];
    }

    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let radius = size / 2;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / s2).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Reflect-101 index: `dcb|abcd|cba`.
fn reflect_101(idx: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = idx;
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

fn convolve_line(line: &[f32], kernel: &[f32], out: &mut [f32]) {
    let radius = kernel.len() / 2;
    let len = line.len();
    for (i, dst) in out.iter_mut().enumerate() {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let src = reflect_101(i as isize + ki as isize - radius as isize, len);
            sum += line[src] * kv;
        }
        *dst = sum;
    }
}

fn convolve_rows(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| {
                let line: Vec<f32> = data.row(row).to_vec();
                let mut out = vec![0.0f32; w];
                convolve_line(&line, kernel, &mut out);
                out
            })
            .collect();
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
    } else {
        let mut out = vec![0.0f32; w];
        for row in 0..h {
            let line: Vec<f32> = data.row(row).to_vec();
            convolve_line(&line, kernel, &mut out);
            for (col, &val) in out.iter().enumerate() {
                result[[row, col]] = val;
            }
        }
    }
    result
}

fn convolve_cols(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let transposed = data.t().to_owned();
    convolve_rows(&transposed, kernel).t().to_owned()
}
