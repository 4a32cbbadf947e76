use ndarray::Array2;
use std::path::PathBuf;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// A single decoded video frame reduced to its intensity plane.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self {
            data,
            metadata: FrameMetadata::default(),
        }
    }

    /// Build a frame from packed 8-bit RGB triples using BT.601 luminance.
    pub fn from_rgb8(raw: &[u8], width: usize, height: usize) -> Option<Self> {
        if raw.len() < width * height * 3 {
            return None;
        }
        let mut data = Array2::<f32>::zeros((height, width));
        for row in 0..height {
            for col in 0..width {
                let idx = (row * width + col) * 3;
                data[[row, col]] = luminance(raw[idx], raw[idx + 1], raw[idx + 2]);
            }
        }
        Some(Self::new(data))
    }

    pub fn with_metadata(mut self, metadata: FrameMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Quantize the intensity plane to 8-bit levels.
    pub fn to_gray8(&self) -> Array2<u8> {
        self.data
            .mapv(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    /// 1-based position of the frame in decode order.
    pub ordinal: usize,
    /// Presentation time derived from the ordinal and the source frame rate.
    pub timestamp_us: Option<u64>,
}

/// BT.601 luminance of an 8-bit RGB triple, in [0.0, 1.0].
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32) / 255.0
}

/// Metadata about an opened video source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Frame rate reported by the container, if any.
    pub frame_rate: Option<f64>,
    /// Total frame count, when the container knows it up front.
    pub total_frames: Option<usize>,
    /// Short name of the decoder backing this source.
    pub decoder: &'static str,
}
