use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use ndarray::Array2;
use tracing::{debug, warn};

use crate::consts::{DEFAULT_FRAME_RATE, DEFAULT_MAX_FRAME_WIDTH, DEFAULT_SAMPLE_STRIDE};
use crate::error::{DropscanError, Result};
use crate::frame::{Frame, SourceInfo};
use crate::io::{open_source, VideoSource};

/// A frame kept by the sampler, tagged with its 1-based decode position.
#[derive(Clone, Debug)]
pub struct SampledFrame {
    pub ordinal: usize,
    pub frame: Frame,
}

/// Lazily decodes a video and yields every `stride`-th frame, downscaled so it
/// is no wider than `max_width`.
///
/// Frames are counted from 1 and frame `k` is kept when `k % stride == 0`, so
/// the first kept frame is the `stride`-th one. Once the source is exhausted
/// or fails, the decoder handle is dropped and the iterator stays finished.
pub struct FrameSampler {
    source: Option<Box<dyn VideoSource>>,
    info: SourceInfo,
    stride: usize,
    max_width: u32,
    frame_rate: f64,
    decoded: usize,
}

impl FrameSampler {
    pub fn new(
        source: Box<dyn VideoSource>,
        stride: usize,
        max_width: u32,
        default_frame_rate: f64,
    ) -> Self {
        let info = source.info().clone();
        let frame_rate = info
            .frame_rate
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(default_frame_rate);
        Self {
            source: Some(source),
            info,
            stride: stride.max(1),
            max_width: max_width.max(1),
            frame_rate,
            decoded: 0,
        }
    }

    /// Open `path` and sample it with the default stride, width cap and frame rate.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(
            open_source(path)?,
            DEFAULT_SAMPLE_STRIDE,
            DEFAULT_MAX_FRAME_WIDTH,
            DEFAULT_FRAME_RATE,
        ))
    }

    pub fn info(&self) -> &SourceInfo {
        &self.info
    }

    /// Frame rate of the source, or the fallback when it reports none.
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Number of frames decoded or skipped so far, sampled or not.
    pub fn decoded(&self) -> usize {
        self.decoded
    }

    pub fn is_finished(&self) -> bool {
        self.source.is_none()
    }

    fn release(&mut self) {
        if self.source.take().is_some() {
            debug!(decoded = self.decoded, "Released video source");
        }
    }

    fn advance(&mut self) -> Result<Option<SampledFrame>> {
        loop {
            let Some(source) = self.source.as_mut() else {
                return Ok(None);
            };
            let keep = (self.decoded + 1) % self.stride == 0;
            if !keep {
                if !source.skip_frame()? {
                    return Ok(None);
                }
                self.decoded += 1;
                continue;
            }

            let Some(mut frame) = source.next_frame()? else {
                return Ok(None);
            };
            self.decoded += 1;
            let ordinal = self.decoded;
            frame.metadata.ordinal = ordinal;
            frame.metadata.timestamp_us =
                Some(((ordinal - 1) as f64 / self.frame_rate * 1_000_000.0).round() as u64);
            let frame = resize_to_max_width(&frame, self.max_width)?;
            return Ok(Some(SampledFrame { ordinal, frame }));
        }
    }
}

impl Iterator for FrameSampler {
    type Item = SampledFrame;

    fn next(&mut self) -> Option<SampledFrame> {
        match self.advance() {
            Ok(Some(sampled)) => Some(sampled),
            Ok(None) => {
                self.release();
                None
            }
            Err(e) => {
                warn!(error = %e, decoded = self.decoded, "Decoding stopped early");
                self.release();
                None
            }
        }
    }
}

/// Downscale `frame` so its width is at most `max_width`, keeping the aspect
/// ratio. The new height is truncated, never below one row. Narrower frames
/// are returned unchanged.
pub fn resize_to_max_width(frame: &Frame, max_width: u32) -> Result<Frame> {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    if w <= max_width {
        return Ok(frame.clone());
    }
    let new_h = ((h as u64 * max_width as u64) / w as u64).max(1) as u32;

    let pixels: Vec<f32> = frame.data.iter().copied().collect();
    let img = ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(w, h, pixels)
        .ok_or(DropscanError::InvalidDimensions { width: w, height: h })?;
    let resized = imageops::resize(&img, max_width, new_h, FilterType::Triangle);

    let data = Array2::from_shape_vec((new_h as usize, max_width as usize), resized.into_raw())
        .map_err(|_| DropscanError::InvalidDimensions {
            width: max_width,
            height: new_h,
        })?;
    Ok(Frame {
        data,
        metadata: frame.metadata.clone(),
    })
}
