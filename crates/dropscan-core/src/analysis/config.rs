use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_FRAME_RATE, DEFAULT_MAX_FRAME_WIDTH, DEFAULT_MOTION_NOISE_FLOOR, DEFAULT_SAMPLE_STRIDE,
};
use crate::detection::DetectionConfig;
use crate::error::{DropscanError, Result};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Path to a trained classifier artifact. Heuristics only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub motion: MotionConfig,
}

impl AnalysisConfig {
    /// Read a TOML config file. Missing sections and fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| DropscanError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sampling.stride == 0 {
            return Err(DropscanError::Config("sampling.stride must be at least 1".into()));
        }
        if self.sampling.max_width == 0 {
            return Err(DropscanError::Config("sampling.max_width must be at least 1".into()));
        }
        if !(self.sampling.default_frame_rate.is_finite() && self.sampling.default_frame_rate > 0.0) {
            return Err(DropscanError::Config(
                "sampling.default_frame_rate must be positive".into(),
            ));
        }
        if self.detection.blur_kernel % 2 == 0 {
            return Err(DropscanError::Config(format!(
                "detection.blur_kernel must be odd, got {}",
                self.detection.blur_kernel
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Keep one frame out of every `stride` decoded frames.
    #[serde(default = "default_stride")]
    pub stride: usize,
    /// Frames wider than this are downscaled, keeping the aspect ratio.
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    /// Used when the container does not report a frame rate.
    #[serde(default = "default_frame_rate")]
    pub default_frame_rate: f64,
}

fn default_stride() -> usize {
    DEFAULT_SAMPLE_STRIDE
}
fn default_max_width() -> u32 {
    DEFAULT_MAX_FRAME_WIDTH
}
fn default_frame_rate() -> f64 {
    DEFAULT_FRAME_RATE
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_SAMPLE_STRIDE,
            max_width: DEFAULT_MAX_FRAME_WIDTH,
            default_frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Displacements shorter than this (px) count as stationary.
    #[serde(default = "default_noise_floor")]
    pub noise_floor_px: f64,
}

fn default_noise_floor() -> f64 {
    DEFAULT_MOTION_NOISE_FLOOR
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            noise_floor_px: DEFAULT_MOTION_NOISE_FLOOR,
        }
    }
}
