use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BLUR_KERNEL, DEFAULT_MIN_DROP_AREA, DEFAULT_OPENING_ITERATIONS};

/// Which side of the Otsu cut is treated as the drop.
///
/// The test setup photographs a dark drop on a lighter liquid, so the default
/// keeps pixels at or below the threshold. Polarity is never auto-detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Foreground = intensity <= threshold.
    #[default]
    DarkOnLight,
    /// Foreground = intensity > threshold.
    LightOnDark,
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DarkOnLight => write!(f, "Dark on light"),
            Self::LightOnDark => write!(f, "Light on dark"),
        }
    }
}

/// Configuration for drop detection in a single frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Side length of the Gaussian blur kernel (odd).
    #[serde(default = "default_blur_kernel")]
    pub blur_kernel: usize,
    /// Erosion/dilation passes of the 3x3 opening.
    #[serde(default = "default_opening_iterations")]
    pub opening_iterations: usize,
    /// Minimum enclosed contour area (px^2) to accept a drop.
    #[serde(default = "default_min_area")]
    pub min_area: f64,
    #[serde(default)]
    pub polarity: Polarity,
}

fn default_blur_kernel() -> usize {
    DEFAULT_BLUR_KERNEL
}
fn default_opening_iterations() -> usize {
    DEFAULT_OPENING_ITERATIONS
}
fn default_min_area() -> f64 {
    DEFAULT_MIN_DROP_AREA
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_kernel: DEFAULT_BLUR_KERNEL,
            opening_iterations: DEFAULT_OPENING_ITERATIONS,
            min_area: DEFAULT_MIN_DROP_AREA,
            polarity: Polarity::default(),
        }
    }
}
