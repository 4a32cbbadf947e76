/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Keep one decoded frame out of this many (~2 observations/sec at 30 fps).
pub const DEFAULT_SAMPLE_STRIDE: usize = 15;

/// Frames wider than this are downscaled before detection.
pub const DEFAULT_MAX_FRAME_WIDTH: u32 = 640;

/// Frame rate assumed when the source does not report one.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Side length of the Gaussian blur kernel applied before thresholding.
pub const DEFAULT_BLUR_KERNEL: usize = 5;

/// Number of erosion (then dilation) passes in the morphological opening.
pub const DEFAULT_OPENING_ITERATIONS: usize = 2;

/// Drop candidates with a smaller enclosed area (px^2) are treated as noise.
pub const DEFAULT_MIN_DROP_AREA: f64 = 100.0;

/// Centroid displacements shorter than this (px) count as no motion.
pub const DEFAULT_MOTION_NOISE_FLOOR: f64 = 10.0;

/// 5-tap binomial kernel: [1, 4, 6, 4, 1] / 16. Matches the fixed 5x5 Gaussian
/// used when no explicit sigma is requested.
pub const BINOMIAL_KERNEL_5: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Number of histogram bins for Otsu's thresholding (one per 8-bit level).
pub const OTSU_HISTOGRAM_BINS: usize = 256;

/// Added to |m| before taking log10 of a Hu moment.
pub const HU_LOG_EPSILON: f64 = 1e-10;

/// Moments with |m00| at or below this are treated as degenerate.
pub const MOMENT_EPSILON: f64 = f32::EPSILON as f64;

/// Length of the shape descriptor vector.
pub const DESCRIPTOR_LEN: usize = 10;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// SER trailer timestamps tick in 100 ns units.
pub const SER_TICKS_PER_SECOND: f64 = 10_000_000.0;
