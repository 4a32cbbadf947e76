use ndarray::Array2;
use tracing::trace;

use crate::filters::gaussian_blur::gaussian_blur_u8;
use crate::frame::Frame;

use super::config::DetectionConfig;
use super::contour::{find_outer_boundaries, Boundary};
use super::morphology::morphological_opening;
use super::threshold::{binarize, otsu_threshold};

/// Segment a frame into drop foreground and background.
///
/// Pipeline: 8-bit intensity -> Gaussian blur -> global Otsu threshold with
/// the configured polarity -> morphological opening.
///
/// A single global threshold assumes one dominant blob on a roughly uniform
/// background; uneven illumination is not compensated.
pub fn segment_frame(frame: &Frame, config: &DetectionConfig) -> Array2<bool> {
    let gray = frame.to_gray8();
    let blurred = gaussian_blur_u8(&gray, config.blur_kernel);
    let threshold = otsu_threshold(&blurred);
    trace!(threshold, "Otsu threshold");
    let mask = binarize(&blurred, threshold, config.polarity);
    morphological_opening(&mask, config.opening_iterations)
}

/// Detect the drop in a single frame.
///
/// Returns the outer boundary with the largest enclosed area, or `None` if the
/// frame is empty or that area is below `config.min_area`.
pub fn detect_drop(frame: &Frame, config: &DetectionConfig) -> Option<Boundary> {
    if frame.width() == 0 || frame.height() == 0 {
        return None;
    }

    let mask = segment_frame(frame, config);
    let (largest, area) = largest_boundary(find_outer_boundaries(&mask))?;

    if area < config.min_area {
        trace!(area, min_area = config.min_area, "Largest candidate below noise floor");
        return None;
    }
    Some(largest)
}

/// Pick the boundary with the maximum enclosed area; the earliest wins ties.
fn largest_boundary(boundaries: Vec<Boundary>) -> Option<(Boundary, f64)> {
    let mut best: Option<(Boundary, f64)> = None;
    for boundary in boundaries {
        let area = boundary.area();
        if best.as_ref().is_none_or(|(_, best_area)| area > *best_area) {
            best = Some((boundary, area));
        }
    }
    best
}
