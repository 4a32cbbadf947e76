//! Fixed-length shape descriptors for detected drop boundaries.
//!
//! The descriptor layout is positional and must stay identical to the layout
//! the classifier model was trained on:
//!
//! | index | component                          |
//! |-------|------------------------------------|
//! | 0..7  | Hu invariants, signed log-magnitude |
//! | 7     | solidity                           |
//! | 8     | aspect ratio                       |
//! | 9     | circularity                        |

pub mod moments;

use std::f64::consts::PI;

use serde::Serialize;

use crate::consts::{DESCRIPTOR_LEN, HU_LOG_EPSILON};
use crate::detection::Boundary;

pub use moments::Moments;

/// The 10-component shape descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Descriptor([f64; DESCRIPTOR_LEN]);

impl Descriptor {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> [f64; DESCRIPTOR_LEN] {
        self.0
    }

    pub fn hu_log(&self) -> &[f64] {
        &self.0[..7]
    }

    pub fn solidity(&self) -> f64 {
        self.0[7]
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.0[8]
    }

    pub fn circularity(&self) -> f64 {
        self.0[9]
    }
}

/// Compute the descriptor of a boundary.
///
/// Returns `None` when the boundary encloses no area.
pub fn extract_features(boundary: &Boundary) -> Option<Descriptor> {
    let area = boundary.area();
    if area == 0.0 {
        return None;
    }

    let hu = Moments::of_polygon(boundary.points()).hu();
    let mut values = [0.0; DESCRIPTOR_LEN];
    for (dst, &h) in values.iter_mut().zip(hu.iter()) {
        *dst = signed_log_magnitude(h);
    }

    values[7] = solidity(area, boundary.convex_hull_area());
    values[8] = boundary
        .bounding_rect()
        .map_or(0.0, |rect| rect.aspect_ratio());
    values[9] = circularity(area, boundary.perimeter());

    Some(Descriptor(values))
}

/// `-sign(m) * log10(|m| + eps)`, with `sign(0) = 0`.
pub fn signed_log_magnitude(m: f64) -> f64 {
    let sign = if m > 0.0 {
        1.0
    } else if m < 0.0 {
        -1.0
    } else {
        return 0.0;
    };
    -sign * (m.abs() + HU_LOG_EPSILON).log10()
}

/// `area / hull_area`, 0 when the hull is degenerate.
pub fn solidity(area: f64, hull_area: f64) -> f64 {
    if hull_area > 0.0 {
        area / hull_area
    } else {
        0.0
    }
}

/// `4 * pi * area / perimeter^2`, 0 when the perimeter is 0.
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    if perimeter > 0.0 {
        4.0 * PI * area / (perimeter * perimeter)
    } else {
        0.0
    }
}

/// Integer centroid of a boundary (components truncated toward zero), or
/// `None` when it encloses no area.
pub fn centroid(boundary: &Boundary) -> Option<(i32, i32)> {
    Moments::of_polygon(boundary.points())
        .centroid()
        .map(|(x, y)| (x as i32, y as i32))
}
