pub mod config;
pub mod contour;
pub mod drop;
pub mod morphology;
pub mod threshold;

pub use config::{DetectionConfig, Polarity};
pub use contour::{Boundary, BoundingRect};
pub use drop::{detect_drop, segment_frame};
