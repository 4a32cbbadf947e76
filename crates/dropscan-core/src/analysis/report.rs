use serde::Serialize;

use crate::classify::ShapeLabel;
use crate::error::{DropscanError, Result};
use crate::motion::Direction;

/// What was measured on one sampled frame that contained a drop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Observation {
    /// 1-based decode position of the frame.
    pub ordinal: usize,
    /// Enclosed area of the boundary, px^2.
    pub area: f64,
    pub centroid: Option<(i32, i32)>,
    pub shape: ShapeLabel,
}

/// Final metrics for one video.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Rate of change of the drop's area, px^2 per second.
    pub speed: f64,
    pub direction: Direction,
    pub shape: ShapeLabel,
    pub duration_sec: f64,
    pub circularity: f64,
    pub irregularity: f64,
    pub area_px: u64,
    pub perimeter_px: u64,
}

/// A report, or the message of the fatal error that prevented one.
///
/// Serializes as the flat report on success and `{"error": "..."}` on failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Report(AnalysisReport),
    Failed { error: String },
}

impl AnalysisOutcome {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Report(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}

impl From<Result<AnalysisReport>> for AnalysisOutcome {
    fn from(result: Result<AnalysisReport>) -> Self {
        match result {
            Ok(report) => Self::Report(report),
            Err(e) => Self::from(e),
        }
    }
}

impl From<DropscanError> for AnalysisOutcome {
    fn from(e: DropscanError) -> Self {
        Self::Failed {
            error: e.to_string(),
        }
    }
}

/// Round to two decimal places from the exact binary value, ties to even.
///
/// `0.125` becomes `0.12`, and `2.675` (stored just below the tie) becomes `2.67`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let rounded = format!("{value:.2}").parse::<f64>().unwrap_or(value);
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            speed: 12.5,
            direction: Direction::NorthEast,
            shape: ShapeLabel::from("Pearl (Circular)"),
            duration_sec: 5.0,
            circularity: 0.91,
            irregularity: 1.1,
            area_px: 1256,
            perimeter_px: 130,
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-0.456), -0.46);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_round2_ties() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(1.005), 1.0);
    }

    #[test]
    fn test_round2_no_negative_zero() {
        assert!(round2(-0.001).is_sign_positive());
    }

    #[test]
    fn test_report_serializes_flat() {
        let json = serde_json::to_value(AnalysisOutcome::Report(sample_report())).unwrap();
        assert_eq!(json["direction"], "North-East");
        assert_eq!(json["shape"], "Pearl (Circular)");
        assert_eq!(json["area_px"], 1256);
        assert_eq!(json["duration_sec"], 5.0);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_serializes_as_error() {
        let outcome = AnalysisOutcome::from(DropscanError::NoDetection);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error": "No oil drop detected (video might be empty or too dark)" })
        );
        assert!(outcome.report().is_none());
    }
}
