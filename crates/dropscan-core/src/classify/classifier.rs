use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::classify::heuristic::{classify_heuristic, HeuristicShape};
use crate::classify::model::{ClassifierModel, ModelError, Prediction};
use crate::detection::Boundary;
use crate::features::extract_features;

/// A shape label as reported to callers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShapeLabel(String);

impl ShapeLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeLabel {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ShapeLabel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<HeuristicShape> for ShapeLabel {
    fn from(shape: HeuristicShape) -> Self {
        Self::from(shape.label())
    }
}

/// What the model tier produced for one boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelOutcome {
    Label(Prediction),
    ModelUnavailable,
    PredictionFailed(ModelError),
}

/// Pick the model label when there is one, the heuristic otherwise.
pub fn resolve_label(outcome: ModelOutcome, heuristic: HeuristicShape) -> ShapeLabel {
    match outcome {
        ModelOutcome::Label(prediction) => ShapeLabel::from(prediction.label),
        ModelOutcome::ModelUnavailable | ModelOutcome::PredictionFailed(_) => {
            ShapeLabel::from(heuristic)
        }
    }
}

/// Two-tier shape classifier: optional model first, heuristic fallback.
#[derive(Clone, Debug, Default)]
pub struct ShapeClassifier {
    model: ClassifierModel,
}

impl ShapeClassifier {
    pub fn new(model: ClassifierModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ClassifierModel {
        &self.model
    }

    /// Run the model tier only.
    pub fn model_outcome(&self, boundary: &Boundary) -> ModelOutcome {
        let ClassifierModel::Loaded(model) = &self.model else {
            return ModelOutcome::ModelUnavailable;
        };
        let Some(descriptor) = extract_features(boundary) else {
            return ModelOutcome::PredictionFailed(ModelError::DegenerateBoundary);
        };
        match model.predict(descriptor.as_slice()) {
            Ok(prediction) => ModelOutcome::Label(prediction),
            Err(e) => ModelOutcome::PredictionFailed(e),
        }
    }

    pub fn classify(&self, boundary: &Boundary) -> ShapeLabel {
        let outcome = self.model_outcome(boundary);
        if let ModelOutcome::PredictionFailed(e) = &outcome {
            warn!(model = self.model.name(), error = %e, "Prediction failed, using heuristic");
        }
        resolve_label(outcome, classify_heuristic(boundary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_model_label() {
        let outcome = ModelOutcome::Label(Prediction {
            label: "Ring".into(),
            confidence: 0.9,
        });
        assert_eq!(resolve_label(outcome, HeuristicShape::Pearl).as_str(), "Ring");
    }

    #[test]
    fn test_resolve_falls_back() {
        assert_eq!(
            resolve_label(ModelOutcome::ModelUnavailable, HeuristicShape::Snake).as_str(),
            "Snake"
        );
        let failed = ModelOutcome::PredictionFailed(ModelError::NonFinite("descriptor"));
        assert_eq!(
            resolve_label(failed, HeuristicShape::Pearl).as_str(),
            "Pearl (Circular)"
        );
    }

    #[test]
    fn test_absent_model_outcome() {
        let square = Boundary::from_xy(&[(0, 0), (20, 0), (20, 20), (0, 20)]);
        let classifier = ShapeClassifier::default();
        assert_eq!(classifier.model_outcome(&square), ModelOutcome::ModelUnavailable);
    }
}
