use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{DropscanError, Result};

/// Why a single prediction could not be made. Never fatal to an analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("descriptor has {got} components, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("boundary has no descriptor (zero area)")]
    DegenerateBoundary,

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("malformed model: {0}")]
    Malformed(String),
}

/// A label predicted by a model, with the model's confidence in [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

/// A trained descriptor-to-label mapping.
///
/// Implementations are read-only after construction and shared between
/// concurrent analyses.
pub trait ShapeModel: Send + Sync {
    /// Short human-readable identification of the model.
    fn name(&self) -> &str;

    fn predict(&self, features: &[f64]) -> std::result::Result<Prediction, ModelError>;
}

/// The optional classifier model an analyzer was built with.
#[derive(Clone, Default)]
pub enum ClassifierModel {
    /// No model: every frame is classified by the heuristic.
    #[default]
    Absent,
    Loaded(Arc<dyn ShapeModel>),
}

impl ClassifierModel {
    pub fn loaded(model: impl ShapeModel + 'static) -> Self {
        Self::Loaded(Arc::new(model))
    }

    /// Load a [`LinearSvmModel`] artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let model = LinearSvmModel::from_file(path)?;
        info!(
            path = %path.display(),
            classes = model.classes.len(),
            scheme = %model.scheme,
            "Loaded shape classifier model"
        );
        Ok(Self::loaded(model))
    }

    /// Load the artifact at `path` if one is configured, downgrading to
    /// [`ClassifierModel::Absent`] when it is missing or unreadable.
    pub fn load_or_absent(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No classifier model configured, using heuristics");
            return Self::Absent;
        };
        match Self::load(path) {
            Ok(model) => model,
            Err(e) => {
                warn!(error = %e, "Classifier model unavailable, using heuristics");
                Self::Absent
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Absent => "heuristic",
            Self::Loaded(model) => model.name(),
        }
    }
}

impl fmt::Debug for ClassifierModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Loaded(model) => write!(f, "Loaded({})", model.name()),
        }
    }
}

/// How per-class decision values are combined into one label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionScheme {
    /// One hyperplane per class pair `(i, j)`, `i < j`, in lexicographic order.
    /// A positive decision votes for `i`; the most votes wins, lowest index on ties.
    OneVsOne,
    /// One hyperplane per class; the highest score wins. With two classes and a
    /// single hyperplane, a positive score selects the second class.
    OneVsRest,
}

impl fmt::Display for DecisionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneVsOne => write!(f, "one-vs-one"),
            Self::OneVsRest => write!(f, "one-vs-rest"),
        }
    }
}

/// Per-feature standardization applied before the hyperplanes:
/// `(x - mean) / scale`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// A linear SVM exported as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearSvmModel {
    pub classes: Vec<String>,
    pub feature_count: usize,
    pub scheme: DecisionScheme,
    #[serde(default)]
    pub scaler: Option<Standardizer>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearSvmModel {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DropscanError::ClassifierUnavailable(format!("{}: {e}", path.display()))
        })?;
        Self::from_json(&text)
            .map_err(|e| DropscanError::ClassifierUnavailable(format!("{}: {e}", path.display())))
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, ModelError> {
        let model: Self =
            serde_json::from_str(text).map_err(|e| ModelError::Malformed(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Check that the hyperplane table is consistent with the class list.
    pub fn validate(&self) -> std::result::Result<(), ModelError> {
        let n = self.classes.len();
        if n < 2 {
            return Err(ModelError::Malformed(format!("need at least 2 classes, got {n}")));
        }
        let expected_planes = match self.scheme {
            DecisionScheme::OneVsOne => n * (n - 1) / 2,
            DecisionScheme::OneVsRest if n == 2 && self.coefficients.len() == 1 => 1,
            DecisionScheme::OneVsRest => n,
        };
        if self.coefficients.len() != expected_planes {
            return Err(ModelError::Malformed(format!(
                "{} scheme with {n} classes needs {expected_planes} hyperplanes, got {}",
                self.scheme,
                self.coefficients.len()
            )));
        }
        if self.intercepts.len() != expected_planes {
            return Err(ModelError::Malformed(format!(
                "expected {expected_planes} intercepts, got {}",
                self.intercepts.len()
            )));
        }
        if let Some(row) = self.coefficients.iter().find(|r| r.len() != self.feature_count) {
            return Err(ModelError::Malformed(format!(
                "hyperplane has {} weights, feature_count is {}",
                row.len(),
                self.feature_count
            )));
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != self.feature_count || scaler.scale.len() != self.feature_count {
                return Err(ModelError::Malformed("scaler length differs from feature_count".into()));
            }
        }
        let finite = self
            .coefficients
            .iter()
            .flatten()
            .chain(self.intercepts.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(ModelError::NonFinite("model weights"));
        }
        Ok(())
    }

    fn standardize(&self, features: &[f64]) -> Vec<f64> {
        match &self.scaler {
            Some(s) => features
                .iter()
                .zip(s.mean.iter().zip(s.scale.iter()))
                .map(|(&x, (&mean, &scale))| {
                    if scale == 0.0 {
                        x - mean
                    } else {
                        (x - mean) / scale
                    }
                })
                .collect(),
            None => features.to_vec(),
        }
    }

    fn decision_values(&self, x: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(self.intercepts.iter())
            .map(|(w, b)| w.iter().zip(x.iter()).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect()
    }

    fn vote_one_vs_one(&self, decisions: &[f64]) -> Prediction {
        let n = self.classes.len();
        let mut votes = vec![0usize; n];
        let mut k = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                if decisions[k] > 0.0 {
                    votes[i] += 1;
                } else {
                    votes[j] += 1;
                }
                k += 1;
            }
        }
        let mut best = 0;
        for (i, &v) in votes.iter().enumerate() {
            if v > votes[best] {
                best = i;
            }
        }
        Prediction {
            label: self.classes[best].clone(),
            confidence: votes[best] as f64 / (n - 1) as f64,
        }
    }

    fn argmax_one_vs_rest(&self, decisions: &[f64]) -> Prediction {
        if decisions.len() == 1 {
            let score = decisions[0];
            let p_second = 1.0 / (1.0 + (-score).exp());
            return if score > 0.0 {
                Prediction {
                    label: self.classes[1].clone(),
                    confidence: p_second,
                }
            } else {
                Prediction {
                    label: self.classes[0].clone(),
                    confidence: 1.0 - p_second,
                }
            };
        }

        let mut best = 0;
        for (i, &d) in decisions.iter().enumerate() {
            if d > decisions[best] {
                best = i;
            }
        }
        let max = decisions[best];
        let total: f64 = decisions.iter().map(|d| (d - max).exp()).sum();
        Prediction {
            label: self.classes[best].clone(),
            confidence: 1.0 / total,
        }
    }
}

impl ShapeModel for LinearSvmModel {
    fn name(&self) -> &str {
        "linear-svm"
    }

    fn predict(&self, features: &[f64]) -> std::result::Result<Prediction, ModelError> {
        if features.len() != self.feature_count {
            return Err(ModelError::DimensionMismatch {
                expected: self.feature_count,
                got: features.len(),
            });
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite("descriptor"));
        }

        let x = self.standardize(features);
        let decisions = self.decision_values(&x);
        if decisions.iter().any(|d| !d.is_finite()) {
            return Err(ModelError::NonFinite("decision values"));
        }

        Ok(match self.scheme {
            DecisionScheme::OneVsOne => self.vote_one_vs_one(&decisions),
            DecisionScheme::OneVsRest => self.argmax_one_vs_rest(&decisions),
        })
    }
}
