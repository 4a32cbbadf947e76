pub mod classifier;
pub mod heuristic;
pub mod model;

pub use classifier::{resolve_label, ModelOutcome, ShapeClassifier, ShapeLabel};
pub use heuristic::{classify_heuristic, classify_metrics, HeuristicShape, ShapeMetrics};
pub use model::{ClassifierModel, LinearSvmModel, ModelError, Prediction, ShapeModel};
