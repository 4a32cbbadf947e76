use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::classify::{ClassifierModel, ShapeClassifier};
use crate::detection::detect_drop;
use crate::error::{DropscanError, Result};
use crate::features::{centroid, circularity};
use crate::frame::Frame;
use crate::io::{open_source, VideoSource};
use crate::motion::determine_direction;
use crate::sampler::FrameSampler;

use super::config::AnalysisConfig;
use super::report::{round2, AnalysisReport, Observation};
use super::types::{AnalysisStage, NoOpReporter, ProgressReporter};

/// Area and position of the drop at one detection.
#[derive(Clone, Copy, Debug)]
struct Snapshot {
    area: f64,
    centroid: Option<(i32, i32)>,
}

/// Per-video accumulator state.
#[derive(Default)]
struct Accumulator {
    observations: Vec<Observation>,
    initial: Option<Snapshot>,
    last: Option<Snapshot>,
    /// Most recent sampled frame, whether or not it contained a drop.
    last_frame: Option<Frame>,
}

impl Accumulator {
    fn record(&mut self, snapshot: Snapshot, observation: Observation) {
        if self.initial.is_none() {
            self.initial = Some(snapshot);
        }
        self.last = Some(snapshot);
        self.observations.push(observation);
    }
}

/// Runs the full per-video pipeline: sample, detect, classify, track and
/// summarize.
///
/// An analyzer holds only read-only state, so one instance (and its loaded
/// model) can serve many analyses concurrently.
#[derive(Clone, Debug)]
pub struct DropAnalyzer {
    config: AnalysisConfig,
    classifier: ShapeClassifier,
}

impl DropAnalyzer {
    pub fn new(config: AnalysisConfig, model: ClassifierModel) -> Self {
        Self {
            config,
            classifier: ShapeClassifier::new(model),
        }
    }

    /// Build an analyzer, loading the model named in `config.model` if any.
    /// A model that cannot be loaded leaves the analyzer on heuristics.
    pub fn from_config(config: AnalysisConfig) -> Self {
        let model = ClassifierModel::load_or_absent(config.model.as_deref());
        Self::new(config, model)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn classifier(&self) -> &ShapeClassifier {
        &self.classifier
    }

    pub fn analyze(&self, path: &Path) -> Result<AnalysisReport> {
        self.analyze_reported(path, Arc::new(NoOpReporter))
    }

    pub fn analyze_reported(
        &self,
        path: &Path,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<AnalysisReport> {
        reporter.begin_stage(AnalysisStage::Opening, None);
        let source = open_source(path);
        reporter.finish_stage();
        self.analyze_source(source?, reporter)
    }

    /// Analyze an already opened source. The source is consumed and released
    /// before this returns.
    pub fn analyze_source(
        &self,
        source: Box<dyn VideoSource>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<AnalysisReport> {
        let sampling = &self.config.sampling;
        let mut sampler = FrameSampler::new(
            source,
            sampling.stride,
            sampling.max_width,
            sampling.default_frame_rate,
        );
        let filename = sampler.info().filename.clone();

        reporter.begin_stage(AnalysisStage::Sampling, sampler.info().total_frames);
        let mut acc = Accumulator::default();
        while let Some(sampled) = sampler.next() {
            if let Some(boundary) = detect_drop(&sampled.frame, &self.config.detection) {
                let snapshot = Snapshot {
                    area: boundary.area(),
                    centroid: centroid(&boundary),
                };
                let shape = self.classifier.classify(&boundary);
                debug!(
                    frame = sampled.ordinal,
                    area = snapshot.area,
                    centroid = ?snapshot.centroid,
                    %shape,
                    "Drop detected"
                );
                let observation = Observation {
                    ordinal: sampled.ordinal,
                    area: snapshot.area,
                    centroid: snapshot.centroid,
                    shape,
                };
                acc.record(snapshot, observation);
            } else {
                debug!(frame = sampled.ordinal, "No drop detected");
            }
            acc.last_frame = Some(sampled.frame);
            reporter.advance(sampler.decoded());
        }
        reporter.finish_stage();

        let decoded = sampler.decoded();
        let frame_rate = sampler.frame_rate();
        drop(sampler);
        info!(
            file = %filename.display(),
            decoded,
            detections = acc.observations.len(),
            "Sampling complete"
        );

        reporter.begin_stage(AnalysisStage::Finalizing, None);
        let report = self.finalize(acc, decoded, frame_rate);
        reporter.finish_stage();

        if let Ok(ref report) = report {
            info!(
                file = %filename.display(),
                speed = report.speed,
                direction = %report.direction,
                shape = %report.shape,
                circularity = report.circularity,
                "Analysis complete"
            );
        }
        report
    }

    fn finalize(
        &self,
        acc: Accumulator,
        decoded: usize,
        frame_rate: f64,
    ) -> Result<AnalysisReport> {
        let (Some(initial), Some(last), Some(last_observation)) =
            (acc.initial, acc.last, acc.observations.last())
        else {
            return Err(DropscanError::NoDetection);
        };

        let duration = decoded as f64 / frame_rate;
        let speed = if duration > 0.0 {
            (last.area - initial.area) / duration
        } else {
            0.0
        };
        let direction = determine_direction(
            initial.centroid,
            last.centroid,
            self.config.motion.noise_floor_px,
        );

        // The terminal frame is re-segmented; it may differ from the frame of
        // the last observation when that frame had no detection.
        let perimeter = acc
            .last_frame
            .as_ref()
            .filter(|_| last.area > 0.0)
            .and_then(|frame| detect_drop(frame, &self.config.detection))
            .map_or(0.0, |boundary| boundary.perimeter());
        let circ = circularity(last.area, perimeter);
        let irregularity = if circ > 0.0 { 1.0 / circ } else { 0.0 };

        Ok(AnalysisReport {
            speed: round2(speed),
            direction,
            shape: last_observation.shape.clone(),
            duration_sec: round2(duration),
            circularity: round2(circ),
            irregularity: round2(irregularity),
            area_px: last.area as u64,
            perimeter_px: perimeter as u64,
        })
    }
}
