use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dropscan_core::analysis::AnalysisConfig;
use dropscan_core::classify::{classify_heuristic, ClassifierModel, ShapeClassifier};
use dropscan_core::detection::{detect_drop, segment_frame};
use dropscan_core::features::{centroid, extract_features};
use dropscan_core::io::image_io::{load_image, save_mask_png};
use serde::Serialize;

#[derive(Args)]
pub struct DescribeArgs {
    /// Input image file (PNG, JPEG, TIFF, ...)
    pub file: PathBuf,

    /// Analysis config file (TOML); only the detection section is used
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Classifier model (JSON) to compare against the heuristic
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Save the segmentation mask as PNG
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Description {
    file: String,
    area_px: f64,
    perimeter_px: f64,
    centroid: Option<(i32, i32)>,
    descriptor: Vec<f64>,
    heuristic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

pub fn run(args: &DescribeArgs) -> Result<()> {
    let config = match args.config {
        Some(ref path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Invalid analysis config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let frame = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    if let Some(ref mask_path) = args.mask {
        let mask = segment_frame(&frame, &config.detection);
        save_mask_png(&mask, mask_path)
            .with_context(|| format!("Failed to write mask {}", mask_path.display()))?;
    }

    let boundary = detect_drop(&frame, &config.detection)
        .with_context(|| format!("No drop detected in {}", args.file.display()))?;
    let descriptor = extract_features(&boundary).context("Detected boundary has zero area")?;

    let label = match args.model {
        Some(ref path) => {
            let model = ClassifierModel::load(path)
                .with_context(|| format!("Failed to load model {}", path.display()))?;
            Some(ShapeClassifier::new(model).classify(&boundary).to_string())
        }
        None => None,
    };

    let description = Description {
        file: args.file.display().to_string(),
        area_px: boundary.area(),
        perimeter_px: boundary.perimeter(),
        centroid: centroid(&boundary),
        descriptor: descriptor.values().to_vec(),
        heuristic: classify_heuristic(&boundary).to_string(),
        label,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&description)?);
        return Ok(());
    }

    println!("File:         {}", description.file);
    println!("Image:        {}x{}", frame.width(), frame.height());
    println!("Area:         {:.1} px^2", description.area_px);
    println!("Perimeter:    {:.1} px", description.perimeter_px);
    if let Some((x, y)) = description.centroid {
        println!("Centroid:     ({}, {})", x, y);
    }
    println!("Hu (log):     {:?}", descriptor.hu_log());
    println!("Solidity:     {:.4}", descriptor.solidity());
    println!("Aspect ratio: {:.4}", descriptor.aspect_ratio());
    println!("Circularity:  {:.4}", descriptor.circularity());
    println!("Heuristic:    {}", description.heuristic);
    if let Some(ref label) = description.label {
        println!("Model label:  {}", label);
    }

    Ok(())
}
