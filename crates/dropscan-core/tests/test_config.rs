use std::io::Write;
use std::path::PathBuf;

use dropscan_core::analysis::AnalysisConfig;
use dropscan_core::detection::Polarity;
use dropscan_core::error::DropscanError;

#[test]
fn test_empty_toml_gives_defaults() {
    let config = AnalysisConfig::from_toml("").unwrap();
    assert_eq!(config, AnalysisConfig::default());
    assert_eq!(config.sampling.stride, 15);
    assert_eq!(config.sampling.max_width, 640);
    assert_eq!(config.sampling.default_frame_rate, 30.0);
    assert_eq!(config.detection.blur_kernel, 5);
    assert_eq!(config.detection.opening_iterations, 2);
    assert_eq!(config.detection.min_area, 100.0);
    assert_eq!(config.detection.polarity, Polarity::DarkOnLight);
    assert_eq!(config.motion.noise_floor_px, 10.0);
    assert!(config.model.is_none());
}

#[test]
fn test_partial_sections() {
    let config = AnalysisConfig::from_toml(
        r#"
model = "models/shapes.json"

[sampling]
stride = 5

[detection]
polarity = "light_on_dark"
"#,
    )
    .unwrap();
    assert_eq!(config.model, Some(PathBuf::from("models/shapes.json")));
    assert_eq!(config.sampling.stride, 5);
    assert_eq!(config.sampling.max_width, 640);
    assert_eq!(config.detection.polarity, Polarity::LightOnDark);
    assert_eq!(config.detection.min_area, 100.0);
}

#[test]
fn test_default_round_trips_through_toml() {
    let text = toml::to_string_pretty(&AnalysisConfig::default()).unwrap();
    assert_eq!(AnalysisConfig::from_toml(&text).unwrap(), AnalysisConfig::default());
}

#[test]
fn test_invalid_values_rejected() {
    for text in [
        "[sampling]\nstride = 0",
        "[sampling]\ndefault_frame_rate = -1.0",
        "[detection]\nblur_kernel = 4",
        "[detection]\npolarity = \"sideways\"",
    ] {
        assert!(
            matches!(AnalysisConfig::from_toml(text), Err(DropscanError::Config(_))),
            "accepted {text:?}"
        );
    }
}

#[test]
fn test_from_file() {
    let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    f.write_all(b"[motion]\nnoise_floor_px = 4.5\n").unwrap();
    f.flush().unwrap();
    let config = AnalysisConfig::from_file(f.path()).unwrap();
    assert_eq!(config.motion.noise_floor_px, 4.5);
}
