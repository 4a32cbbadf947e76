use std::io::Write;
use std::path::Path;
use std::process::Command;

use ffmpeg_sidecar::command::{ffmpeg_is_installed, FfmpegCommand};

use dropscan_core::analysis::{AnalysisConfig, DropAnalyzer};
use dropscan_core::classify::ClassifierModel;
use dropscan_core::error::DropscanError;
use dropscan_core::io::ffmpeg::FfmpegSource;
use dropscan_core::io::{open_source, VideoSource};
use dropscan_core::motion::Direction;
use dropscan_core::sampler::FrameSampler;

fn ffmpeg_available() -> bool {
    let ffprobe = Command::new("ffprobe")
        .arg("-version")
        .output()
        .is_ok_and(|out| out.status.success());
    if !(ffprobe && ffmpeg_is_installed()) {
        eprintln!("ffmpeg/ffprobe not installed, skipping");
        return false;
    }
    true
}

/// 2 s of 160x120 white at 25 fps with a stationary 40x40 black square.
fn write_square_clip(path: &Path) {
    let status = FfmpegCommand::new()
        .hide_banner()
        .args(["-f", "lavfi", "-i", "color=c=white:s=160x120:r=25:d=2"])
        .args(["-vf", "drawbox=x=60:y=40:w=40:h=40:color=black:t=fill"])
        .codec_video("mpeg4")
        .args(["-q:v", "2"])
        .overwrite()
        .output(path)
        .spawn()
        .and_then(|mut child| child.wait())
        .expect("run ffmpeg");
    assert!(status.success(), "ffmpeg failed to write test clip");
}

#[test]
fn test_container_metadata() {
    if !ffmpeg_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("square.mp4");
    write_square_clip(&clip);

    let source = open_source(&clip).unwrap();
    let info = source.info();
    assert_eq!((info.width, info.height), (160, 120));
    assert_eq!(info.frame_rate, Some(25.0));
    assert_eq!(info.total_frames, Some(50));
    assert_eq!(info.decoder, "ffmpeg");
}

#[test]
fn test_decodes_every_frame_then_releases() {
    if !ffmpeg_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("square.mp4");
    write_square_clip(&clip);

    let mut source = FfmpegSource::open(&clip).unwrap();
    assert!(source.is_running());

    let mut count = 0;
    while let Some(frame) = source.next_frame().unwrap() {
        count += 1;
        assert_eq!((frame.width(), frame.height()), (160, 120));
        assert_eq!(frame.metadata.ordinal, count);
        // Background is bright, the square is dark.
        assert!(frame.data[[5, 5]] > 0.8);
        assert!(frame.data[[60, 80]] < 0.2);
    }
    assert_eq!(count, 50);
    assert!(!source.is_running());
    assert!(source.next_frame().unwrap().is_none());
    assert!(!source.skip_frame().unwrap());
}

#[test]
fn test_skip_frame_advances_stream() {
    if !ffmpeg_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("square.mp4");
    write_square_clip(&clip);

    let mut source = FfmpegSource::open(&clip).unwrap();
    for _ in 0..49 {
        assert!(source.skip_frame().unwrap());
    }
    let last = source.next_frame().unwrap().unwrap();
    assert_eq!(last.metadata.ordinal, 50);
    assert!(source.next_frame().unwrap().is_none());
    assert!(!source.is_running());
}

#[test]
fn test_drop_mid_stream_does_not_hang() {
    if !ffmpeg_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("square.mp4");
    write_square_clip(&clip);

    let mut source = FfmpegSource::open(&clip).unwrap();
    assert!(source.next_frame().unwrap().is_some());
    drop(source);
}

#[test]
fn test_sampler_over_ffmpeg_source() {
    if !ffmpeg_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("square.mp4");
    write_square_clip(&clip);

    let mut sampler = FrameSampler::new(open_source(&clip).unwrap(), 15, 640, 30.0);
    let ordinals: Vec<usize> = sampler.by_ref().map(|s| s.ordinal).collect();
    assert_eq!(ordinals, vec![15, 30, 45]);
    assert_eq!(sampler.decoded(), 50);
    assert_eq!(sampler.frame_rate(), 25.0);
    assert!(sampler.is_finished());
}

#[test]
fn test_analyze_stationary_square_clip() {
    if !ffmpeg_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("square.mp4");
    write_square_clip(&clip);

    let report = DropAnalyzer::new(AnalysisConfig::default(), ClassifierModel::Absent)
        .analyze(&clip)
        .unwrap();
    assert_eq!(report.duration_sec, 2.0);
    assert_eq!(report.direction, Direction::Stationary);
    assert!(
        (1200..=1900).contains(&report.area_px),
        "area {}",
        report.area_px
    );
}

#[test]
fn test_garbage_container_is_unreadable() {
    let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
    file.write_all(b"this is not a video container").unwrap();
    file.flush().unwrap();

    let err = open_source(file.path()).err().unwrap();
    assert!(matches!(err, DropscanError::SourceUnreadable { .. }));
}
