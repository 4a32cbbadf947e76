use std::path::{Path, PathBuf};

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, OutputVideoFrame};
use ffmpeg_sidecar::iter::FfmpegIterator;
use tracing::{debug, warn};

use crate::error::{DropscanError, Result};
use crate::frame::{Frame, FrameMetadata, SourceInfo};

use super::source::VideoSource;

/// Container-agnostic source backed by an `ffmpeg` child process that emits
/// `rgb24` rawvideo on stdout.
pub struct FfmpegSource {
    info: SourceInfo,
    child: Option<FfmpegChild>,
    events: Option<FfmpegIterator>,
    decoded: usize,
}

impl FfmpegSource {
    pub fn open(path: &Path) -> Result<Self> {
        let info = probe(path)?;

        let mut child = FfmpegCommand::new()
            .hide_banner()
            .input(path)
            .rawvideo()
            .spawn()
            .map_err(|e| DropscanError::unreadable(path, format!("failed to spawn ffmpeg: {e}")))?;

        let events = match child.iter() {
            Ok(events) => events,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DropscanError::unreadable(path, format!("ffmpeg output unavailable: {e}")));
            }
        };

        Ok(Self {
            info,
            child: Some(child),
            events: Some(events),
            decoded: 0,
        })
    }

    /// True until the decoder has been released at end of stream.
    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// Stop the decoder process and reap it. Safe to call more than once.
    fn release(&mut self) {
        self.events = None;
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                debug!(error = %e, "ffmpeg already exited");
            }
            let _ = child.wait();
        }
    }

    /// Pull the next complete rawvideo frame off the event stream. The
    /// decoder is released once the stream ends or delivers a short frame.
    fn next_output(&mut self) -> Option<OutputVideoFrame> {
        let events = self.events.as_mut()?;
        let mut output = None;

        for event in events.by_ref() {
            match event {
                FfmpegEvent::OutputFrame(out) => {
                    let expected = out.width as usize * out.height as usize * 3;
                    if out.data.len() < expected {
                        warn!(
                            frame = self.decoded + 1,
                            bytes = out.data.len(),
                            expected,
                            "Short rawvideo frame from ffmpeg, stopping"
                        );
                    } else {
                        output = Some(out);
                    }
                    break;
                }
                FfmpegEvent::Error(line) | FfmpegEvent::Log(LogLevel::Fatal, line) => {
                    warn!(%line, "ffmpeg reported an error");
                }
                FfmpegEvent::Log(LogLevel::Error, line) => {
                    debug!(%line, "ffmpeg");
                }
                _ => {}
            }
        }

        if output.is_none() {
            self.release();
        } else {
            self.decoded += 1;
        }
        output
    }
}

impl VideoSource for FfmpegSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(out) = self.next_output() else {
            return Ok(None);
        };
        let frame = Frame::from_rgb8(&out.data, out.width as usize, out.height as usize).ok_or(
            DropscanError::InvalidDimensions {
                width: out.width,
                height: out.height,
            },
        )?;
        Ok(Some(frame.with_metadata(FrameMetadata {
            ordinal: self.decoded,
            timestamp_us: None,
        })))
    }

    /// Consume the next frame without converting its pixels.
    fn skip_frame(&mut self) -> Result<bool> {
        Ok(self.next_output().is_some())
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Read stream dimensions and frame rate with ffprobe.
fn probe(path: &Path) -> Result<SourceInfo> {
    let metadata = ffprobe::ffprobe(path)
        .map_err(|e| DropscanError::unreadable(path, format!("ffprobe failed: {e:?}")))?;

    let stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| DropscanError::unreadable(path, "no video stream"))?;

    let width = stream.width.unwrap_or(0).max(0) as u32;
    let height = stream.height.unwrap_or(0).max(0) as u32;
    if width == 0 || height == 0 {
        return Err(DropscanError::unreadable(
            path,
            format!("invalid video dimensions {width}x{height}"),
        ));
    }

    let frame_rate = parse_frame_rate(&stream.r_frame_rate)
        .or_else(|| parse_frame_rate(&stream.avg_frame_rate));
    let total_frames = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|&n| n > 0);

    Ok(SourceInfo {
        filename: PathBuf::from(path),
        width,
        height,
        frame_rate,
        total_frames,
        decoder: "ffmpeg",
    })
}

/// Parse an ffprobe rate string ("30000/1001", "25/1" or "29.97").
/// Zero, negative and non-finite rates are rejected.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}
