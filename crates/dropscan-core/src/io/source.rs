use std::path::Path;

use tracing::info;

use crate::error::{DropscanError, Result};
use crate::frame::{Frame, SourceInfo};

use super::ffmpeg::FfmpegSource;
use super::ser::SerSource;

/// A sequential decoder over one video file.
///
/// Implementors hold the underlying file or process handle and release it
/// when dropped.
pub trait VideoSource {
    fn info(&self) -> &SourceInfo;

    /// Decode the next frame. `Ok(None)` marks the end of the stream.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Advance past one frame without keeping it. Returns `false` at the end
    /// of the stream.
    fn skip_frame(&mut self) -> Result<bool> {
        Ok(self.next_frame()?.is_some())
    }
}

/// Open a video file, choosing the decoder from its extension.
///
/// `.ser` files are read natively; every other container goes through ffmpeg.
/// Any failure to open is reported as [`DropscanError::SourceUnreadable`].
pub fn open_source(path: &Path) -> Result<Box<dyn VideoSource>> {
    if !path.is_file() {
        return Err(DropscanError::unreadable(path, "file not found"));
    }

    let is_ser = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ser"));

    let source: Box<dyn VideoSource> = if is_ser {
        Box::new(SerSource::open(path).map_err(|e| DropscanError::unreadable(path, e))?)
    } else {
        Box::new(FfmpegSource::open(path)?)
    };

    let info = source.info();
    info!(
        file = %path.display(),
        decoder = info.decoder,
        width = info.width,
        height = info.height,
        frame_rate = ?info.frame_rate,
        total_frames = ?info.total_frames,
        "Opened video source"
    );
    Ok(source)
}
