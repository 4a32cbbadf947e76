use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array2;
use tracing::debug;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, SER_TICKS_PER_SECOND};
use crate::error::{DropscanError, Result};
use crate::frame::{Frame, FrameMetadata, SourceInfo};

use super::source::VideoSource;

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
}

/// Channel layout of SER pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerLayout {
    /// Mono and raw Bayer data: one plane, used as intensity directly.
    Mono,
    Rgb,
    Bgr,
}

impl SerHeader {
    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    pub fn layout(&self) -> SerLayout {
        match self.color_id {
            100 => SerLayout::Rgb,
            101 => SerLayout::Bgr,
            _ => SerLayout::Mono,
        }
    }

    /// Number of planes per pixel (1 for mono/bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.layout() {
            SerLayout::Mono => 1,
            SerLayout::Rgb | SerLayout::Bgr => 3,
        }
    }

    /// Total bytes per frame, or `None` if the dimensions overflow.
    pub fn frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_pixel_plane() * self.planes_per_pixel())
    }
}

/// Memory-mapped SER file reader.
pub struct SerReader {
    mmap: Mmap,
    frame_size: usize,
    pub header: SerHeader,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and lives no longer than the reader.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(DropscanError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(DropscanError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let frame_size = header.frame_byte_size().ok_or(DropscanError::InvalidDimensions {
            width: header.width,
            height: header.height,
        })?;

        let expected_data_size = frame_size
            .checked_mul(header.frame_count as usize)
            .and_then(|data| data.checked_add(SER_HEADER_SIZE))
            .ok_or_else(|| {
                DropscanError::InvalidSer(format!(
                    "Header declares {} frames of {} bytes, which overflows",
                    header.frame_count, frame_size
                ))
            })?;
        if mmap.len() < expected_data_size {
            return Err(DropscanError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            frame_size,
            header,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(DropscanError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let offset = SER_HEADER_SIZE + index * self.frame_size;
        Ok(&self.mmap[offset..offset + self.frame_size])
    }

    /// Read a single frame as luminance in [0.0, 1.0].
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let raw = self.frame_raw(index)?;
        let data = decode_luminance(raw, &self.header);
        Ok(Frame::new(data))
    }

    /// Read per-frame timestamp (100 ns ticks) from the optional trailer.
    pub fn read_timestamp(&self, index: usize) -> Option<u64> {
        let trailer_offset = SER_HEADER_SIZE + self.frame_size * self.frame_count();
        let ts_offset = trailer_offset + index * 8;
        if ts_offset + 8 <= self.mmap.len() {
            let bytes = &self.mmap[ts_offset..ts_offset + 8];
            Some(u64::from_le_bytes(bytes.try_into().ok()?))
        } else {
            None
        }
    }

    /// Frame rate implied by the timestamp trailer.
    ///
    /// Returns `None` when the trailer is missing or the timestamps are not
    /// strictly increasing.
    pub fn frame_rate(&self) -> Option<f64> {
        let n = self.frame_count();
        if n < 2 {
            return None;
        }
        let first = self.read_timestamp(0)?;
        let last = self.read_timestamp(n - 1)?;
        if last <= first {
            return None;
        }
        let mut prev = first;
        for i in 1..n {
            let ts = self.read_timestamp(i)?;
            if ts <= prev {
                return None;
            }
            prev = ts;
        }
        let span_sec = (last - first) as f64 / SER_TICKS_PER_SECOND;
        Some((n - 1) as f64 / span_sec)
    }

    /// Iterator over all frames.
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }
}

/// Sequential [`VideoSource`] over a SER file.
pub struct SerSource {
    reader: SerReader,
    info: SourceInfo,
    cursor: usize,
}

impl SerSource {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = SerReader::open(path)?;
        let frame_rate = reader.frame_rate();
        debug!(
            frames = reader.frame_count(),
            ?frame_rate,
            layout = ?reader.header.layout(),
            "Opened SER source"
        );
        let info = SourceInfo {
            filename: PathBuf::from(path),
            width: reader.header.width,
            height: reader.header.height,
            frame_rate,
            total_frames: Some(reader.frame_count()),
            decoder: "ser",
        };
        Ok(Self {
            reader,
            info,
            cursor: 0,
        })
    }

    pub fn reader(&self) -> &SerReader {
        &self.reader
    }
}

impl VideoSource for SerSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.cursor >= self.reader.frame_count() {
            return Ok(None);
        }
        let frame = self.reader.read_frame(self.cursor)?;
        self.cursor += 1;
        Ok(Some(frame.with_metadata(FrameMetadata {
            ordinal: self.cursor,
            timestamp_us: None,
        })))
    }

    fn skip_frame(&mut self) -> Result<bool> {
        if self.cursor >= self.reader.frame_count() {
            return Ok(false);
        }
        self.cursor += 1;
        Ok(true)
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = read_non_negative(&mut cursor, "width")?;
    let height = read_non_negative(&mut cursor, "height")?;
    let pixel_depth = read_non_negative(&mut cursor, "pixel depth")?;
    let frame_count = read_non_negative(&mut cursor, "frame count")?;

    if width == 0 || height == 0 {
        return Err(DropscanError::InvalidDimensions { width, height });
    }
    if pixel_depth == 0 || pixel_depth > 16 {
        return Err(DropscanError::InvalidSer(format!(
            "Unsupported pixel depth: {pixel_depth}"
        )));
    }

    // Many writers put 0 here for little-endian data; only 1 means big-endian.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
    })
}

fn read_non_negative(cursor: &mut std::io::Cursor<&[u8]>, field: &str) -> Result<u32> {
    let value = cursor.read_i32::<LittleEndian>()?;
    u32::try_from(value)
        .map_err(|_| DropscanError::InvalidSer(format!("Negative {field} in header: {value}")))
}

fn decode_luminance(raw: &[u8], header: &SerHeader) -> Array2<f32> {
    let h = header.height as usize;
    let w = header.width as usize;
    let bps = header.bytes_per_pixel_plane();
    let planes = header.planes_per_pixel();
    let max_val = ((1u32 << header.pixel_depth) - 1) as f32;

    let sample = |idx: usize| -> f32 {
        let val = if bps == 1 {
            raw[idx] as f32
        } else {
            let pair = [raw[idx], raw[idx + 1]];
            if header.little_endian {
                u16::from_le_bytes(pair) as f32
            } else {
                u16::from_be_bytes(pair) as f32
            }
        };
        (val / max_val).min(1.0)
    };

    let mut data = Array2::<f32>::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let base = (row * w + col) * planes * bps;
            data[[row, col]] = match header.layout() {
                SerLayout::Mono => sample(base),
                SerLayout::Rgb => {
                    LUMINANCE_R * sample(base)
                        + LUMINANCE_G * sample(base + bps)
                        + LUMINANCE_B * sample(base + 2 * bps)
                }
                SerLayout::Bgr => {
                    LUMINANCE_B * sample(base)
                        + LUMINANCE_G * sample(base + bps)
                        + LUMINANCE_R * sample(base + 2 * bps)
                }
            };
        }
    }
    data
}
