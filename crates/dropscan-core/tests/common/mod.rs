use dropscan_core::io::ser::SER_HEADER_SIZE;

/// Background level of synthetic drop frames.
pub const BACKGROUND: u8 = 200;
/// Drop level of synthetic drop frames.
pub const DROP: u8 = 40;

/// Build a SER file header for mono 8-bit frames.
///
/// Returns a `Vec<u8>` containing just the 178-byte header.
/// Append frame pixel data after calling this function.
pub fn build_ser_header(width: u32, height: u32, num_frames: usize) -> Vec<u8> {
    build_ser_header_full(width, height, 8, num_frames, 0)
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 100=RGB, 101=BGR
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer, Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 120]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete synthetic mono 8-bit SER file with the given frame data.
pub fn build_ser_with_frames(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, frames.len());
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Append a timestamp trailer with frames spaced evenly at `fps`.
pub fn append_timestamps(buf: &mut Vec<u8>, num_frames: usize, fps: f64) {
    let start: u64 = 638_000_000_000_000_000;
    let step = (10_000_000.0 / fps).round() as u64;
    for i in 0..num_frames as u64 {
        buf.extend_from_slice(&(start + i * step).to_le_bytes());
    }
}

/// Mono 8-bit frame with a dark filled disk on a light background.
pub fn disk_frame(width: usize, height: usize, cx: i64, cy: i64, radius: i64) -> Vec<u8> {
    let mut data = vec![BACKGROUND; width * height];
    for row in 0..height {
        for col in 0..width {
            let dx = col as i64 - cx;
            let dy = row as i64 - cy;
            if dx * dx + dy * dy <= radius * radius {
                data[row * width + col] = DROP;
            }
        }
    }
    data
}

/// Mono 8-bit frame with a dark filled axis-aligned rectangle.
pub fn rect_frame(width: usize, height: usize, x0: usize, y0: usize, w: usize, h: usize) -> Vec<u8> {
    let mut data = vec![BACKGROUND; width * height];
    for row in y0..(y0 + h).min(height) {
        for col in x0..(x0 + w).min(width) {
            data[row * width + col] = DROP;
        }
    }
    data
}

/// Uniform light frame with nothing to detect.
pub fn blank_frame(width: usize, height: usize) -> Vec<u8> {
    vec![BACKGROUND; width * height]
}

/// Position and radius of the moving drop at 1-based frame `k`.
///
/// The drop drifts right by 45 px and grows from radius 15 to 20 between
/// frames 15 and 150.
pub fn moving_drop_at(k: usize) -> (i64, i64, i64) {
    let k = k as i64;
    (30 + k / 3, 45, 15 + k / 30)
}

/// 150 frames of 120x90 with the drop described by [`moving_drop_at`].
pub fn moving_drop_ser() -> Vec<u8> {
    let frames: Vec<Vec<u8>> = (1..=150)
        .map(|k| {
            let (cx, cy, r) = moving_drop_at(k);
            disk_frame(120, 90, cx, cy, r)
        })
        .collect();
    build_ser_with_frames(120, 90, &frames)
}

/// Write a SER buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(".ser")
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}
