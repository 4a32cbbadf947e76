#[allow(dead_code)]
mod common;

use dropscan_core::error::DropscanError;
use dropscan_core::io::ser::{SerLayout, SerReader, SerSource};
use dropscan_core::io::{open_source, VideoSource};

#[test]
fn test_parse_8bit_mono() {
    let frame_data: Vec<u8> = (0u8..12).collect();
    let file = common::write_test_ser(&common::build_ser_with_frames(4, 3, &[frame_data]));

    let reader = SerReader::open(file.path()).unwrap();
    assert_eq!(reader.frame_count(), 1);
    assert_eq!(reader.header.width, 4);
    assert_eq!(reader.header.height, 3);
    assert_eq!(reader.header.pixel_depth, 8);
    assert_eq!(reader.header.layout(), SerLayout::Mono);

    let frame = reader.read_frame(0).unwrap();
    assert_eq!((frame.width(), frame.height()), (4, 3));
    assert!((frame.data[[0, 1]] - 1.0 / 255.0).abs() < 1e-6);
    assert!((frame.data[[2, 3]] - 11.0 / 255.0).abs() < 1e-6);
}

#[test]
fn test_parse_16bit_mono() {
    let values: [u16; 4] = [0, 1000, 32767, 65535];
    let mut frame_data = Vec::new();
    for v in &values {
        frame_data.extend_from_slice(&v.to_le_bytes());
    }
    let mut buf = common::build_ser_header_full(2, 2, 16, 1, 0);
    buf.extend_from_slice(&frame_data);
    let file = common::write_test_ser(&buf);

    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert!((frame.data[[0, 1]] - 1000.0 / 65535.0).abs() < 1e-6);
    assert!((frame.data[[1, 1]] - 1.0).abs() < 1e-6);
}

#[test]
fn test_rgb_and_bgr_luminance() {
    let rgb_pixel = vec![255u8, 0, 0];
    let mut buf = common::build_ser_header_full(1, 1, 8, 1, 100);
    buf.extend_from_slice(&rgb_pixel);
    let file = common::write_test_ser(&buf);
    let red = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert!((red.data[[0, 0]] - 0.299).abs() < 1e-4);

    let mut buf = common::build_ser_header_full(1, 1, 8, 1, 101);
    buf.extend_from_slice(&rgb_pixel);
    let file = common::write_test_ser(&buf);
    let blue = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert!((blue.data[[0, 0]] - 0.114).abs() < 1e-4);
}

#[test]
fn test_out_of_range() {
    let file = common::write_test_ser(&common::build_ser_with_frames(2, 2, &[vec![0; 4]]));
    let reader = SerReader::open(file.path()).unwrap();
    assert!(matches!(
        reader.read_frame(1),
        Err(DropscanError::FrameIndexOutOfRange { index: 1, total: 1 })
    ));
}

#[test]
fn test_truncated_file_rejected() {
    let mut buf = common::build_ser_header(4, 4, 3);
    buf.extend_from_slice(&[0u8; 20]);
    let file = common::write_test_ser(&buf);
    assert!(matches!(SerReader::open(file.path()), Err(DropscanError::InvalidSer(_))));
}

#[test]
fn test_bad_magic_rejected() {
    let mut buf = common::build_ser_with_frames(2, 2, &[vec![0; 4]]);
    buf[0] = b'X';
    let file = common::write_test_ser(&buf);
    assert!(matches!(SerReader::open(file.path()), Err(DropscanError::InvalidSer(_))));
}

#[test]
fn test_frame_rate_from_timestamps() {
    let frames = vec![vec![0u8; 4]; 11];
    let mut buf = common::build_ser_with_frames(2, 2, &frames);
    common::append_timestamps(&mut buf, 11, 25.0);
    let file = common::write_test_ser(&buf);

    let reader = SerReader::open(file.path()).unwrap();
    let rate = reader.frame_rate().unwrap();
    assert!((rate - 25.0).abs() < 1e-6, "rate {rate}");
}

#[test]
fn test_frame_rate_missing_without_trailer() {
    let frames = vec![vec![0u8; 4]; 5];
    let file = common::write_test_ser(&common::build_ser_with_frames(2, 2, &frames));
    assert_eq!(SerReader::open(file.path()).unwrap().frame_rate(), None);
}

#[test]
fn test_source_sequential_decode() {
    let frames = vec![vec![10u8; 4], vec![20u8; 4], vec![30u8; 4]];
    let file = common::write_test_ser(&common::build_ser_with_frames(2, 2, &frames));

    let mut source = SerSource::open(file.path()).unwrap();
    assert_eq!(source.info().total_frames, Some(3));
    assert_eq!(source.info().decoder, "ser");

    let first = source.next_frame().unwrap().unwrap();
    assert_eq!(first.metadata.ordinal, 1);
    assert!(source.skip_frame().unwrap());
    let third = source.next_frame().unwrap().unwrap();
    assert_eq!(third.metadata.ordinal, 3);
    assert!((third.data[[0, 0]] - 30.0 / 255.0).abs() < 1e-6);

    assert!(source.next_frame().unwrap().is_none());
    assert!(!source.skip_frame().unwrap());
}

#[test]
fn test_open_source_missing_file() {
    let err = open_source(std::path::Path::new("/nonexistent/video.mp4")).err().unwrap();
    assert!(matches!(err, DropscanError::SourceUnreadable { .. }));
    assert!(err.to_string().starts_with("Could not open video"));
}

#[test]
fn test_open_source_corrupt_ser_is_unreadable() {
    let file = common::write_test_ser(b"not a ser file");
    let err = open_source(file.path()).err().unwrap();
    assert!(matches!(err, DropscanError::SourceUnreadable { .. }));
}

#[test]
fn test_negative_frame_count_rejected() {
    // 65536x65536 16-bit RGB with frame count -1
    let buf = common::build_ser_header_full(65536, 65536, 16, usize::MAX, 100);
    let file = common::write_test_ser(&buf);

    let err = SerReader::open(file.path()).err().unwrap();
    assert!(matches!(err, DropscanError::InvalidSer(_)));
    assert!(err.to_string().contains("frame count"));

    let err = open_source(file.path()).err().unwrap();
    assert!(matches!(err, DropscanError::SourceUnreadable { .. }));
}

#[test]
fn test_negative_width_rejected() {
    let mut buf = common::build_ser_header(4, 3, 0);
    buf[26..30].copy_from_slice(&(-4i32).to_le_bytes());
    let file = common::write_test_ser(&buf);

    let err = SerReader::open(file.path()).err().unwrap();
    assert!(matches!(err, DropscanError::InvalidSer(_)));
}

#[test]
fn test_oversized_data_size_rejected() {
    let buf = common::build_ser_header_full(65536, 65536, 16, i32::MAX as usize, 100);
    let file = common::write_test_ser(&buf);

    let err = SerReader::open(file.path()).err().unwrap();
    assert!(matches!(err, DropscanError::InvalidSer(_)));
    assert!(err.to_string().contains("overflows"));
}
