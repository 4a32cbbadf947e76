use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};
use ndarray::Array2;

use crate::error::{DropscanError, Result};
use crate::frame::Frame;

/// Load a still image (any format the `image` crate decodes) into a Frame,
/// using the same BT.601 luminance as the video decoders.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?.to_rgb8();
    let (w, h) = img.dimensions();
    Frame::from_rgb8(img.as_raw(), w as usize, h as usize)
        .ok_or(DropscanError::InvalidDimensions { width: w, height: h })
}

/// Save a binary foreground mask as 8-bit PNG (foreground = 255).
pub fn save_mask_png(mask: &Array2<bool>, path: &Path) -> Result<()> {
    let (h, w) = mask.dim();

    let mut img = GrayImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let val = if mask[[row, col]] { 255 } else { 0 };
            img.put_pixel(col as u32, row as u32, Luma([val]));
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
