// ============================================================
// Layer 4 — Frame Decoding
// ============================================================
// Decodes camera images from disk with the `image` crate.
//
// The model has a fixed 160×320×3 input, so a frame whose
// decoded size differs is resized with a triangle filter
// before it leaves this module. Every image is converted to
// 8-bit RGB regardless of how it was stored (PNG with alpha,
// grayscale JPEG, ...).

use std::path::Path;

use image::{imageops::FilterType, RgbImage};

use crate::data::DataError;
use crate::domain::frame::Frame;

/// Decode the image at `path` into an RGB frame of exactly
/// `height × width`.
pub fn load_frame(path: &Path, height: usize, width: usize) -> Result<Frame, DataError> {
    let decoded = image::open(path).map_err(|source| DataError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(frame_from_rgb(decoded.to_rgb8(), height, width))
}

/// Convert an RGB image into a Frame, resizing when its size differs.
pub fn frame_from_rgb(rgb: RgbImage, height: usize, width: usize) -> Frame {
    let (w, h) = rgb.dimensions();
    let rgb = if (h as usize, w as usize) == (height, width) {
        rgb
    } else {
        tracing::trace!("Resizing {}x{} frame to {}x{}", w, h, width, height);
        image::imageops::resize(&rgb, width as u32, height as u32, FilterType::Triangle)
    };

    Frame {
        height,
        width,
        pixels: rgb.into_raw(),
    }
}
