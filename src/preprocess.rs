use image::GrayImage;
use image::imageops;
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

use crate::config::EdgeConfig;

/// 180-degree point reflection, correcting the camera mounting orientation.
///
/// Applied to every frame before any detection runs.
pub fn flip180(frame: &GrayImage) -> GrayImage {
    imageops::rotate180(frame)
}

/// Conditioning for corner mode: orientation fix only.
pub fn condition_corners(frame: &GrayImage) -> GrayImage {
    flip180(frame)
}

/// Conditioning for contour mode: orientation fix, noise suppression,
/// edge extraction and binarization.
pub fn condition_edges(frame: &GrayImage, cfg: &EdgeConfig) -> GrayImage {
    edge_mask(&flip180(frame), cfg)
}

/// Noise suppression, edge extraction and binarization of an already
/// orientation-corrected frame.
///
/// The Canny high threshold is set near the top of the response range
/// and the result is floored at `binary_floor`, so the output mask is
/// strictly binary: edge pixels at 255, everything else at 0.
/// Deterministic for a well-formed input frame.
pub fn edge_mask(flipped: &GrayImage, cfg: &EdgeConfig) -> GrayImage {
    let blurred = gaussian_blur_f32(flipped, cfg.blur_sigma);
    let edges = canny(&blurred, cfg.canny_low, cfg.canny_high);
    threshold(&edges, cfg.binary_floor, ThresholdType::Binary)
}
