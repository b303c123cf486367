//! Overlay rendering: markers, pair lines, contour outlines and the
//! fixed readout box, drawn onto an RGBA copy of the conditioned frame.
//!
//! Raster glyph text is not drawn here; [`readout_lines`] produces the
//! formatted strings and the display path attaches them as labels.

use glam::Vec2;
use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use imageproc::drawing::{
    Blend, draw_cross_mut, draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

use crate::detect::ContourFeature;
use crate::pairing::AcceptedPair;
use crate::types::Measurement;

const CANDIDATE_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
const PAIR_LINE_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
const MARKER_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const READOUT_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Fixed position and size of the opaque readout box (top-left corner).
pub const READOUT_BOX: (i32, i32, u32, u32) = (0, 0, 225, 80);

const MIDPOINT_RADIUS: i32 = 4;
const CENTROID_RADIUS: i32 = 7;
const OUTLINE_RADIUS: i32 = 2;

/// Readout text for the current measurement, absolute values.
pub fn readout_lines(measurement: &Measurement) -> [String; 2] {
    [
        format!("X-Difference is {:.2} um", measurement.abs_x_um()),
        format!("Y-Difference is {:.2} um", measurement.abs_y_um()),
    ]
}

fn canvas_from(frame: &GrayImage) -> Blend<RgbaImage> {
    Blend(DynamicImage::ImageLuma8(frame.clone()).to_rgba8())
}

fn draw_readout_box(canvas: &mut Blend<RgbaImage>) {
    let (x, y, w, h) = READOUT_BOX;
    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(w, h), READOUT_FILL);
}

/// Corner-mode overlay: candidate crosses, pair lines, midpoint discs
/// and the readout box.
///
/// With an empty candidate set the bare frame is returned untouched.
pub fn render_corner_overlay(
    frame: &GrayImage,
    candidates: &[Vec2],
    pairs: &[AcceptedPair],
    measurement: Option<&Measurement>,
) -> RgbaImage {
    let mut canvas = canvas_from(frame);
    if candidates.is_empty() {
        return canvas.0;
    }

    for p in candidates {
        draw_cross_mut(&mut canvas, CANDIDATE_COLOR, p.x as i32, p.y as i32);
    }
    for pair in pairs {
        draw_line_segment_mut(
            &mut canvas,
            (pair.a.x, pair.a.y),
            (pair.b.x, pair.b.y),
            PAIR_LINE_COLOR,
        );
        draw_filled_circle_mut(
            &mut canvas,
            (pair.midpoint.x as i32, pair.midpoint.y as i32),
            MIDPOINT_RADIUS,
            MARKER_COLOR,
        );
    }
    if measurement.is_some() {
        draw_readout_box(&mut canvas);
    }
    canvas.0
}

/// Contour-mode overlay: traced outlines, centroid discs and the
/// readout box.
///
/// With no accepted contours the bare frame is returned untouched.
pub fn render_contour_overlay(
    frame: &GrayImage,
    features: &[ContourFeature],
    measurement: Option<&Measurement>,
) -> RgbaImage {
    let mut canvas = canvas_from(frame);
    if features.is_empty() {
        return canvas.0;
    }

    for feature in features {
        for p in &feature.outline {
            draw_filled_circle_mut(&mut canvas, (p.x, p.y), OUTLINE_RADIUS, MARKER_COLOR);
        }
        draw_filled_circle_mut(
            &mut canvas,
            (feature.centroid.x as i32, feature.centroid.y as i32),
            CENTROID_RADIUS,
            MARKER_COLOR,
        );
    }
    if measurement.is_some() {
        draw_readout_box(&mut canvas);
    }
    canvas.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_shows_absolute_values() {
        let lines = readout_lines(&Measurement::new(-220.0, 41.25));
        assert_eq!(lines[0], "X-Difference is 220.00 um");
        assert_eq!(lines[1], "Y-Difference is 41.25 um");
    }

    #[test]
    fn empty_candidates_leave_frame_bare() {
        let frame = GrayImage::new(64, 64);
        let out = render_corner_overlay(&frame, &[], &[], None);
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn readout_box_is_opaque_when_measurement_present() {
        let frame = GrayImage::new(300, 120);
        let m = Measurement::new(10.0, 20.0);
        let out = render_corner_overlay(&frame, &[Vec2::new(250.0, 100.0)], &[], Some(&m));
        assert_eq!(out.get_pixel(10, 10).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(224, 79).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(226, 10).0, [0, 0, 0, 255]);
    }
}
