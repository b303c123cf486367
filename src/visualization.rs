use image::{DynamicImage, GrayImage};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rerun::{RecordingStream, TimeCell};
use std::io::Cursor;

use crate::detected_points::FrameCandidates;
use crate::pipeline::FrameOutput;

pub fn log_image_as_compressed(
    recording: &RecordingStream,
    topic: &str,
    img: &DynamicImage,
    format: image::ImageFormat,
) {
    let mut bytes: Vec<u8> = Vec::new();

    img.to_luma8()
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();

    recording
        .log(
            format!("{}/image", topic),
            &rerun::EncodedImage::from_file_contents(bytes),
        )
        .unwrap();
}

/// Log a grayscale frame under `topic/image`.
pub fn log_image(recording: &RecordingStream, topic: &str, img: &GrayImage) {
    log_image_as_compressed(
        recording,
        topic,
        &DynamicImage::ImageLuma8(img.clone()),
        image::ImageFormat::Png,
    );
}

pub fn id_to_color(id: usize) -> (u8, u8, u8, u8) {
    let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
    let color_num = rng.random_range(0..2u32.pow(24));
    (
        ((color_num >> 16) % 256) as u8,
        ((color_num >> 8) % 256) as u8,
        (color_num % 256) as u8,
        255,
    )
}

/// rerun uses the top left corner as (0, 0)
pub fn rerun_shift(p2ds: &[(f32, f32)]) -> Vec<(f32, f32)> {
    p2ds.iter().map(|(x, y)| (*x + 0.5, *y + 0.5)).collect()
}

/// Log one processed frame: the rendered overlay, candidate points,
/// pair segments and the measurement readout (as point labels, the
/// text channel of the display).
pub fn log_frame(recording: &RecordingStream, topic: &str, out: &FrameOutput) {
    recording.set_time(
        "stable",
        TimeCell::from_timestamp_nanos_since_epoch(out.candidates.time_ns),
    );

    let mut bytes: Vec<u8> = Vec::new();
    out.overlay
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    recording
        .log(
            format!("{}/image", topic),
            &rerun::EncodedImage::from_file_contents(bytes),
        )
        .unwrap();

    if !out.candidates.is_empty() {
        let (pts, colors): (Vec<_>, Vec<_>) = out
            .candidates
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| ((p.x, p.y), id_to_color(i)))
            .unzip();
        let pts = rerun_shift(&pts);
        let mut points = rerun::Points2D::new(pts)
            .with_colors(colors)
            .with_radii([rerun::Radius::new_ui_points(5.0)]);
        if !out.contours.is_empty() {
            points = points.with_labels(
                out.candidates.points.iter().map(|_| "center".to_string()),
            );
        }
        recording
            .log(format!("{}/pts", topic), &points)
            .unwrap();
    }

    if !out.accepted_pairs.is_empty() {
        let strips: Vec<Vec<(f32, f32)>> = out
            .accepted_pairs
            .iter()
            .map(|pair| {
                rerun_shift(&[(pair.a.x, pair.a.y), (pair.b.x, pair.b.y)])
            })
            .collect();
        recording
            .log(format!("{}/pairs", topic), &rerun::LineStrips2D::new(strips))
            .unwrap();

        let (mids, labels): (Vec<_>, Vec<_>) = out
            .accepted_pairs
            .iter()
            .map(|pair| ((pair.midpoint.x, pair.midpoint.y), "mid".to_string()))
            .unzip();
        let mids = rerun_shift(&mids);
        recording
            .log(
                format!("{}/mid", topic),
                &rerun::Points2D::new(mids)
                    .with_labels(labels)
                    .with_radii([rerun::Radius::new_ui_points(4.0)]),
            )
            .unwrap();
    }

    if let Some(readout) = &out.readout {
        // Anchored inside the readout box drawn by the overlay.
        let anchors = rerun_shift(&[(10.0, 60.0), (10.0, 30.0)]);
        recording
            .log(
                format!("{}/readout", topic),
                &rerun::Points2D::new(anchors)
                    .with_labels([readout[0].clone(), readout[1].clone()])
                    .with_radii([rerun::Radius::new_ui_points(2.0)]),
            )
            .unwrap();
    }
}

/// Log a batch of detected candidate frames, one time step each.
pub fn log_candidate_frames(
    recording: &RecordingStream,
    topic: &str,
    frames: &[Option<FrameCandidates>],
) {
    for f in frames {
        let Some(f) = f else {
            continue;
        };
        let (pts, colors): (Vec<_>, Vec<_>) = f
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| ((p.x, p.y), id_to_color(i)))
            .unzip();
        let pts = rerun_shift(&pts);

        recording.set_time(
            "stable",
            TimeCell::from_timestamp_nanos_since_epoch(f.time_ns),
        );
        recording
            .log(
                format!("{}/pts", topic),
                &rerun::Points2D::new(pts)
                    .with_colors(colors)
                    .with_radii([rerun::Radius::new_ui_points(5.0)]),
            )
            .unwrap();
    }
}
