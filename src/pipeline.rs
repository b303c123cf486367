//! Per-frame pipeline composition and the synchronous session loop.
//!
//! One loop iteration owns one frame: condition, detect, pair, render,
//! present, drop. The only state that survives an iteration is the
//! caller-owned [`MeasureState`].

use std::path::Path;

use glam::Vec2;
use image::{GrayImage, RgbaImage};

use crate::config::{GapConfig, MeasureMode};
use crate::detect::{ContourFeature, contour_centroids, detect_contour_features, detect_corners};
use crate::detected_points::FrameCandidates;
use crate::error::Error;
use crate::frame_source::FrameSource;
use crate::overlay;
use crate::pairing::{AcceptedPair, landmark_scan, pair_scan};
use crate::preprocess;
use crate::types::{MeasureState, Measurement};
use crate::visualization;

/// Everything one frame produced: detection results, the (possibly
/// carried-forward) measurement, and the rendered overlay. Ephemeral:
/// dropped at the end of the iteration that produced it.
#[derive(Debug)]
pub struct FrameOutput {
    pub candidates: FrameCandidates,
    /// Corner mode: every pair accepted this frame.
    pub accepted_pairs: Vec<AcceptedPair>,
    /// Contour mode: contours that passed the acceptance gate.
    pub contours: Vec<ContourFeature>,
    /// Contour mode: the extremal landmark pair, once the cache is live.
    pub landmarks: Option<(Vec2, Vec2)>,
    /// Current measurement after this frame (carried forward on dropout).
    pub measurement: Option<Measurement>,
    /// Formatted readout, present whenever a measurement exists.
    pub readout: Option<[String; 2]>,
    pub overlay: RgbaImage,
}

/// Condition a raw frame and extract this frame's candidate points.
///
/// Returns the orientation-corrected frame used as the overlay base,
/// the accepted contour features (contour mode only) and the candidate
/// points.
pub fn condition_and_detect(
    cfg: &GapConfig,
    frame: &GrayImage,
) -> (GrayImage, Vec<ContourFeature>, Vec<Vec2>) {
    let base = preprocess::flip180(frame);
    match cfg.mode {
        MeasureMode::Corner => {
            let points = detect_corners(&base, &cfg.corner_detector);
            (base, Vec::new(), points)
        }
        MeasureMode::Contour => {
            let mask = preprocess::edge_mask(&base, &cfg.edge);
            let features = detect_contour_features(&mask, &cfg.contour_band);
            let points = contour_centroids(&features);
            (base, features, points)
        }
    }
}

/// Run the full pipeline on one frame.
///
/// All per-frame accumulation lives inside this call; `state` is the
/// only value carried across frames. An empty candidate set is not an
/// error; the measurement carries forward and the overlay stays bare.
pub fn process_frame(
    cfg: &GapConfig,
    state: &mut MeasureState,
    frame: &GrayImage,
    time_ns: i64,
) -> FrameOutput {
    let (base, contours, points) = condition_and_detect(cfg, frame);
    let candidates = FrameCandidates {
        time_ns,
        img_w_h: (base.width(), base.height()),
        points,
    };

    let (accepted_pairs, landmarks, rendered) = match cfg.mode {
        MeasureMode::Corner => {
            let pairs = pair_scan(
                &candidates.points,
                &cfg.pair_band,
                cfg.scale_um_per_px,
                state,
            );
            let rendered = overlay::render_corner_overlay(
                &base,
                &candidates.points,
                &pairs,
                state.measurement.as_ref(),
            );
            (pairs, None, rendered)
        }
        MeasureMode::Contour => {
            let landmarks = landmark_scan(&candidates.points, cfg.scale_um_per_px, state);
            let rendered =
                overlay::render_contour_overlay(&base, &contours, state.measurement.as_ref());
            (Vec::new(), landmarks, rendered)
        }
    };

    log::trace!(
        "frame t={} candidates={} pairs={} since_update={}",
        time_ns,
        candidates.len(),
        accepted_pairs.len(),
        state.frames_since_update
    );

    FrameOutput {
        candidates,
        accepted_pairs,
        contours,
        landmarks,
        measurement: state.measurement,
        readout: state.measurement.as_ref().map(overlay::readout_lines),
        overlay: rendered,
    }
}

/// Operator command reported by the display sink's bounded input poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    None,
    /// Persist the current frame's overlay.
    Save,
    /// End the session.
    Quit,
}

/// Bounded per-iteration poll of the operator controls.
///
/// Implementations wrap whatever input surface is present; tests script
/// the command sequence directly.
pub trait ControlPoll {
    fn poll(&mut self) -> SessionCommand;
}

/// A control surface that never reports a command; the session runs
/// until the frame source is exhausted.
pub struct NoControl;

impl ControlPoll for NoControl {
    fn poll(&mut self) -> SessionCommand {
        SessionCommand::None
    }
}

/// What a finished session did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub frames: usize,
    pub frames_with_candidates: usize,
    pub measurement_updates: usize,
    pub saved_frames: usize,
    pub final_measurement: Option<Measurement>,
}

/// Single-threaded session loop: one iteration per frame, cooperative
/// quit observed at the top of each iteration, frame-source exhaustion
/// (or failure) terminates the loop with no retry.
pub fn run_session(
    cfg: &GapConfig,
    source: &mut dyn FrameSource,
    control: &mut dyn ControlPoll,
    save_dir: Option<&Path>,
    recording: Option<&rerun::RecordingStream>,
) -> Result<SessionSummary, Error> {
    let mut state = MeasureState::new();
    let mut summary = SessionSummary {
        frames: 0,
        frames_with_candidates: 0,
        measurement_updates: 0,
        saved_frames: 0,
        final_measurement: None,
    };

    loop {
        let command = control.poll();
        if command == SessionCommand::Quit {
            log::info!("quit requested, ending session");
            break;
        }
        let Some(frame) = source.next_frame() else {
            log::info!("frame source exhausted, ending session");
            break;
        };

        let out = process_frame(cfg, &mut state, &frame.gray, frame.time_ns);
        summary.frames += 1;
        if !out.candidates.is_empty() {
            summary.frames_with_candidates += 1;
        }
        if state.frames_since_update == 0 {
            summary.measurement_updates += 1;
        }

        if let Some(recording) = recording {
            visualization::log_frame(recording, "session", &out);
        }
        if command == SessionCommand::Save {
            if let Some(dir) = save_dir {
                let path = crate::io::save_frame(&out.overlay, dir)?;
                log::info!("saved frame to {}", path.display());
                summary.saved_frames += 1;
            }
        }
    }

    summary.final_measurement = state.measurement;
    Ok(summary)
}
