//! Frame acquisition boundary.
//!
//! The imaging device itself lives behind [`FrameSource`]; this module
//! provides a folder-backed source for recorded sessions, raw
//! device-buffer ingest matching the SDK memory layout (pitch-padded
//! 8/24/32-bit rows), and a parallel batch loader for offline analysis.

use std::path::{Path, PathBuf};

use glob::glob;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageReader};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use rerun::TimeCell;

use crate::config::GapConfig;
use crate::detected_points::FrameCandidates;
use crate::error::Error;
use crate::pipeline::condition_and_detect;
use crate::visualization::log_image;

/// One acquired frame with its capture timestamp.
pub struct TimedFrame {
    pub time_ns: i64,
    pub gray: GrayImage,
}

/// On-demand frame supplier. `None` means the source is done (end of
/// recording or acquisition failure) and the session loop must stop;
/// there is no retry path.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<TimedFrame>;
}

/// Parses the timestamp from a file path.
///
/// Assumes the filename (without extension) is a timestamp in
/// nanoseconds; anything else maps to 0.
fn path_to_timestamp(path: &Path) -> i64 {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

fn img_filter(rp: glob::GlobResult) -> Option<PathBuf> {
    if let Ok(p) = rp {
        for ext in &[".png", ".jpg"] {
            if p.as_os_str().to_string_lossy().ends_with(ext) {
                return Some(p);
            }
        }
    }
    None
}

/// Uniform downscale applied at ingest (1.0 passes the frame through).
pub fn prescale(frame: GrayImage, factor: f32) -> GrayImage {
    if factor <= 0.0 || (factor - 1.0).abs() < f32::EPSILON {
        return frame;
    }
    let w = ((frame.width() as f32 * factor).round() as u32).max(1);
    let h = ((frame.height() as f32 * factor).round() as u32).max(1);
    imageops::resize(&frame, w, h, FilterType::Triangle)
}

/// Folder-backed frame source: image files sorted by path, timestamps
/// taken from the file stem.
pub struct FolderSource {
    paths: Vec<PathBuf>,
    next_idx: usize,
    prescale: f32,
}

impl FolderSource {
    pub fn new(root_folder: &str, prescale: f32) -> FolderSource {
        let img_paths = glob(format!("{}/**/*", root_folder).as_str()).expect("failed");
        let mut paths: Vec<PathBuf> = img_paths.into_iter().filter_map(img_filter).collect();
        paths.sort();
        log::info!("folder source: {} frames under {}", paths.len(), root_folder);
        FolderSource {
            paths,
            next_idx: 0,
            prescale,
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for FolderSource {
    fn next_frame(&mut self) -> Option<TimedFrame> {
        let path = self.paths.get(self.next_idx)?;
        self.next_idx += 1;
        let img = match ImageReader::open(path).map(|r| r.decode()) {
            Ok(Ok(img)) => img,
            _ => {
                // Acquisition failure terminates the session.
                log::warn!("failed to decode {}, stopping", path.display());
                return None;
            }
        };
        Some(TimedFrame {
            time_ns: path_to_timestamp(path),
            gray: prescale(img.to_luma8(), self.prescale),
        })
    }
}

/// Geometry of a raw device buffer: the SDK hands over pitch-padded
/// rows of 8-bit mono, 24-bit BGR or 32-bit BGRA pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrameDesc {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    /// Distance in bytes between adjacent row starts.
    pub pitch: usize,
}

/// Convert a raw device buffer into a grayscale frame.
pub fn frame_from_raw(desc: &RawFrameDesc, data: &[u8]) -> Result<GrayImage, Error> {
    let bytes_per_pixel = match desc.bits_per_pixel {
        8 | 24 | 32 => (desc.bits_per_pixel / 8) as usize,
        bits => return Err(Error::UnsupportedPixelLayout { bits_per_pixel: bits }),
    };
    let row_bytes = desc.width as usize * bytes_per_pixel;
    if desc.pitch < row_bytes {
        return Err(Error::InvalidPitch {
            pitch: desc.pitch,
            row_bytes,
        });
    }
    let expected = if desc.height == 0 {
        0
    } else {
        desc.pitch * (desc.height as usize - 1) + row_bytes
    };
    if data.len() < expected {
        return Err(Error::BufferTooSmall {
            expected,
            actual: data.len(),
        });
    }

    let mut out = GrayImage::new(desc.width, desc.height);
    for y in 0..desc.height as usize {
        let row = &data[y * desc.pitch..y * desc.pitch + row_bytes];
        for x in 0..desc.width as usize {
            let luma = match bytes_per_pixel {
                1 => row[x],
                // BGR(A) order per the device SDK.
                _ => {
                    let b = row[x * bytes_per_pixel] as f32;
                    let g = row[x * bytes_per_pixel + 1] as f32;
                    let r = row[x * bytes_per_pixel + 2] as f32;
                    (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8
                }
            };
            out.put_pixel(x as u32, y as u32, image::Luma([luma]));
        }
    }
    Ok(out)
}

/// Offline batch pass: detect candidates in every frame under a folder,
/// in parallel, optionally logging each frame to rerun.
///
/// `None` entries mark frames that failed to decode.
pub fn load_folder_candidates(
    root_folder: &str,
    cfg: &GapConfig,
    recording_option: Option<&rerun::RecordingStream>,
) -> Vec<Option<FrameCandidates>> {
    let img_paths = glob(format!("{}/**/*", root_folder).as_str()).expect("failed");
    let mut sorted_path: Vec<PathBuf> = img_paths.into_iter().filter_map(img_filter).collect();
    sorted_path.sort();

    let mut time_frame: Vec<_> = sorted_path
        .par_iter()
        .progress_count(sorted_path.len() as u64)
        .map(|path| {
            let time_ns = path_to_timestamp(path);
            let Ok(Ok(img)) = ImageReader::open(path).map(|r| r.decode()) else {
                log::warn!("failed to decode {}", path.display());
                return (time_ns, None);
            };
            let gray = prescale(img.to_luma8(), cfg.prescale);
            if let Some(recording) = recording_option {
                recording.set_time(
                    "stable",
                    TimeCell::from_timestamp_nanos_since_epoch(time_ns),
                );
                log_image(recording, "batch", &gray);
            }
            let (base, _, points) = condition_and_detect(cfg, &gray);
            (
                time_ns,
                Some(FrameCandidates {
                    time_ns,
                    img_w_h: (base.width(), base.height()),
                    points,
                }),
            )
        })
        .collect();
    time_frame.sort_by(|a, b| a.0.cmp(&b.0));
    time_frame.into_iter().map(|f| f.1).collect()
}
