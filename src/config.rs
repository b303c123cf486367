use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which measurement variant the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MeasureMode {
    /// Corner-response detection with ordered-pair matching.
    Corner,
    /// Edge/contour centroid detection with extremal landmark pairing.
    Contour,
}

/// Geometric acceptance band for corner-mode point pairs.
///
/// A pair (i, j) is accepted when `0 < |xi - xj| <= x_max` and
/// `y_min < |yi - yj| <= y_max`. Calibrated once against the known
/// physical separation at a fixed working distance; changing the
/// working distance invalidates these values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairBand {
    /// Maximum horizontal offset (px) for a near axis-aligned pair.
    pub x_max: f32,
    /// Lower edge (px) of the expected vertical separation band.
    pub y_min: f32,
    /// Upper edge (px) of the expected vertical separation band.
    pub y_max: f32,
}

impl PairBand {
    /// Band check for one ordered pair's axis distances.
    ///
    /// The x distance must be positive (self-pairs fall out here) and
    /// each distance must sit above its lower edge and at or below its
    /// upper edge.
    pub fn accepts(&self, x_distance: f32, y_distance: f32) -> bool {
        x_distance > 0.0
            && x_distance <= self.x_max
            && y_distance > self.y_min
            && y_distance <= self.y_max
    }
}

impl Default for PairBand {
    fn default() -> Self {
        Self {
            x_max: 8.0,
            y_min: 200.0,
            y_max: 223.0,
        }
    }
}

/// Acceptance gate for contour-mode centroid candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourBand {
    /// Lower edge (px^2, exclusive) of the accepted contour area band.
    pub area_min: f64,
    /// Upper edge (px^2, exclusive) of the accepted contour area band.
    pub area_max: f64,
    /// Minimum zeroth moment a contour must carry to count as a mark.
    pub min_mass: f64,
}

impl Default for ContourBand {
    fn default() -> Self {
        Self {
            area_min: 30.0,
            area_max: 50.0,
            min_mass: 30.0,
        }
    }
}

/// Corner-response extraction settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerDetectorConfig {
    /// Maximum number of corners kept per frame.
    pub max_corners: usize,
    /// Minimum accepted response relative to the strongest corner.
    pub quality_ratio: f32,
    /// Minimum pixel distance between two accepted corners.
    pub min_distance_px: f32,
    /// FAST-9 intensity threshold.
    pub fast_threshold: u8,
}

impl Default for CornerDetectorConfig {
    fn default() -> Self {
        Self {
            max_corners: 9,
            quality_ratio: 0.01,
            min_distance_px: 12.0,
            fast_threshold: 32,
        }
    }
}

/// Edge-mode conditioning settings.
///
/// The high Canny threshold together with `binary_floor` leaves a
/// near-binary mask: edge pixels at 255, everything else at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Gaussian blur sigma applied before edge extraction.
    pub blur_sigma: f32,
    /// Canny low threshold.
    pub canny_low: f32,
    /// Canny high threshold.
    pub canny_high: f32,
    /// Binarization floor applied to the edge response.
    pub binary_floor: u8,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            // Matches a 5x5 kernel with auto sigma.
            blur_sigma: 1.1,
            canny_low: 100.0,
            canny_high: 255.0,
            binary_floor: 254,
        }
    }
}

/// Top-level session configuration.
///
/// `scale_um_per_px` and the acceptance bands are supplied at startup
/// and stay constant for the lifetime of the run; nothing here is
/// re-derived from image data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapConfig {
    /// Measurement variant.
    pub mode: MeasureMode,
    /// Physical length of one pixel, in micrometers.
    pub scale_um_per_px: f32,
    /// Uniform downscale applied to ingested raw frames (1.0 = none).
    pub prescale: f32,
    /// Corner-mode pair acceptance band.
    pub pair_band: PairBand,
    /// Contour-mode centroid acceptance gate.
    pub contour_band: ContourBand,
    /// Corner extraction settings.
    pub corner_detector: CornerDetectorConfig,
    /// Edge-mode conditioning settings.
    pub edge: EdgeConfig,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            mode: MeasureMode::Contour,
            scale_um_per_px: 2.75,
            prescale: 0.3,
            pair_band: PairBand::default(),
            contour_band: ContourBand::default(),
            corner_detector: CornerDetectorConfig::default(),
            edge: EdgeConfig::default(),
        }
    }
}

impl GapConfig {
    /// Convert a pixel displacement to micrometers.
    pub fn px_to_um(&self, px: f32) -> f32 {
        px * self.scale_um_per_px
    }
}
