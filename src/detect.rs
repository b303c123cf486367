use glam::Vec2;
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::corners::corners_fast9;
use imageproc::point::Point;

use crate::config::{ContourBand, CornerDetectorConfig};

/// One external contour that passed the acceptance gate.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourFeature {
    /// Centroid from the first-order moments.
    pub centroid: Vec2,
    /// Contour area (zeroth moment magnitude), in px^2.
    pub area: f64,
    /// Traced boundary, kept for overlay drawing.
    pub outline: Vec<Point<i32>>,
}

/// Extract corner candidates from a conditioned frame.
///
/// Runs the corner-response detector, then keeps at most
/// `max_corners` responses that clear the relative quality floor and
/// the mutual separation distance, strongest first. Output order is by
/// descending response; downstream treats it as unordered.
pub fn detect_corners(frame: &GrayImage, cfg: &CornerDetectorConfig) -> Vec<Vec2> {
    let corners = corners_fast9(frame, cfg.fast_threshold);
    let responses: Vec<(Vec2, f32)> = corners
        .iter()
        .map(|c| (Vec2::new(c.x as f32, c.y as f32), c.score))
        .collect();
    select_strongest(&responses, cfg)
}

/// Strongest-first selection with a relative quality floor and a
/// minimum mutual distance.
///
/// Factored out of [`detect_corners`] so the acceptance logic is
/// exercised without synthesizing detector responses from pixels.
pub fn select_strongest(responses: &[(Vec2, f32)], cfg: &CornerDetectorConfig) -> Vec<Vec2> {
    let mut ranked: Vec<(Vec2, f32)> = responses.to_vec();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let Some(&(_, best)) = ranked.first() else {
        return Vec::new();
    };
    let floor = best * cfg.quality_ratio;
    let min_dist_sq = cfg.min_distance_px * cfg.min_distance_px;

    let mut accepted: Vec<Vec2> = Vec::new();
    for &(p, score) in &ranked {
        if accepted.len() >= cfg.max_corners {
            break;
        }
        if score < floor {
            break;
        }
        if accepted.iter().all(|q| p.distance_squared(*q) >= min_dist_sq) {
            accepted.push(p);
        }
    }
    log::trace!("corner selection kept {}/{}", accepted.len(), responses.len());
    accepted
}

/// Extract accepted contour centroids from a binary mask.
///
/// Traces external boundaries, computes polygon moments over each
/// boundary, and keeps contours whose area lies strictly inside the
/// configured band and whose zeroth moment clears the mass floor. Each
/// retained contour contributes exactly one centroid. An empty result
/// is an expected outcome, not an error.
pub fn detect_contour_features(mask: &GrayImage, band: &ContourBand) -> Vec<ContourFeature> {
    let contours = find_contours::<i32>(mask);
    let mut features = Vec::new();
    for contour in &contours {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        let Some((area, centroid)) = polygon_moments(&contour.points) else {
            continue;
        };
        if area > band.area_min && area < band.area_max && area > band.min_mass {
            features.push(ContourFeature {
                centroid,
                area,
                outline: contour.points.clone(),
            });
        }
    }
    log::trace!("contours kept {}/{}", features.len(), contours.len());
    features
}

/// Centroids of the accepted contours, in detection order.
pub fn contour_centroids(features: &[ContourFeature]) -> Vec<Vec2> {
    features.iter().map(|f| f.centroid).collect()
}

/// Zeroth- and first-order polygon moments over a traced boundary
/// (Green's theorem). Returns `(area_magnitude, centroid)`, or `None`
/// for degenerate boundaries with no enclosed area.
fn polygon_moments(points: &[Point<i32>]) -> Option<(f64, Vec2)> {
    if points.len() < 3 {
        return None;
    }
    let mut a2 = 0.0f64; // twice the signed area
    let mut cx = 0.0f64;
    let mut cy = 0.0f64;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        let cross = (p.x as f64) * (q.y as f64) - (q.x as f64) * (p.y as f64);
        a2 += cross;
        cx += ((p.x + q.x) as f64) * cross;
        cy += ((p.y + q.y) as f64) * cross;
    }
    if a2 == 0.0 {
        return None;
    }
    let centroid = Vec2::new((cx / (3.0 * a2)) as f32, (cy / (3.0 * a2)) as f32);
    Some(((a2 * 0.5).abs(), centroid))
}
