//! Point pairing: turns an unordered candidate set into measurements
//! using geometric constraints only. No identity tracking: every
//! decision is made from this frame's coordinates plus the carried
//! measurement state.

use glam::Vec2;

use crate::config::PairBand;
use crate::types::{LandmarkCache, MeasureState, Measurement};

/// An ordered point pair accepted by the band check, with its midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedPair {
    pub a: Vec2,
    pub b: Vec2,
    pub midpoint: Vec2,
}

/// Midpoint of two points. Commutative.
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Corner-mode pairing: exhaustive ordered-pair scan.
///
/// Examines every ordered pair (i, j) of the candidate set; self-pairs
/// fall out of the `0 < x_distance` bound. Each accepted pair's
/// midpoint is appended to a per-frame accumulation list, and the
/// moment the list reaches exactly two entries the measurement is
/// overwritten with the displacement between those two midpoints.
/// Pairs accepted after that are still returned (and drawn), but do
/// not touch the measurement again. More than one plausible pair per
/// frame is tolerated rather than tie-broken.
///
/// With no accepted second midpoint the measurement carries forward
/// unchanged.
pub fn pair_scan(
    points: &[Vec2],
    band: &PairBand,
    scale_um_per_px: f32,
    state: &mut MeasureState,
) -> Vec<AcceptedPair> {
    let mut accepted = Vec::new();
    let mut midpoints: Vec<Vec2> = Vec::new();
    let mut updated = false;

    for &pi in points {
        for &pj in points {
            let x_distance = (pi.x - pj.x).abs();
            let y_distance = (pi.y - pj.y).abs();
            if !band.accepts(x_distance, y_distance) {
                continue;
            }
            let mid = midpoint(pi, pj);
            midpoints.push(mid);
            accepted.push(AcceptedPair {
                a: pi,
                b: pj,
                midpoint: mid,
            });
            if midpoints.len() == 2 {
                let dx = midpoints[0].x - midpoints[1].x;
                let dy = midpoints[0].y - midpoints[1].y;
                state.update(Measurement::new(dx * scale_um_per_px, dy * scale_um_per_px));
                updated = true;
            }
        }
    }

    if !updated {
        state.carry_forward();
    }
    accepted
}

/// Contour-mode pairing: extremal landmark cache update.
///
/// Each centroid whose x differs from both cached x values is written
/// into the low slot, after which both axis caches are re-sorted
/// ascending, independently, so the resulting landmarks are axis-wise
/// extrema rather than necessarily detected centroids. While the low
/// x slot still holds the unset sentinel (one landmark seen so far,
/// this frame or earlier) the measurement is left alone; once both
/// slots are live, every insertion recomputes both displacements as
/// `scale × |B − A|`.
///
/// Returns the landmark pair when the cache is complete.
pub fn landmark_scan(
    centroids: &[Vec2],
    scale_um_per_px: f32,
    state: &mut MeasureState,
) -> Option<(Vec2, Vec2)> {
    let mut updated = false;

    for &c in centroids {
        if state.landmarks.contains_x(c.x) {
            continue;
        }
        insert_low_slot(&mut state.landmarks, c);
        if !state.landmarks.is_complete() {
            continue;
        }
        let a = state.landmarks.landmark_a();
        let b = state.landmarks.landmark_b();
        state.update(Measurement::new(
            scale_um_per_px * (b.x - a.x).abs(),
            scale_um_per_px * (b.y - a.y).abs(),
        ));
        updated = true;
    }

    if !updated {
        state.carry_forward();
    }
    state
        .landmarks
        .is_complete()
        .then(|| (state.landmarks.landmark_a(), state.landmarks.landmark_b()))
}

fn insert_low_slot(cache: &mut LandmarkCache, c: Vec2) {
    cache.xs[0] = c.x;
    cache.ys[0] = c.y;
    if cache.xs[0] > cache.xs[1] {
        cache.xs.swap(0, 1);
    }
    if cache.ys[0] > cache.ys[1] {
        cache.ys.swap(0, 1);
    }
}
