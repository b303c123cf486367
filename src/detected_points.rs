use glam::Vec2;

/// Candidate points detected in one frame.
///
/// Re-created every frame and never merged across frames; a point has
/// no identity beyond its position. Extraction order (by response
/// strength in corner mode) is incidental; consumers treat the set as
/// unordered. An empty set is a valid outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCandidates {
    pub time_ns: i64,
    pub img_w_h: (u32, u32),
    pub points: Vec<Vec2>,
}

impl FrameCandidates {
    pub fn empty(time_ns: i64, img_w_h: (u32, u32)) -> FrameCandidates {
        FrameCandidates {
            time_ns,
            img_w_h,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
