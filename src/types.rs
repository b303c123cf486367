use serde::{Deserialize, Serialize};

/// Physical displacement between the two paired landmarks, in micrometers.
///
/// Signs follow the subtraction order used by the pairing engine; the
/// readout always displays absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub x_difference_um: f32,
    pub y_difference_um: f32,
}

impl Measurement {
    pub fn new(x_difference_um: f32, y_difference_um: f32) -> Measurement {
        Measurement {
            x_difference_um,
            y_difference_um,
        }
    }

    /// Absolute displacement along x, as shown in the readout.
    pub fn abs_x_um(&self) -> f32 {
        self.x_difference_um.abs()
    }

    /// Absolute displacement along y, as shown in the readout.
    pub fn abs_y_um(&self) -> f32 {
        self.y_difference_um.abs()
    }
}

/// Two-slot extremal landmark cache for contour mode.
///
/// Slot values of 0 are the "unset" sentinel. Both axis caches are kept
/// sorted ascending, independently; the low slots form Landmark A and
/// the high slots Landmark B. The cache is part of the carried state,
/// so a single landmark seen in one frame can be completed by a
/// detection in a later frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LandmarkCache {
    pub xs: [f32; 2],
    pub ys: [f32; 2],
}

impl LandmarkCache {
    /// True once both x slots hold real (non-sentinel) coordinates.
    pub fn is_complete(&self) -> bool {
        self.xs[0] != 0.0
    }

    /// True when `x` already occupies one of the slots.
    pub fn contains_x(&self, x: f32) -> bool {
        self.xs[0] == x || self.xs[1] == x
    }

    /// Landmark A: the axis-wise low extremum.
    pub fn landmark_a(&self) -> glam::Vec2 {
        glam::Vec2::new(self.xs[0], self.ys[0])
    }

    /// Landmark B: the axis-wise high extremum.
    pub fn landmark_b(&self) -> glam::Vec2 {
        glam::Vec2::new(self.xs[1], self.ys[1])
    }
}

/// Carry-forward measurement state, owned by the loop driver and passed
/// into every frame-processing call.
///
/// A frame without a qualifying update leaves `measurement` untouched,
/// so the readout holds the last known good value under intermittent
/// detection dropout. `None` until the first qualifying frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeasureState {
    pub measurement: Option<Measurement>,
    /// Contour-mode extremal landmark cache.
    pub landmarks: LandmarkCache,
    /// Frames processed since the last qualifying update.
    pub frames_since_update: u32,
}

impl MeasureState {
    pub fn new() -> MeasureState {
        MeasureState::default()
    }

    /// Overwrite the current measurement with a fresh qualifying value.
    pub fn update(&mut self, measurement: Measurement) {
        self.measurement = Some(measurement);
        self.frames_since_update = 0;
    }

    /// Record a frame that produced no qualifying update.
    pub fn carry_forward(&mut self) {
        self.frames_since_update = self.frames_since_update.saturating_add(1);
    }
}
