use crate::angle::line_angle_deg;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the segment detector, stable through snapping and export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u32);

/// Straight segment in pixel space as found by the Hough stage.
///
/// Length and angle are derived once at construction; the segment is not
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    pub id: SegmentId,
    pub p0: [f64; 2],
    pub p1: [f64; 2],
    length: f64,
    angle_deg: f64,
}

impl RawSegment {
    pub fn new(id: SegmentId, p0: [f64; 2], p1: [f64; 2]) -> Self {
        let dx = p1[0] - p0[0];
        let dy = p1[1] - p0[1];
        Self {
            id,
            p0,
            p1,
            length: (dx * dx + dy * dy).sqrt(),
            angle_deg: line_angle_deg(dx, dy),
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Orientation in `[0, 180)` degrees.
    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn midpoint(&self) -> [f64; 2] {
        [
            (self.p0[0] + self.p1[0]) * 0.5,
            (self.p0[1] + self.p1[1]) * 0.5,
        ]
    }

    /// Unit vector from `p0` to `p1`, or zero for a degenerate segment.
    pub fn direction(&self) -> [f64; 2] {
        if self.length > 0.0 {
            [
                (self.p1[0] - self.p0[0]) / self.length,
                (self.p1[1] - self.p0[1]) / self.length,
            ]
        } else {
            [0.0, 0.0]
        }
    }
}
