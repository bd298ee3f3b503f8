use crate::angle::line_angle_deg;
use crate::segments::{RawSegment, SegmentId};
use serde::{Deserialize, Serialize};

/// Segment rotated onto the angle grid, possibly merged from several sources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnappedSegment {
    pub p0: [f64; 2],
    pub p1: [f64; 2],
    /// Grid angle in `[0, 180)` degrees.
    pub angle_deg: f64,
    /// Index of the grid line, `angle_deg / increment`.
    pub grid_index: u32,
    /// Raw segments that contributed, ascending.
    pub sources: Vec<SegmentId>,
}

impl SnappedSegment {
    pub fn length(&self) -> f64 {
        let dx = self.p1[0] - self.p0[0];
        let dy = self.p1[1] - self.p0[1];
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self) -> [f64; 2] {
        [
            (self.p0[0] + self.p1[0]) * 0.5,
            (self.p0[1] + self.p1[1]) * 0.5,
        ]
    }

    /// Orientation recomputed from the endpoints; equals `angle_deg` up to rounding.
    pub fn measured_angle_deg(&self) -> f64 {
        line_angle_deg(self.p1[0] - self.p0[0], self.p1[1] - self.p0[1])
    }

    /// Unit direction of the grid angle.
    pub(crate) fn grid_direction(&self) -> [f64; 2] {
        let t = self.angle_deg.to_radians();
        [t.cos(), t.sin()]
    }

    /// Signed distance of the segment's line from the origin, along the grid normal.
    pub(crate) fn offset(&self) -> f64 {
        let d = self.grid_direction();
        let m = self.midpoint();
        m[1] * d[0] - m[0] * d[1]
    }

    /// Projection interval of the endpoints onto the grid direction.
    pub(crate) fn extent(&self) -> (f64, f64) {
        let d = self.grid_direction();
        let a = self.p0[0] * d[0] + self.p0[1] * d[1];
        let b = self.p1[0] * d[0] + self.p1[1] * d[1];
        (a.min(b), a.max(b))
    }
}

/// Feed snapped output back into the snapper as raw input.
impl From<&SnappedSegment> for RawSegment {
    fn from(seg: &SnappedSegment) -> Self {
        let id = seg.sources.first().copied().unwrap_or(SegmentId(0));
        RawSegment::new(id, seg.p0, seg.p1)
    }
}
