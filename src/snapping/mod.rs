//! AngleSnapper: raw segments → grid-aligned, deduplicated segments.
//!
//! Per segment:
//! 1. `θ = atan2(dy, dx) mod 180`.
//! 2. Snap `θ` to the nearest multiple of the increment
//!    ([`crate::angle::snap_to_grid_deg`]); 180 is the 0 line, exact ties go
//!    to the lower multiple.
//! 3. Rotate about the midpoint by the shortest signed difference, which
//!    keeps length and midpoint.
//!
//! Segments shorter than `min_segment_length` are discarded first. The
//! snapped set is then grouped per grid line and near-duplicates inside a
//! group are merged ([`merge`]). Output is ordered by bucket angle, then by
//! offset across the line, then by position along it.
//!
//! When the increment does not divide 180 the last grid cell below 180 is
//! narrower than the others. Snapping already-snapped output is a no-op.

mod bucket;
pub mod merge;
mod segment;

pub use bucket::{rank_buckets, AngleBucket};
pub use segment::SnappedSegment;

use crate::angle::{signed_line_delta_deg, snap_to_grid_deg};
use crate::error::InputError;
use crate::segments::RawSegment;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rotations below this many degrees are not applied.
const MIN_ROTATION_DEG: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapOptions {
    /// Grid spacing in degrees, in `(0, 180)`.
    pub increment_deg: f64,
    /// Largest perpendicular distance between duplicates, pixels.
    pub offset_tolerance: f64,
    /// Largest gap between duplicate extents, pixels.
    pub gap_tolerance: f64,
    /// Shorter segments are dropped before snapping, pixels.
    pub min_segment_length: f64,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            increment_deg: 15.0,
            offset_tolerance: 2.0,
            gap_tolerance: 10.0,
            min_segment_length: 1.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SnapResult {
    pub segments: Vec<SnappedSegment>,
    /// Populated grid lines with their pre-merge segment counts, by descending count.
    pub buckets: Vec<AngleBucket>,
    /// Degenerate inputs dropped before snapping.
    pub discarded: usize,
}

#[derive(Clone, Debug)]
pub struct AngleSnapper {
    options: SnapOptions,
}

impl AngleSnapper {
    pub fn new(options: SnapOptions) -> Result<Self, InputError> {
        let inc = options.increment_deg;
        if !inc.is_finite() || inc <= 0.0 || inc >= 180.0 {
            return Err(InputError::config(
                "snapAngleIncrement",
                format!("{inc} is outside (0, 180)"),
            ));
        }
        if !(options.offset_tolerance >= 0.0 && options.gap_tolerance >= 0.0) {
            return Err(InputError::config(
                "mergeOffsetTolerance",
                "merge tolerances must be non-negative",
            ));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &SnapOptions {
        &self.options
    }

    /// Rotate one segment onto the grid. `None` for degenerate input.
    pub fn snap_segment(&self, raw: &RawSegment) -> Option<SnappedSegment> {
        let length = raw.length();
        if !(length >= self.options.min_segment_length) {
            return None;
        }
        let theta = raw.angle_deg();
        let (grid_index, snapped) = snap_to_grid_deg(theta, self.options.increment_deg);
        let delta = signed_line_delta_deg(theta, snapped);

        let (p0, p1) = if delta.abs() < MIN_ROTATION_DEG {
            (raw.p0, raw.p1)
        } else {
            let mid = raw.midpoint();
            let phi = (raw.p1[1] - raw.p0[1]).atan2(raw.p1[0] - raw.p0[0]) + delta.to_radians();
            let half = 0.5 * length;
            let (s, c) = phi.sin_cos();
            (
                [mid[0] - half * c, mid[1] - half * s],
                [mid[0] + half * c, mid[1] + half * s],
            )
        };

        Some(SnappedSegment {
            p0,
            p1,
            angle_deg: snapped,
            grid_index,
            sources: vec![raw.id],
        })
    }

    /// Snap every segment, then merge duplicates per grid line.
    pub fn snap_all(&self, raw: &[RawSegment]) -> SnapResult {
        let mut groups: BTreeMap<u32, Vec<SnappedSegment>> = BTreeMap::new();
        let mut discarded = 0usize;
        for seg in raw {
            match self.snap_segment(seg) {
                Some(s) => groups.entry(s.grid_index).or_default().push(s),
                None => discarded += 1,
            }
        }

        let mut buckets = Vec::with_capacity(groups.len());
        let mut segments = Vec::with_capacity(raw.len());
        for (_, members) in groups {
            buckets.push(AngleBucket {
                angle_deg: members[0].angle_deg,
                count: members.len(),
            });
            segments.extend(merge::merge_bucket(
                members,
                self.options.offset_tolerance,
                self.options.gap_tolerance,
            ));
        }

        debug!(
            "AngleSnapper: {} raw -> {} snapped ({} degenerate) on {} grid lines",
            raw.len(),
            segments.len(),
            discarded,
            buckets.len()
        );

        SnapResult {
            segments,
            buckets: rank_buckets(buckets),
            discarded,
        }
    }
}
