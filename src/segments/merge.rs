//! Merge runs that lie on the same infinite line.
//!
//! The Hough walk can report one physical edge as several runs (the walk
//! through a slightly jagged raster line leaves pixels behind that later win
//! their own vote). Runs are merged greedily until no pair qualifies: the
//! orientations must agree within the angle tolerance, both endpoints of the
//! shorter run must lie within the offset tolerance of the longer run's line,
//! and their projections must overlap or be no more than `max_gap` apart.
use super::types::RawSegment;
use crate::angle::line_angle_difference_deg;

/// Projection interval of `seg` on the line through `origin` with unit `dir`.
fn project(seg: &RawSegment, origin: [f64; 2], dir: [f64; 2]) -> (f64, f64) {
    let t = |p: [f64; 2]| (p[0] - origin[0]) * dir[0] + (p[1] - origin[1]) * dir[1];
    let (a, b) = (t(seg.p0), t(seg.p1));
    (a.min(b), a.max(b))
}

fn perpendicular_distance(p: [f64; 2], origin: [f64; 2], dir: [f64; 2]) -> f64 {
    ((p[0] - origin[0]) * dir[1] - (p[1] - origin[1]) * dir[0]).abs()
}

/// Returns the merged segment when `a` and `b` are runs of the same line.
fn try_merge(
    a: &RawSegment,
    b: &RawSegment,
    angle_tol_deg: f64,
    offset_tol: f64,
    max_gap: f64,
) -> Option<RawSegment> {
    if line_angle_difference_deg(a.angle_deg(), b.angle_deg()) > angle_tol_deg {
        return None;
    }
    let (long, short) = if a.length() >= b.length() { (a, b) } else { (b, a) };
    let origin = long.p0;
    let dir = long.direction();
    if perpendicular_distance(short.p0, origin, dir) > offset_tol
        || perpendicular_distance(short.p1, origin, dir) > offset_tol
    {
        return None;
    }
    let (l0, l1) = project(long, origin, dir);
    let (s0, s1) = project(short, origin, dir);
    let gap = (s0 - l1).max(l0 - s1);
    if gap > max_gap {
        return None;
    }
    let (t0, t1) = (l0.min(s0), l1.max(s1));
    let at = |t: f64| [origin[0] + t * dir[0], origin[1] + t * dir[1]];
    Some(RawSegment::new(a.id.min(b.id), at(t0), at(t1)))
}

/// Merge collinear runs in place until a fixed point is reached.
pub fn merge_collinear(
    mut segs: Vec<RawSegment>,
    angle_tol_deg: f64,
    offset_tol: f64,
    max_gap: f64,
) -> Vec<RawSegment> {
    loop {
        let mut merged_any = false;
        let mut i = 0;
        while i < segs.len() {
            let mut j = i + 1;
            while j < segs.len() {
                if let Some(m) = try_merge(&segs[i], &segs[j], angle_tol_deg, offset_tol, max_gap)
                {
                    segs[i] = m;
                    segs.remove(j);
                    merged_any = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        if !merged_any {
            return segs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::SegmentId;

    fn seg(id: u32, p0: [f64; 2], p1: [f64; 2]) -> RawSegment {
        RawSegment::new(SegmentId(id), p0, p1)
    }

    #[test]
    fn overlapping_runs_become_one() {
        let merged = merge_collinear(
            vec![
                seg(3, [0.0, 10.0], [60.0, 10.0]),
                seg(1, [50.0, 10.5], [120.0, 10.5]),
            ],
            1.5,
            1.5,
            10.0,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, SegmentId(1));
        assert!((merged[0].length() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_offset_and_distant_runs_stay_apart() {
        let segs = vec![
            seg(0, [0.0, 0.0], [100.0, 0.0]),
            seg(1, [0.0, 5.0], [100.0, 5.0]),
            seg(2, [130.0, 0.0], [200.0, 0.0]),
        ];
        assert_eq!(merge_collinear(segs, 1.5, 1.5, 10.0).len(), 3);
    }
}
