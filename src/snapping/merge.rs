//! Near-duplicate merge inside one angle bucket.
//!
//! All members share the grid direction `d`, so each is summarized by its
//! offset along the normal and its projection interval along `d`. Two members
//! are one wall when offsets differ by at most `offset_tol` and the intervals
//! overlap or leave a gap of at most `gap_tol`. Merging repeats until no pair
//! qualifies; the survivor takes the length-weighted offset and the union of
//! both intervals.
use super::segment::SnappedSegment;

#[derive(Clone, Debug)]
struct Member {
    offset: f64,
    t0: f64,
    t1: f64,
    weight: f64,
    merged: bool,
    seg: SnappedSegment,
}

impl Member {
    fn new(seg: SnappedSegment) -> Self {
        let (t0, t1) = seg.extent();
        Self {
            offset: seg.offset(),
            t0,
            t1,
            weight: seg.length(),
            merged: false,
            seg,
        }
    }

    fn absorbs(&self, other: &Member, offset_tol: f64, gap_tol: f64) -> bool {
        if (self.offset - other.offset).abs() > offset_tol {
            return false;
        }
        let gap = (other.t0 - self.t1).max(self.t0 - other.t1);
        gap <= gap_tol
    }

    fn absorb(&mut self, other: Member) {
        let total = self.weight + other.weight;
        if total > 0.0 {
            self.offset = (self.offset * self.weight + other.offset * other.weight) / total;
        }
        self.t0 = self.t0.min(other.t0);
        self.t1 = self.t1.max(other.t1);
        self.weight = total;
        self.merged = true;
        self.seg.sources.extend(other.seg.sources);
        self.seg.sources.sort_unstable();
        self.seg.sources.dedup();
    }

    fn into_segment(mut self) -> SnappedSegment {
        if self.merged {
            let d = self.seg.grid_direction();
            let n = [-d[1], d[0]];
            let at = |t: f64| {
                [
                    n[0] * self.offset + d[0] * t,
                    n[1] * self.offset + d[1] * t,
                ]
            };
            self.seg.p0 = at(self.t0);
            self.seg.p1 = at(self.t1);
        }
        self.seg
    }
}

/// Merge duplicates among segments of a single bucket. Output is ordered by
/// offset, then by position along the line.
pub fn merge_bucket(
    segments: Vec<SnappedSegment>,
    offset_tol: f64,
    gap_tol: f64,
) -> Vec<SnappedSegment> {
    let mut members: Vec<Member> = segments.into_iter().map(Member::new).collect();
    sort_members(&mut members);

    loop {
        let mut changed = false;
        let mut i = 0;
        while i < members.len() {
            let mut j = i + 1;
            while j < members.len() {
                if members[i].absorbs(&members[j], offset_tol, gap_tol) {
                    let other = members.remove(j);
                    members[i].absorb(other);
                    changed = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        if !changed {
            break;
        }
    }

    sort_members(&mut members);
    members.into_iter().map(Member::into_segment).collect()
}

fn sort_members(members: &mut [Member]) {
    members.sort_by(|a, b| {
        a.offset
            .total_cmp(&b.offset)
            .then(a.t0.total_cmp(&b.t0))
            .then(a.t1.total_cmp(&b.t1))
    });
}
