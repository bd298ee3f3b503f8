//! Line-angle utilities in degrees.
//!
//! A line has no direction, so orientations live in `[0, 180)` and 180° is the
//! same line as 0°. Everything here is f64: the snapping invariant is checked
//! to 1e-6°, well below f32 resolution at image-sized coordinates.

/// Orientation of the vector `(dx, dy)` folded into `[0, 180)`.
#[inline]
pub fn line_angle_deg(dx: f64, dy: f64) -> f64 {
    normalize_deg_180(dy.atan2(dx).to_degrees())
}

/// Folds an angle in degrees into `[0, 180)`.
#[inline]
pub fn normalize_deg_180(angle: f64) -> f64 {
    let norm = angle.rem_euclid(180.0);
    // rem_euclid can return exactly 180.0 for tiny negative inputs
    if norm >= 180.0 {
        0.0
    } else {
        norm
    }
}

/// Signed rotation in `(-90, 90]` that takes line orientation `from` onto `to`.
#[inline]
pub fn signed_line_delta_deg(from: f64, to: f64) -> f64 {
    let mut d = (to - from).rem_euclid(180.0);
    if d > 90.0 {
        d -= 180.0;
    }
    d
}

/// Unsigned difference between two line orientations, in `[0, 90]`.
#[inline]
pub fn line_angle_difference_deg(a: f64, b: f64) -> f64 {
    signed_line_delta_deg(a, b).abs()
}

/// Relative tolerance for recognising a value exactly halfway between two grid
/// lines despite atan2 rounding.
const TIE_EPS: f64 = 1e-9;

/// Snaps a line orientation to the nearest grid multiple of `increment`.
///
/// The grid is `{0, inc, 2·inc, …} ∩ [0, 180)` plus 180, which is folded back
/// to 0. When `increment` does not divide 180 the cell below 180 is narrower
/// than the others; that is the expected shape of the grid. Exact ties go to
/// the lower grid line. Returns the grid index (`0` for the 0°/180° line) and
/// the snapped angle in `[0, 180)`.
pub fn snap_to_grid_deg(theta: f64, increment: f64) -> (u32, f64) {
    let theta = normalize_deg_180(theta);
    let lower_idx = (theta / increment).floor();
    let lower = lower_idx * increment;
    let upper = (lower + increment).min(180.0);
    let to_lower = theta - lower;
    let to_upper = upper - theta;
    let take_upper = to_upper < to_lower && (to_lower - to_upper) > TIE_EPS * increment;
    let (idx, snapped) = if take_upper {
        (lower_idx as u32 + 1, upper)
    } else {
        (lower_idx as u32, lower)
    };
    if snapped >= 180.0 - TIE_EPS * increment {
        (0, 0.0)
    } else {
        (idx, snapped)
    }
}

/// Distance from `angle` to the nearest grid line, accounting for the 0/180 seam.
pub fn grid_residual_deg(angle: f64, increment: f64) -> f64 {
    let (_, snapped) = snap_to_grid_deg(angle, increment);
    line_angle_difference_deg(normalize_deg_180(angle), snapped)
}
