//! Non‑maximum suppression on gradient magnitude with direction alignment.
//!
//! Each pixel is compared against its two neighbours along the gradient
//! direction, quantized to 0°, 45°, 90° or 135°. Survivors keep their
//! magnitude, everything else becomes 0. The outermost 1‑pixel frame is always
//! suppressed, which keeps neighbour lookups in bounds and guarantees that the
//! mask border never carries an edge.
//!
//! On a plateau (two equal responses side by side, as a sharp step produces)
//! the comparison is asymmetric: strictly greater than the "before" neighbour,
//! greater or equal to the "after" one. Exactly one pixel of the pair survives.
use super::grad::Grad;
use crate::image::{ImageF32, ImageView, ImageViewMut};

const TAN_22_5_DEG: f32 = 0.41421356237;

/// Thin the magnitude image. Pixels with magnitude `<= floor` are dropped
/// before the neighbour test; hysteresis never looks at them anyway.
pub fn suppress_non_maxima(grad: &Grad, floor: f32) -> ImageF32 {
    let w = grad.gx.w;
    let h = grad.gx.h;
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let dst = out.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= floor {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            // (before, after) along the gradient direction
            let (before, after) = if abs_gx >= abs_gy {
                if abs_gy <= abs_gx * TAN_22_5_DEG {
                    (mag_row[x - 1], mag_row[x + 1])
                } else if same_sign {
                    (mag_prev[x - 1], mag_next[x + 1])
                } else {
                    (mag_next[x - 1], mag_prev[x + 1])
                }
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_next[x - 1], mag_prev[x + 1])
            };

            if mag > before && mag >= after {
                dst[x] = mag;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::grad::sobel_gradients;

    #[test]
    fn step_edge_thins_to_single_column() {
        let img = ImageF32::from_fn(10, 8, |x, _| if x < 5 { 0.0 } else { 200.0 });
        let grad = sobel_gradients(&img);
        let thin = suppress_non_maxima(&grad, 0.0);
        for y in 1..7 {
            let kept: Vec<usize> = (0..10).filter(|&x| thin.get(x, y) > 0.0).collect();
            assert_eq!(kept.len(), 1, "row {y} kept {kept:?}");
        }
    }

    #[test]
    fn frame_is_always_suppressed() {
        let img = ImageF32::from_fn(6, 6, |x, y| ((x * 37 + y * 91) % 255) as f32);
        let thin = suppress_non_maxima(&sobel_gradients(&img), 0.0);
        for i in 0..6 {
            assert_eq!(thin.get(i, 0), 0.0);
            assert_eq!(thin.get(i, 5), 0.0);
            assert_eq!(thin.get(0, i), 0.0);
            assert_eq!(thin.get(5, i), 0.0);
        }
    }
}
