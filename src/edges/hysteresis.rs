//! Double-threshold hysteresis linking.
//!
//! Pixels whose thinned magnitude exceeds `high` seed the mask. Pixels above
//! `low` are accepted only when 8-connected, possibly through other accepted
//! pixels, to a seed.
use super::mask::EdgeMask;
use crate::image::{ImageF32, ImageView};

/// Counts gathered while linking, reported in diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HysteresisCounts {
    pub strong: usize,
    pub weak_linked: usize,
}

pub fn link_edges(thin: &ImageF32, low: f32, high: f32) -> (EdgeMask, HysteresisCounts) {
    let (w, h) = thin.dimensions();
    let mut mask = EdgeMask::new(w, h);
    let mut counts = HysteresisCounts::default();
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..h {
        let row = thin.row(y);
        for (x, &m) in row.iter().enumerate() {
            if m > high && !mask.get(x, y) {
                mask.set(x, y, true);
                counts.strong += 1;
                stack.push((x, y));
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(h - 1);
        let x0 = x.saturating_sub(1);
        let x1 = (x + 1).min(w - 1);
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                if mask.get(nx, ny) {
                    continue;
                }
                if thin.get(nx, ny) > low {
                    mask.set(nx, ny, true);
                    counts.weak_linked += 1;
                    stack.push((nx, ny));
                }
            }
        }
    }

    (mask, counts)
}
