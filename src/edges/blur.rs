//! Separable smoothing applied before gradient estimation.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Normalised 5-tap Gaussian `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Convolve rows then columns with `taps`, replicating border pixels.
pub fn blur_separable(src: &ImageF32, taps: &[f32]) -> ImageF32 {
    if src.is_empty() || taps.is_empty() {
        return src.clone();
    }
    let radius = (taps.len() / 2) as isize;

    let mut horiz = ImageF32::new(src.w, src.h);
    for y in 0..src.h {
        let out = horiz.row_mut(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = x as isize + k as isize - radius;
                acc += tap * src.get_clamped(sx, y as isize);
            }
            *dst = acc;
        }
    }

    let mut out = ImageF32::new(src.w, src.h);
    for y in 0..src.h {
        let dst_row = out.row_mut(y);
        for (x, dst) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sy = y as isize + k as isize - radius;
                acc += tap * horiz.get_clamped(x as isize, sy);
            }
            *dst = acc;
        }
    }
    out
}
