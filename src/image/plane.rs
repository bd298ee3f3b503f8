//! Owned single-channel f32 plane in row-major layout.
//!
//! Intensities are kept on the 0..255 scale of the source samples so that
//! gradient thresholds read the same way as the configured edge thresholds.

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageF32 {
    /// Plane width in pixels
    pub w: usize,
    /// Plane height in pixels
    pub h: usize,
    /// Backing storage, `w * h` values
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Zero-filled plane of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    /// Build a plane by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.data[y * self.w + x] = v;
    }

    /// Sample with replicated borders; coordinates may fall outside the plane.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> f32 {
        let cx = x.clamp(0, self.w as isize - 1) as usize;
        let cy = y.clamp(0, self.h as isize - 1) as usize;
        self.get(cx, cy)
    }

    /// Largest finite value, or 0 for an empty plane.
    pub fn max_value(&self) -> f32 {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0f32, f32::max)
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl crate::image::traits::ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}
