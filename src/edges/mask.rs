//! Binary edge mask produced by the edge stage.
use crate::error::InputError;
use crate::image::ImageView;

/// Value stored for an edge pixel. Non-edge pixels are 0.
pub const EDGE: u8 = 255;

/// Row-major binary mask with the raster's dimensions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeMask {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl EdgeMask {
    /// Mask with no edge pixels.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Build a mask from a predicate evaluated at every pixel.
    pub fn from_fn(w: usize, h: usize, mut is_edge: impl FnMut(usize, usize) -> bool) -> Self {
        let mut mask = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                if is_edge(x, y) {
                    mask.data[y * w + x] = EDGE;
                }
            }
        }
        mask
    }

    /// Wrap raw 8-bit samples; any non-zero value counts as an edge.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Result<Self, InputError> {
        if data.len() != w * h {
            return Err(InputError::BufferLength {
                expected: w * h,
                actual: data.len(),
            });
        }
        let data = data
            .into_iter()
            .map(|v| if v != 0 { EDGE } else { 0 })
            .collect();
        Ok(Self { w, h, data })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, edge: bool) {
        self.data[y * self.w + x] = if edge { EDGE } else { 0 };
    }

    /// Number of edge pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Fails with [`InputError::MaskDimensions`] unless the mask is `w × h`.
    pub fn ensure_dimensions(&self, w: usize, h: usize) -> Result<(), InputError> {
        if self.w != w || self.h != h {
            return Err(InputError::MaskDimensions {
                mask_w: self.w,
                mask_h: self.h,
                expected_w: w,
                expected_h: h,
            });
        }
        Ok(())
    }

    /// Coordinates of every edge pixel in row-major order.
    pub fn edge_points(&self) -> Vec<(usize, usize)> {
        let mut pts = Vec::new();
        for y in 0..self.h {
            for x in 0..self.w {
                if self.data[y * self.w + x] != 0 {
                    pts.push((x, y));
                }
            }
        }
        pts
    }
}

impl ImageView for EdgeMask {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
