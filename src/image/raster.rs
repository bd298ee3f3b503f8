//! Decoded input raster owned by one pipeline invocation.
//!
//! Samples are 8-bit and interleaved (`gray`, `rgb` or `rgba`). The raster is
//! immutable once built; the optional [`PixelToWorld`] transform travels with
//! it so both exporters see the same mapping.

use crate::error::InputError;
use crate::image::{ImageF32, ImageViewMut};
use crate::transform::PixelToWorld;

/// ITU-R BT.601 luma weights.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

#[derive(Clone, Debug)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
    transform: Option<PixelToWorld>,
}

impl RasterBuffer {
    /// Wrap decoded samples. Zero-sized rasters are accepted here and rejected
    /// by the edge stage, so that dimension checks happen at pipeline entry.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, InputError> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(InputError::UnsupportedChannels(channels));
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(InputError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
            transform: None,
        })
    }

    /// Single-channel raster.
    pub fn gray(width: usize, height: usize, data: Vec<u8>) -> Result<Self, InputError> {
        Self::new(width, height, 1, data)
    }

    /// Attach a pixel→world mapping.
    pub fn with_transform(mut self, transform: PixelToWorld) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    pub fn transform(&self) -> Option<&PixelToWorld> {
        self.transform.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Interleaved samples of row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        let row_len = self.width * self.channels;
        let start = y * row_len;
        &self.data[start..start + row_len]
    }

    /// Single-channel intensity on the 0..255 scale. Alpha is ignored.
    pub fn luminance(&self) -> ImageF32 {
        let mut out = ImageF32::new(self.width, self.height);
        for y in 0..self.height {
            let src = self.row(y);
            let dst = out.row_mut(y);
            match self.channels {
                1 => {
                    for (d, &s) in dst.iter_mut().zip(src) {
                        *d = s as f32;
                    }
                }
                c => {
                    for (d, px) in dst.iter_mut().zip(src.chunks_exact(c)) {
                        *d = LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32;
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let err = RasterBuffer::new(4, 4, 3, vec![0; 10]).unwrap_err();
        assert_eq!(
            err,
            InputError::BufferLength {
                expected: 48,
                actual: 10
            }
        );
        assert_eq!(
            RasterBuffer::new(1, 1, 2, vec![0; 2]).unwrap_err(),
            InputError::UnsupportedChannels(2)
        );
    }

    #[test]
    fn rgb_luminance_uses_bt601_weights() {
        let raster = RasterBuffer::new(2, 1, 3, vec![255, 0, 0, 10, 20, 30]).unwrap();
        let l = raster.luminance();
        assert!((l.get(0, 0) - 76.245).abs() < 1e-3);
        let expected = 0.299 * 10.0 + 0.587 * 20.0 + 0.114 * 30.0;
        assert!((l.get(1, 0) - expected).abs() < 1e-4);
    }

    #[test]
    fn rgba_ignores_alpha() {
        let raster = RasterBuffer::new(1, 1, 4, vec![100, 100, 100, 0]).unwrap();
        assert!((raster.luminance().get(0, 0) - 100.0).abs() < 1e-3);
    }
}
