//! Pixel→world affine mapping applied opaquely by the exporters.
//!
//! The mapping is stored as a homogeneous 3×3 matrix whose last row is
//! `[0, 0, 1]`. It is usually built from a GDAL-style geotransform
//! `[x0, px_w, row_rot, y0, col_rot, px_h]`:
//!
//! ```text
//! X = x0 + col * px_w + row * row_rot
//! Y = y0 + col * col_rot + row * px_h
//! ```
use crate::error::InputError;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelToWorld {
    mtx: Matrix3<f64>,
}

impl PixelToWorld {
    pub fn identity() -> Self {
        Self {
            mtx: Matrix3::identity(),
        }
    }

    /// Build from a GDAL geotransform. Rejects non-finite or singular mappings.
    pub fn from_geotransform(gt: [f64; 6]) -> Result<Self, InputError> {
        let mtx = Matrix3::new(gt[1], gt[2], gt[0], gt[4], gt[5], gt[3], 0.0, 0.0, 1.0);
        Self::from_matrix(mtx)
    }

    /// Wrap an affine matrix. The bottom row must be `[0, 0, 1]`.
    pub fn from_matrix(mtx: Matrix3<f64>) -> Result<Self, InputError> {
        if mtx.iter().any(|v| !v.is_finite()) {
            return Err(InputError::config("geotransform", "contains non-finite values"));
        }
        if mtx[(2, 0)] != 0.0 || mtx[(2, 1)] != 0.0 || mtx[(2, 2)] != 1.0 {
            return Err(InputError::config(
                "geotransform",
                "only affine mappings are supported",
            ));
        }
        // singularity is relative to the coefficient scale
        let scale = [mtx[(0, 0)], mtx[(0, 1)], mtx[(1, 0)], mtx[(1, 1)]]
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        let det = mtx[(0, 0)] * mtx[(1, 1)] - mtx[(0, 1)] * mtx[(1, 0)];
        if scale == 0.0 || det.abs() <= f64::EPSILON * scale * scale {
            return Err(InputError::config("geotransform", "mapping is singular"));
        }
        Ok(Self { mtx })
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.mtx
    }

    /// Map one pixel-space point to world coordinates.
    #[inline]
    pub fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        let v = self.mtx * Vector3::new(p[0], p[1], 1.0);
        [v[0], v[1]]
    }
}

impl Default for PixelToWorld {
    fn default() -> Self {
        Self::identity()
    }
}
