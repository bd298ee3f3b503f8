//! EdgeExtractor: raster → binary edge mask.
//!
//! Canny-style chain on the 0..255 intensity scale:
//!
//! - BT.601 luminance (see [`RasterBuffer::luminance`]).
//! - Optional separable 5‑tap Gaussian smoothing ([`blur`]).
//! - Sobel gradients with L2 magnitude ([`grad`]).
//! - Non‑maximum suppression along the quantized gradient direction ([`nms`]).
//! - Double‑threshold hysteresis over the 8‑neighbourhood ([`hysteresis`]).
//!
//! Thresholds are clamped to `[0, MAX_SOBEL_MAGNITUDE]` instead of being
//! rejected. The same raster and options always produce the same mask.

pub mod blur;
pub mod grad;
pub mod hysteresis;
pub mod mask;
pub mod nms;

pub use grad::{sobel_gradients, Grad, MAX_SOBEL_MAGNITUDE};
pub use hysteresis::HysteresisCounts;
pub use mask::EdgeMask;

use crate::error::InputError;
use crate::image::RasterBuffer;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Thresholds and smoothing switch for the edge stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeOptions {
    /// Hysteresis lower threshold (gradient magnitude, 0..255 intensity scale).
    pub low_threshold: u32,
    /// Hysteresis upper threshold.
    pub high_threshold: u32,
    /// Apply the 5-tap Gaussian before differentiating.
    pub blur: bool,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            low_threshold: 50,
            high_threshold: 150,
            blur: true,
        }
    }
}

impl EdgeOptions {
    /// Thresholds as `(low, high)` floats, ordered and clamped to the Sobel range.
    pub fn clamped_thresholds(&self) -> (f32, f32) {
        let mut low = self.low_threshold as f32;
        let mut high = self.high_threshold as f32;
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }
        (
            low.clamp(0.0, MAX_SOBEL_MAGNITUDE),
            high.clamp(0.0, MAX_SOBEL_MAGNITUDE),
        )
    }
}

/// Mask plus the numbers the diagnostics tooling reports.
#[derive(Clone, Debug)]
pub struct EdgeResult {
    pub mask: EdgeMask,
    pub counts: HysteresisCounts,
    pub gradient_ms: f64,
    pub linking_ms: f64,
}

pub struct EdgeExtractor {
    options: EdgeOptions,
}

impl EdgeExtractor {
    pub fn new(options: EdgeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EdgeOptions {
        &self.options
    }

    pub fn extract(&self, raster: &RasterBuffer) -> Result<EdgeResult, InputError> {
        if raster.is_empty() {
            return Err(InputError::EmptyRaster {
                width: raster.width(),
                height: raster.height(),
            });
        }
        let (low, high) = self.options.clamped_thresholds();
        if self.options.low_threshold > self.options.high_threshold {
            warn!(
                "EdgeExtractor: thresholds given as low={} > high={}, using them swapped",
                self.options.low_threshold, self.options.high_threshold
            );
        } else if high < self.options.high_threshold as f32 {
            warn!(
                "EdgeExtractor: high threshold {} clamped to {high}",
                self.options.high_threshold
            );
        }

        let gradient_start = Instant::now();
        let mut intensity = raster.luminance();
        if self.options.blur {
            intensity = blur::blur_separable(&intensity, &blur::GAUSSIAN_5TAP);
        }
        let grad = sobel_gradients(&intensity);
        let gradient_ms = gradient_start.elapsed().as_secs_f64() * 1000.0;

        let linking_start = Instant::now();
        let thin = nms::suppress_non_maxima(&grad, low);
        let (mask, counts) = hysteresis::link_edges(&thin, low, high);
        let linking_ms = linking_start.elapsed().as_secs_f64() * 1000.0;

        debug!(
            "EdgeExtractor: {}x{} -> {} edge px (strong={}, linked={}) grad={:.2}ms link={:.2}ms",
            raster.width(),
            raster.height(),
            counts.strong + counts.weak_linked,
            counts.strong,
            counts.weak_linked,
            gradient_ms,
            linking_ms
        );

        Ok(EdgeResult {
            mask,
            counts,
            gradient_ms,
            linking_ms,
        })
    }
}

/// Convenience wrapper returning only the mask.
pub fn detect_edges(raster: &RasterBuffer, options: &EdgeOptions) -> Result<EdgeMask, InputError> {
    EdgeExtractor::new(*options).extract(raster).map(|r| r.mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    fn square_raster(size: usize) -> RasterBuffer {
        let mut data = vec![0u8; size * size];
        for y in size / 4..3 * size / 4 {
            for x in size / 4..3 * size / 4 {
                data[y * size + x] = 220;
            }
        }
        RasterBuffer::gray(size, size, data).unwrap()
    }

    #[test]
    fn empty_raster_is_rejected() {
        let raster = RasterBuffer::gray(0, 5, Vec::new()).unwrap();
        let err = detect_edges(&raster, &EdgeOptions::default()).unwrap_err();
        assert_eq!(err, InputError::EmptyRaster { width: 0, height: 5 });
    }

    #[test]
    fn flat_raster_has_no_edges() {
        let raster = RasterBuffer::gray(16, 12, vec![128; 16 * 12]).unwrap();
        let mask = detect_edges(&raster, &EdgeOptions::default()).unwrap();
        assert_eq!(mask.dimensions(), (16, 12));
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn square_outline_is_detected_and_thin() {
        let raster = square_raster(32);
        let mask = detect_edges(&raster, &EdgeOptions::default()).unwrap();
        // one vertical side of the square: a single column per row
        let row = mask.row(16);
        let hits: Vec<usize> = (0..32).filter(|&x| row[x] != 0).collect();
        assert_eq!(hits.len(), 2, "hits {hits:?}");
        assert!(hits[0].abs_diff(8) <= 1 && hits[1].abs_diff(24) <= 1);
        // interior and border stay clear
        assert_eq!(row[16], 0);
        assert!(mask.row(0).iter().all(|&v| v == 0));
    }

    #[test]
    fn extraction_is_deterministic() {
        let raster = square_raster(40);
        let opts = EdgeOptions::default();
        let a = detect_edges(&raster, &opts).unwrap();
        let b = detect_edges(&raster, &opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn swapped_and_oversized_thresholds_are_clamped() {
        let opts = EdgeOptions {
            low_threshold: 5000,
            high_threshold: 40,
            blur: false,
        };
        assert_eq!(opts.clamped_thresholds(), (40.0, MAX_SOBEL_MAGNITUDE));
        let raster = square_raster(24);
        // high threshold at the Sobel ceiling: nothing can exceed it
        assert_eq!(detect_edges(&raster, &opts).unwrap().count(), 0);
    }
}
