//! SegmentDetector: edge mask → raw straight segments.
//!
//! - [`hough`] runs the progressive probabilistic Hough transform and returns
//!   integer pixel runs of at least `min_line_length`.
//! - [`merge`] joins runs that belong to the same infinite line so one edge is
//!   never emitted twice.
//!
//! No segment meeting the thresholds is a normal outcome and yields an empty
//! list. The only error is a mask whose size disagrees with the raster.

pub mod hough;
pub mod merge;
mod options;
mod types;

pub use options::{HoughOptions, DEFAULT_HOUGH_SEED};
pub use types::{RawSegment, SegmentId};

use crate::edges::EdgeMask;
use crate::error::InputError;
use log::debug;
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct SegmentResult {
    pub segments: Vec<RawSegment>,
    /// Runs produced by the Hough walk before collinear merging.
    pub hough_runs: usize,
    pub elapsed_ms: f64,
}

pub struct SegmentDetector {
    options: HoughOptions,
}

impl SegmentDetector {
    pub fn new(options: HoughOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HoughOptions {
        &self.options
    }

    /// Detect segments on a mask that must be `width × height`.
    pub fn detect(
        &self,
        mask: &EdgeMask,
        width: usize,
        height: usize,
    ) -> Result<SegmentResult, InputError> {
        mask.ensure_dimensions(width, height)?;
        Ok(self.detect_unchecked(mask))
    }

    fn detect_unchecked(&self, mask: &EdgeMask) -> SegmentResult {
        let start = Instant::now();
        let runs = hough::probabilistic_hough(mask, &self.options);
        let hough_runs = runs.len();
        let segments = runs
            .into_iter()
            .enumerate()
            .map(|(i, [x0, y0, x1, y1])| {
                RawSegment::new(
                    SegmentId(i as u32),
                    [x0 as f64, y0 as f64],
                    [x1 as f64, y1 as f64],
                )
            })
            .collect();
        let segments = merge::merge_collinear(
            segments,
            self.options.collinear_angle_tol_deg,
            self.options.collinear_offset_tol,
            self.options.max_line_gap,
        );
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "SegmentDetector: {} edge px -> {} runs -> {} segments in {:.2}ms",
            mask.count(),
            hough_runs,
            segments.len(),
            elapsed_ms
        );
        SegmentResult {
            segments,
            hough_runs,
            elapsed_ms,
        }
    }
}

/// Detect segments on `mask` with `options`; the mask defines the frame.
pub fn detect_segments(mask: &EdgeMask, options: &HoughOptions) -> Vec<RawSegment> {
    SegmentDetector::new(*options).detect_unchecked(mask).segments
}

#[cfg(test)]
mod tests;
