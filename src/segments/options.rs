use serde::{Deserialize, Serialize};

/// Seed used when the configuration does not provide one.
pub const DEFAULT_HOUGH_SEED: u64 = 0x0D0C_A11E;

/// Parameters of the probabilistic Hough stage and its collinear merge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoughOptions {
    /// Votes a (theta, rho) cell needs before its line is walked.
    pub accumulator_threshold: u32,
    /// Shortest emitted run, Euclidean length in pixels.
    pub min_line_length: f64,
    /// Longest run of missing pixels bridged while walking a line.
    pub max_line_gap: f64,
    /// Seed for the pixel visiting order.
    pub seed: u64,
    /// Orientation tolerance for merging runs of the same line, degrees.
    pub collinear_angle_tol_deg: f64,
    /// Perpendicular tolerance for merging runs of the same line, pixels.
    pub collinear_offset_tol: f64,
}

impl Default for HoughOptions {
    fn default() -> Self {
        Self {
            accumulator_threshold: 100,
            min_line_length: 100.0,
            max_line_gap: 10.0,
            seed: DEFAULT_HOUGH_SEED,
            collinear_angle_tol_deg: 1.5,
            collinear_offset_tol: 1.5,
        }
    }
}
