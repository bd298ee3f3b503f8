use super::TimingBreakdown;
use crate::segments::RawSegment;
use crate::snapping::{AngleBucket, SnappedSegment};
use serde::Serialize;
use std::path::PathBuf;

/// Stage-by-stage dump written by the `edge_mask` tool for parameter tuning.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
    pub input: PathBuf,
    pub width: usize,
    pub height: usize,
    pub edge_pixels: usize,
    pub strong_edge_pixels: usize,
    pub hough_runs: usize,
    pub raw_segments: Vec<RawSegment>,
    pub snapped_segments: Vec<SnappedSegment>,
    pub buckets: Vec<AngleBucket>,
    pub discarded: usize,
    pub timings: TimingBreakdown,
}
