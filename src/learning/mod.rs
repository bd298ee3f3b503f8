//! Feedback history and learned parameter suggestions.
//!
//! Every rated conversion is appended to a JSON array on disk. Suggestions
//! average the numeric parameters of well-rated runs, preferring runs on
//! images whose file stem starts with the same word as the query image.
//! Parameter keys use the snake_case names of the original tool
//! (`snap_angle`, `low_threshold`, `line_threshold`, ...), so history files
//! stay readable by both.

mod history;
mod suggest;

pub use history::{FeedbackEntry, FeedbackHistory, FeedbackStatistics};
pub use suggest::{default_parameters, LearnedParameters};

use crate::config::PipelineConfig;
use std::collections::BTreeMap;

/// Parameter map stored with each feedback entry.
pub type ParameterMap = BTreeMap<String, serde_json::Value>;

/// Snapshot of the tunable parameters of `config` under their history keys.
pub fn parameters_of(config: &PipelineConfig) -> ParameterMap {
    let mut map = ParameterMap::new();
    map.insert("snap_angle".into(), config.snap_angle_increment.into());
    map.insert("low_threshold".into(), config.low_threshold.into());
    map.insert("high_threshold".into(), config.high_threshold.into());
    map.insert("line_threshold".into(), config.accumulator_threshold.into());
    map.insert("min_line_length".into(), config.min_line_length.into());
    map.insert("max_line_gap".into(), config.max_line_gap.into());
    map
}
