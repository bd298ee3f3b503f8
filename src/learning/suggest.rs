use super::history::FeedbackEntry;
use crate::config::PipelineConfig;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Integer parameter suggestions keyed by history names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LearnedParameters {
    values: BTreeMap<String, i64>,
}

/// History key, then the config keys a user may have written for it.
const KEY_ALIASES: [(&str, &[&str]); 6] = [
    ("snap_angle", &["snapAngleIncrement", "snap_angle", "snap_angle_increment"]),
    ("low_threshold", &["lowThreshold", "low_threshold"]),
    ("high_threshold", &["highThreshold", "high_threshold"]),
    ("line_threshold", &["accumulatorThreshold", "line_threshold", "accumulator_threshold"]),
    ("min_line_length", &["minLineLength", "min_line_length"]),
    ("max_line_gap", &["maxLineGap", "max_line_gap"]),
];

pub fn default_parameters() -> LearnedParameters {
    let cfg = PipelineConfig::default();
    let values = [
        ("snap_angle", cfg.snap_angle_increment as i64),
        ("low_threshold", cfg.low_threshold as i64),
        ("high_threshold", cfg.high_threshold as i64),
        ("line_threshold", cfg.accumulator_threshold as i64),
        ("min_line_length", cfg.min_line_length as i64),
        ("max_line_gap", cfg.max_line_gap as i64),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    LearnedParameters { values }
}

/// Lowercased file stem and its first token split on `_`, `-`, `.` or whitespace.
fn stem_tokens(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let first = stem
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .next()
        .unwrap_or("")
        .to_string();
    (stem, first)
}

/// Images are similar when their stems start with the same word of at least
/// four characters, or when the stems are identical.
pub(crate) fn is_similar_image(a: &Path, b: &Path) -> bool {
    let (stem_a, first_a) = stem_tokens(a);
    let (stem_b, first_b) = stem_tokens(b);
    if first_a.chars().count() >= 4 && first_b.chars().count() >= 4 {
        return first_a == first_b;
    }
    stem_a == stem_b
}

/// Mean of every numeric parameter, truncated toward zero; defaults fill the gaps.
pub(crate) fn average_parameters(entries: &[&FeedbackEntry]) -> LearnedParameters {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for entry in entries {
        for (key, value) in &entry.parameters {
            if let Some(v) = value.as_f64() {
                let slot = sums.entry(key.as_str()).or_insert((0.0, 0));
                slot.0 += v;
                slot.1 += 1;
            }
        }
    }
    let mut learned = default_parameters();
    for (key, (sum, n)) in sums {
        learned.values.insert(key.to_string(), (sum / n as f64) as i64);
    }
    learned
}

impl LearnedParameters {
    pub fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Overlay suggestions onto `config`, skipping keys in `explicit`.
    /// Returns the history keys that were applied.
    pub fn apply_to(&self, config: &mut PipelineConfig, explicit: &BTreeSet<String>) -> Vec<&'static str> {
        let mut applied = Vec::new();
        for (key, names) in KEY_ALIASES {
            if names.iter().any(|n| explicit.contains(*n)) {
                continue;
            }
            let Some(v) = self.get(key) else {
                continue;
            };
            match key {
                "snap_angle" => config.snap_angle_increment = v as f64,
                "low_threshold" => config.low_threshold = v.max(0) as u32,
                "high_threshold" => config.high_threshold = v.max(0) as u32,
                "line_threshold" => config.accumulator_threshold = v.max(1) as u32,
                "min_line_length" => config.min_line_length = v as f64,
                "max_line_gap" => config.max_line_gap = v as f64,
                _ => continue,
            }
            applied.push(key);
        }
        debug!("LearnedParameters: applied {applied:?}");
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_uses_leading_word() {
        assert!(is_similar_image(Path::new("a/Orthophoto_001.png"), Path::new("orthophoto-7.tif")));
        assert!(!is_similar_image(Path::new("farm_1.png"), Path::new("city_1.png")));
        // short leading words fall back to whole-stem comparison
        assert!(!is_similar_image(Path::new("ab_1.png"), Path::new("ab_2.png")));
        assert!(is_similar_image(Path::new("x/ab_1.png"), Path::new("y/ab_1.jpg")));
    }

    #[test]
    fn explicit_keys_are_not_overridden() {
        let mut learned = default_parameters();
        learned.values.insert("low_threshold".into(), 20);
        learned.values.insert("max_line_gap".into(), 4);
        let mut cfg = PipelineConfig {
            max_line_gap: 12.0,
            ..PipelineConfig::default()
        };
        let explicit: BTreeSet<String> = ["max_line_gap".to_string()].into_iter().collect();
        let applied = learned.apply_to(&mut cfg, &explicit);
        assert_eq!(cfg.low_threshold, 20);
        assert_eq!(cfg.max_line_gap, 12.0);
        assert!(!applied.contains(&"max_line_gap"));
        assert!(applied.contains(&"low_threshold"));
    }
}
