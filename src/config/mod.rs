//! Pipeline configuration and JSON tool configs.
//!
//! [`PipelineConfig`] is the single, fully enumerated option set of a run.
//! Missing keys take the documented defaults, unknown keys are ignored, and
//! the snake_case names of the older command line tool are accepted as
//! aliases. `validate` runs once at pipeline entry; the per-stage option
//! structs are derived from a validated config.

mod tool;

pub use tool::{
    load_convert_config, load_edge_mask_config, ConvertToolConfig, EdgeMaskOutputConfig,
    EdgeMaskToolConfig, OutputConfig,
};

use crate::edges::EdgeOptions;
use crate::error::InputError;
use crate::export::LayerStyle;
use crate::segments::{HoughOptions, DEFAULT_HOUGH_SEED};
use crate::snapping::SnapOptions;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Angle grid spacing in degrees.
    #[serde(alias = "snap_angle", alias = "snap_angle_increment")]
    pub snap_angle_increment: f64,
    #[serde(alias = "low_threshold")]
    pub low_threshold: u32,
    #[serde(alias = "high_threshold")]
    pub high_threshold: u32,
    /// Smooth before differentiating.
    pub blur: bool,
    /// Hough votes needed to accept a line.
    #[serde(alias = "line_threshold", alias = "accumulator_threshold")]
    pub accumulator_threshold: u32,
    #[serde(alias = "min_line_length")]
    pub min_line_length: f64,
    #[serde(alias = "max_line_gap")]
    pub max_line_gap: f64,
    #[serde(alias = "merge_offset_tolerance")]
    pub merge_offset_tolerance: f64,
    /// Falls back to `max_line_gap` when unset.
    #[serde(alias = "merge_gap_tolerance", skip_serializing_if = "Option::is_none")]
    pub merge_gap_tolerance: Option<f64>,
    #[serde(alias = "min_segment_length")]
    pub min_segment_length: f64,
    #[serde(alias = "hough_seed")]
    pub hough_seed: u64,
    #[serde(alias = "layer_name", alias = "layer")]
    pub layer_name: String,
    pub color: u8,
    #[serde(alias = "line_weight")]
    pub line_weight: i16,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let style = LayerStyle::default();
        Self {
            snap_angle_increment: 15.0,
            low_threshold: 50,
            high_threshold: 150,
            blur: true,
            accumulator_threshold: 100,
            min_line_length: 100.0,
            max_line_gap: 10.0,
            merge_offset_tolerance: 2.0,
            merge_gap_tolerance: None,
            min_segment_length: 1.0,
            hough_seed: DEFAULT_HOUGH_SEED,
            layer_name: style.layer_name,
            color: style.color,
            line_weight: style.line_weight,
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InputError::config(field, format!("must be positive, got {value}")))
    }
}

impl PipelineConfig {
    /// Reject values no stage can work with.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.low_threshold > self.high_threshold {
            return Err(InputError::config(
                "lowThreshold",
                format!(
                    "{} is greater than highThreshold {}",
                    self.low_threshold, self.high_threshold
                ),
            ));
        }
        let inc = self.snap_angle_increment;
        if !inc.is_finite() || inc <= 0.0 || inc >= 180.0 {
            return Err(InputError::config(
                "snapAngleIncrement",
                format!("{inc} is outside (0, 180)"),
            ));
        }
        if self.accumulator_threshold == 0 {
            return Err(InputError::config("accumulatorThreshold", "must be at least 1"));
        }
        require_positive("minLineLength", self.min_line_length)?;
        require_positive("maxLineGap", self.max_line_gap)?;
        require_positive("mergeOffsetTolerance", self.merge_offset_tolerance)?;
        if let Some(gap) = self.merge_gap_tolerance {
            require_positive("mergeGapTolerance", gap)?;
        }
        require_positive("minSegmentLength", self.min_segment_length)?;
        if self.layer_name.trim().is_empty() {
            return Err(InputError::config("layerName", "must not be empty"));
        }
        if self.color == 0 {
            return Err(InputError::config("color", "color index must be in 1..=255"));
        }
        if !LayerStyle::is_valid_line_weight(self.line_weight) {
            return Err(InputError::config(
                "lineWeight",
                format!("{} is neither >= 0 nor -1/-2/-3", self.line_weight),
            ));
        }
        Ok(())
    }

    pub fn to_edge_options(&self) -> EdgeOptions {
        EdgeOptions {
            low_threshold: self.low_threshold,
            high_threshold: self.high_threshold,
            blur: self.blur,
        }
    }

    pub fn to_hough_options(&self) -> HoughOptions {
        HoughOptions {
            accumulator_threshold: self.accumulator_threshold,
            min_line_length: self.min_line_length,
            max_line_gap: self.max_line_gap,
            seed: self.hough_seed,
            ..HoughOptions::default()
        }
    }

    pub fn to_snap_options(&self) -> SnapOptions {
        SnapOptions {
            increment_deg: self.snap_angle_increment,
            offset_tolerance: self.merge_offset_tolerance,
            gap_tolerance: self.merge_gap_tolerance.unwrap_or(self.max_line_gap),
            min_segment_length: self.min_segment_length,
        }
    }

    pub fn to_layer_style(&self) -> LayerStyle {
        LayerStyle {
            layer_name: self.layer_name.clone(),
            color: self.color,
            line_weight: self.line_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(config: PipelineConfig) -> &'static str {
        match config.validate() {
            Err(InputError::InvalidConfig { field, .. }) => field,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = PipelineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.to_snap_options().gap_tolerance, 10.0);
        assert_eq!(cfg.to_layer_style(), LayerStyle::default());
    }

    #[test]
    fn missing_keys_default_and_aliases_apply() {
        let cfg: PipelineConfig = serde_json::from_str(
            r#"{"snap_angle": 30, "line_threshold": 80, "highThreshold": 200, "frobnicate": 1}"#,
        )
        .unwrap();
        assert_eq!(cfg.snap_angle_increment, 30.0);
        assert_eq!(cfg.accumulator_threshold, 80);
        assert_eq!(cfg.high_threshold, 200);
        assert_eq!(cfg.low_threshold, 50);
        assert_eq!(cfg.layer_name, "LINES");
    }

    #[test]
    fn swapped_thresholds_are_rejected() {
        let cfg = PipelineConfig {
            low_threshold: 200,
            high_threshold: 100,
            ..PipelineConfig::default()
        };
        assert_eq!(invalid_field(cfg), "lowThreshold");
    }

    #[test]
    fn out_of_range_values_name_their_field() {
        let base = PipelineConfig::default;
        assert_eq!(
            invalid_field(PipelineConfig { snap_angle_increment: 180.0, ..base() }),
            "snapAngleIncrement"
        );
        assert_eq!(
            invalid_field(PipelineConfig { accumulator_threshold: 0, ..base() }),
            "accumulatorThreshold"
        );
        assert_eq!(
            invalid_field(PipelineConfig { min_line_length: -1.0, ..base() }),
            "minLineLength"
        );
        assert_eq!(
            invalid_field(PipelineConfig { merge_gap_tolerance: Some(0.0), ..base() }),
            "mergeGapTolerance"
        );
        assert_eq!(
            invalid_field(PipelineConfig { layer_name: "  ".into(), ..base() }),
            "layerName"
        );
        assert_eq!(invalid_field(PipelineConfig { color: 0, ..base() }), "color");
        assert_eq!(
            invalid_field(PipelineConfig { line_weight: -7, ..base() }),
            "lineWeight"
        );
        assert!(PipelineConfig { line_weight: -1, ..base() }.validate().is_ok());
    }
}
