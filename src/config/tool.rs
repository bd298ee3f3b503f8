//! JSON configs for the command line tools.
//!
//! ```json
//! {
//!   "input": "data/ortho.png",
//!   "output": { "dxf": "out/ortho.dxf", "geojson": "out/ortho.geojson" },
//!   "pipeline": { "snapAngleIncrement": 15, "lowThreshold": 50 },
//!   "geotransform": [500000.0, 0.1, 0.0, 4100000.0, 0.0, -0.1],
//!   "feedbackFile": "feedback_history.json",
//!   "useLearned": true
//! }
//! ```
use super::PipelineConfig;
use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

fn default_feedback_file() -> PathBuf {
    PathBuf::from("feedback_history.json")
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dxf: PathBuf,
    #[serde(default)]
    pub geojson: Option<PathBuf>,
}

/// Config of `ortho2dxf convert` and `ortho2dxf feedback`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertToolConfig {
    pub input: PathBuf,
    pub output: OutputConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// GDAL-style `[x0, px_w, row_rot, y0, col_rot, px_h]`.
    #[serde(default)]
    pub geotransform: Option<[f64; 6]>,
    #[serde(default = "default_feedback_file")]
    pub feedback_file: PathBuf,
    #[serde(default)]
    pub use_learned: bool,
    /// Keys present in the `pipeline` object, as written.
    #[serde(skip)]
    pub explicit_pipeline_keys: BTreeSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeMaskOutputConfig {
    pub mask_png: PathBuf,
    pub report_json: PathBuf,
}

/// Config of the `edge_mask` diagnostic binary.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeMaskToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub output: EdgeMaskOutputConfig,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<(T, serde_json::Value), ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let value: serde_json::Value = serde_json::from_str(&data).map_err(parse_err)?;
    let parsed = serde_json::from_value(value.clone()).map_err(parse_err)?;
    Ok((parsed, value))
}

pub fn load_convert_config(path: &Path) -> Result<ConvertToolConfig, ConfigError> {
    let (mut config, raw): (ConvertToolConfig, _) = read_json(path)?;
    if let Some(obj) = raw.get("pipeline").and_then(|p| p.as_object()) {
        config.explicit_pipeline_keys = obj.keys().cloned().collect();
    }
    Ok(config)
}

pub fn load_edge_mask_config(path: &Path) -> Result<EdgeMaskToolConfig, ConfigError> {
    read_json(path).map(|(config, _)| config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_config_records_explicit_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("convert.json");
        fs::write(
            &path,
            r#"{
                "input": "ortho.png",
                "output": { "dxf": "ortho.dxf" },
                "pipeline": { "low_threshold": 30, "maxLineGap": 4 },
                "useLearned": true
            }"#,
        )
        .unwrap();
        let cfg = load_convert_config(&path).unwrap();
        assert_eq!(cfg.pipeline.low_threshold, 30);
        assert_eq!(cfg.pipeline.max_line_gap, 4.0);
        assert!(cfg.output.geojson.is_none());
        assert!(cfg.use_learned);
        assert_eq!(cfg.feedback_file, PathBuf::from("feedback_history.json"));
        let keys: Vec<&str> = cfg.explicit_pipeline_keys.iter().map(String::as_str).collect();
        assert_eq!(keys, vec!["low_threshold", "maxLineGap"]);
    }

    #[test]
    fn unreadable_and_malformed_configs_are_distinguished() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_convert_config(&missing),
            Err(ConfigError::Read { .. })
        ));
        let broken = dir.path().join("broken.json");
        fs::write(&broken, r#"{"input": 5}"#).unwrap();
        assert!(matches!(
            load_edge_mask_config(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }
}
