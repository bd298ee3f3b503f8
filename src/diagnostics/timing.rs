use crate::pipeline::Stage;
use serde::{Deserialize, Serialize};

/// Wall time spent in one pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub stage: Stage,
    pub elapsed_ms: f64,
}

/// Per-stage timings of a run, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn record(&mut self, stage: Stage, elapsed_ms: f64) {
        self.stages.push(StageTiming { stage, elapsed_ms });
    }

    /// Time recorded for `stage`, if it ran.
    pub fn stage_ms(&self, stage: Stage) -> Option<f64> {
        self.stages
            .iter()
            .find(|t| t.stage == stage)
            .map(|t| t.elapsed_ms)
    }
}
