use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Edges,
    Segments,
    Snapping,
    Export,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Edges, Stage::Segments, Stage::Snapping, Stage::Export];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Edges => "edges",
            Stage::Segments => "segments",
            Stage::Snapping => "snapping",
            Stage::Export => "export",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
