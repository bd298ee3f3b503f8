//! Reporting types shared by the pipeline summary and the diagnostic tool.

pub mod report;
pub mod timing;

pub use report::SegmentReport;
pub use timing::{StageTiming, TimingBreakdown};
