#![doc = include_str!("../README.md")]

// Pipeline stages, in run order.
pub mod edges;
pub mod segments;
pub mod snapping;
pub mod export;
pub mod pipeline;

// Shared building blocks.
pub mod angle;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod transform;

// Tooling around a run.
pub mod learning;

// --- High-level re-exports -------------------------------------------------

pub use crate::config::PipelineConfig;
pub use crate::error::{ConfigError, ExportError, FeedbackError, InputError, PipelineError};
pub use crate::image::RasterBuffer;
pub use crate::pipeline::{ExportTargets, Pipeline, RunSummary, Stage};
pub use crate::transform::PixelToWorld;

// --- Prelude ---------------------------------------------------------------

/// Everything needed to run the pipeline on an in-memory raster.
///
/// ```no_run
/// use ortho_vectorizer::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let raster = RasterBuffer::gray(256, 256, vec![0u8; 256 * 256])?
///     .with_transform(PixelToWorld::from_geotransform([0.0, 0.5, 0.0, 100.0, 0.0, -0.5])?);
/// let pipeline = Pipeline::new(PipelineConfig {
///     snap_angle_increment: 45.0,
///     ..Default::default()
/// })?;
/// let dxf = MemorySink::new();
/// let mut targets = ExportTargets::new(dxf.clone());
/// let summary = pipeline.run(&raster, &mut targets)?;
/// println!("lines={} dxf_bytes={:?}", summary.export.lines_written, dxf.contents().map(|b| b.len()));
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::export::{DocumentSink, FileSink, MemorySink};
    pub use crate::{
        ExportTargets, InputError, Pipeline, PipelineConfig, PipelineError, PixelToWorld,
        RasterBuffer, RunSummary, Stage,
    };
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::edges::{detect_edges, EdgeExtractor, EdgeMask, EdgeOptions, EdgeResult};
    pub use crate::export::{GeometryExporter, LayerStyle};
    pub use crate::segments::{detect_segments, HoughOptions, RawSegment, SegmentDetector};
    pub use crate::snapping::{AngleBucket, AngleSnapper, SnapOptions, SnappedSegment};
}
