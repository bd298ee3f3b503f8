//! End-to-end orchestration: raster → edges → segments → snapping → export.
//!
//! The run is synchronous and single-threaded. Each stage consumes the full
//! output of the previous one. Configuration is validated once, in
//! [`Pipeline::new`], so a bad config fails before any pixel is touched.
//!
//! ```no_run
//! use ortho_vectorizer::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raster = RasterBuffer::gray(64, 64, vec![0; 64 * 64])?;
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let cad = MemorySink::new();
//! let mut targets = ExportTargets::new(cad.clone());
//! let summary = pipeline.run(&raster, &mut targets)?;
//! assert!(summary.empty);
//! # Ok(())
//! # }
//! ```

mod events;
mod stage;

pub use events::{spawn_worker, ControlMessage, PipelineEvent, PipelineWorker};
pub use stage::Stage;

use crate::config::PipelineConfig;
use crate::diagnostics::TimingBreakdown;
use crate::edges::EdgeExtractor;
use crate::error::{InputError, PipelineError};
use crate::export::{DocumentSink, ExportReport, FileSink, GeometryExporter};
use crate::image::RasterBuffer;
use crate::segments::SegmentDetector;
use crate::snapping::{AngleBucket, AngleSnapper};
use crossbeam_channel::{Receiver, Sender};
use events::{ChannelObserver, StageObserver, Unobserved};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Where the documents of a run go.
pub struct ExportTargets {
    pub cad: Box<dyn DocumentSink>,
    pub geographic: Option<Box<dyn DocumentSink>>,
}

impl ExportTargets {
    pub fn new(cad: impl DocumentSink + 'static) -> Self {
        Self {
            cad: Box::new(cad),
            geographic: None,
        }
    }

    pub fn with_geographic(mut self, sink: impl DocumentSink + 'static) -> Self {
        self.geographic = Some(Box::new(sink));
        self
    }

    /// DXF at `cad`, GeoJSON at `geographic` when given.
    pub fn to_files(cad: impl AsRef<Path>, geographic: Option<impl AsRef<Path>>) -> Self {
        Self {
            cad: Box::new(FileSink::new(cad)),
            geographic: geographic.map(|p| Box::new(FileSink::new(p)) as Box<dyn DocumentSink>),
        }
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub image_width: usize,
    pub image_height: usize,
    pub edge_pixels: usize,
    pub segments_detected: usize,
    pub segments_after_snap_and_merge: usize,
    /// Degenerate segments dropped before snapping.
    pub segments_discarded: usize,
    /// No segment survived detection; the documents are valid but empty.
    pub empty: bool,
    /// Populated grid angles, most segments first.
    pub dominant_angles: Vec<AngleBucket>,
    pub export: ExportReport,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validate `config` and build a pipeline.
    pub fn new(config: PipelineConfig) -> Result<Self, InputError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(
        &self,
        raster: &RasterBuffer,
        targets: &mut ExportTargets,
    ) -> Result<RunSummary, PipelineError> {
        self.execute(raster, targets, &mut Unobserved)
    }

    /// Like [`run`](Self::run), reporting progress on `events` and honoring
    /// cancel requests from `control` at stage boundaries.
    pub fn run_with_control(
        &self,
        raster: &RasterBuffer,
        targets: &mut ExportTargets,
        events: &Sender<PipelineEvent>,
        control: &Receiver<ControlMessage>,
    ) -> Result<RunSummary, PipelineError> {
        let mut observer = ChannelObserver { events, control };
        let summary = self.execute(raster, targets, &mut observer)?;
        let _ = events.send(PipelineEvent::Finished(Box::new(summary.clone())));
        Ok(summary)
    }

    fn execute(
        &self,
        raster: &RasterBuffer,
        targets: &mut ExportTargets,
        observer: &mut dyn StageObserver,
    ) -> Result<RunSummary, PipelineError> {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let (width, height) = (raster.width(), raster.height());
        debug!(
            "Pipeline: {}x{} raster, {} channel(s), transform={}",
            width,
            height,
            raster.channels(),
            raster.transform().is_some()
        );

        observer.before(Stage::Edges)?;
        let start = Instant::now();
        let edges = EdgeExtractor::new(self.config.to_edge_options())
            .extract(raster)
            .map_err(|e| PipelineError::input(Stage::Edges, e))?;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        timings.record(Stage::Edges, ms);
        observer.after(Stage::Edges, ms);
        let edge_pixels = edges.mask.count();

        observer.before(Stage::Segments)?;
        let start = Instant::now();
        let detected = SegmentDetector::new(self.config.to_hough_options())
            .detect(&edges.mask, width, height)
            .map_err(|e| PipelineError::input(Stage::Segments, e))?;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        timings.record(Stage::Segments, ms);
        observer.after(Stage::Segments, ms);
        drop(edges);

        observer.before(Stage::Snapping)?;
        let start = Instant::now();
        let snapped = AngleSnapper::new(self.config.to_snap_options())
            .map_err(|e| PipelineError::input(Stage::Snapping, e))?
            .snap_all(&detected.segments);
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        timings.record(Stage::Snapping, ms);
        observer.after(Stage::Snapping, ms);

        observer.before(Stage::Export)?;
        let start = Instant::now();
        let exporter = GeometryExporter::new(self.config.to_layer_style());
        let export = exporter.export(
            &snapped.segments,
            raster.transform(),
            targets.cad.as_mut(),
            targets
                .geographic
                .as_mut()
                .map(|sink| sink.as_mut() as &mut dyn DocumentSink),
        )?;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        timings.record(Stage::Export, ms);
        observer.after(Stage::Export, ms);

        timings.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
        let summary = RunSummary {
            image_width: width,
            image_height: height,
            edge_pixels,
            segments_detected: detected.segments.len(),
            segments_after_snap_and_merge: snapped.segments.len(),
            segments_discarded: snapped.discarded,
            empty: detected.segments.is_empty(),
            dominant_angles: snapped.buckets,
            export,
            timings,
        };

        if summary.empty {
            warn!(
                "Pipeline: no segments detected ({} edge px); wrote empty documents",
                edge_pixels
            );
        } else {
            info!(
                "Pipeline: {} segments detected, {} after snap and merge, {:.1}ms",
                summary.segments_detected,
                summary.segments_after_snap_and_merge,
                summary.timings.total_ms
            );
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;

    #[test]
    fn invalid_config_fails_before_running() {
        let err = Pipeline::new(PipelineConfig {
            low_threshold: 151,
            ..PipelineConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, InputError::InvalidConfig { field: "lowThreshold", .. }));
    }

    #[test]
    fn empty_raster_is_an_input_error() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let raster = RasterBuffer::gray(0, 0, Vec::new()).unwrap();
        let cad = MemorySink::new();
        let mut targets = ExportTargets::new(cad.clone());
        let err = pipeline.run(&raster, &mut targets).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Input {
                stage: Stage::Edges,
                source: InputError::EmptyRaster { .. },
            }
        ));
        assert_eq!(err.stage(), Some(Stage::Edges));
        assert!(cad.contents().is_none());
    }

    #[test]
    fn cancel_before_start_writes_nothing() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let raster = RasterBuffer::gray(32, 32, vec![0; 32 * 32]).unwrap();
        let cad = MemorySink::new();
        let mut targets = ExportTargets::new(cad.clone());
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let (control_tx, control_rx) = crossbeam_channel::unbounded();
        control_tx.send(ControlMessage::Cancel).unwrap();

        let err = pipeline
            .run_with_control(&raster, &mut targets, &event_tx, &control_rx)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled { stage: Stage::Edges }));
        assert_eq!(err.stage(), Some(Stage::Edges));
        assert!(event_rx.try_recv().is_err());
        assert!(cad.contents().is_none());
    }

    #[test]
    fn events_follow_stage_order() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let raster = RasterBuffer::gray(32, 32, vec![0; 32 * 32]).unwrap();
        let mut targets = ExportTargets::new(MemorySink::new());
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let (_control_tx, control_rx) = crossbeam_channel::unbounded();
        let summary = pipeline
            .run_with_control(&raster, &mut targets, &event_tx, &control_rx)
            .unwrap();

        let events: Vec<PipelineEvent> = event_rx.try_iter().collect();
        let started: Vec<Stage> = events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::StageStarted(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(started, Stage::ALL.to_vec());
        assert_eq!(events.len(), 9);
        assert_eq!(events.last(), Some(&PipelineEvent::Finished(Box::new(summary))));
    }
}
