//! Progress events, cancellation and the background worker.
//!
//! The pipeline never polls for cancellation inside a stage. Between stages it
//! drains the control channel; a pending [`ControlMessage::Cancel`] stops the
//! run before the next stage starts.
use super::{ExportTargets, Pipeline, RunSummary, Stage};
use crate::error::PipelineError;
use crate::image::RasterBuffer;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::info;
use std::thread::{self, JoinHandle};

#[derive(Clone, Debug, PartialEq)]
pub enum PipelineEvent {
    StageStarted(Stage),
    StageFinished { stage: Stage, elapsed_ms: f64 },
    Finished(Box<RunSummary>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMessage {
    Cancel,
}

/// Hooks invoked around every stage.
pub(crate) trait StageObserver {
    /// Called at the boundary before `stage`; an error aborts the run.
    fn before(&mut self, stage: Stage) -> Result<(), PipelineError>;
    fn after(&mut self, stage: Stage, elapsed_ms: f64);
}

/// Observer for plain `run`: never cancels, reports nothing.
pub(crate) struct Unobserved;

impl StageObserver for Unobserved {
    fn before(&mut self, _stage: Stage) -> Result<(), PipelineError> {
        Ok(())
    }

    fn after(&mut self, _stage: Stage, _elapsed_ms: f64) {}
}

pub(crate) struct ChannelObserver<'a> {
    pub events: &'a Sender<PipelineEvent>,
    pub control: &'a Receiver<ControlMessage>,
}

impl StageObserver for ChannelObserver<'_> {
    fn before(&mut self, stage: Stage) -> Result<(), PipelineError> {
        if let Ok(ControlMessage::Cancel) = self.control.try_recv() {
            info!("Pipeline: cancel requested, stopping before {stage}");
            return Err(PipelineError::Cancelled { stage });
        }
        // a caller that stopped listening does not stop the run
        let _ = self.events.send(PipelineEvent::StageStarted(stage));
        Ok(())
    }

    fn after(&mut self, stage: Stage, elapsed_ms: f64) {
        let _ = self.events.send(PipelineEvent::StageFinished { stage, elapsed_ms });
    }
}

/// Handle to a pipeline running on its own thread.
pub struct PipelineWorker {
    handle: JoinHandle<Result<RunSummary, PipelineError>>,
    events: Receiver<PipelineEvent>,
    control: Sender<ControlMessage>,
}

impl PipelineWorker {
    /// Progress events, ending with `Finished` on success.
    pub fn events(&self) -> &Receiver<PipelineEvent> {
        &self.events
    }

    /// Ask the worker to stop at the next stage boundary.
    pub fn cancel(&self) {
        let _ = self.control.send(ControlMessage::Cancel);
    }

    /// Wait for the run to end. A panic on the worker is resumed here.
    pub fn join(self) -> Result<RunSummary, PipelineError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

/// Run `pipeline` on a background thread.
pub fn spawn_worker(
    pipeline: Pipeline,
    raster: RasterBuffer,
    mut targets: ExportTargets,
) -> PipelineWorker {
    let (event_tx, event_rx) = unbounded();
    let (control_tx, control_rx) = unbounded();
    let handle = thread::spawn(move || {
        pipeline.run_with_control(&raster, &mut targets, &event_tx, &control_rx)
    });
    PipelineWorker {
        handle,
        events: event_rx,
        control: control_tx,
    }
}
