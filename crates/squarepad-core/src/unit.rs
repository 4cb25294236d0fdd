//! Per-image processing units and their cancellable tasks.
//!
//! A [`TransformUnit`] owns one source image and its [`ProcessingState`].
//! Work is handed out as a [`TransformTask`]: an owned snapshot of the
//! source, color, and options, tagged with a [`TaskKey`]. The task can be run
//! anywhere (inline, in a Web Worker, on another thread); its result is only
//! accepted if the unit's generation still matches the key.
//!
//! ```text
//!            start()                 finish(Ok)
//!   Idle ───────────────► Loading ─────────────► Succeeded
//!     ▲                     │  ▲                     │
//!     │ cancel()            │  │ start()/retry()     │ start()
//!     └─────────────────────┘  └──── Failed ◄────────┘
//!                                finish(Err)
//! ```
//!
//! Restarting or cancelling moves the unit to a fresh generation, so a task
//! still in flight from before becomes stale and its result is dropped.
//! Generations come from one process-wide counter, which keeps keys unique
//! even when a file is removed and a new one with the same name is selected.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::color::BackgroundColor;
use crate::decode::SourceImage;
use crate::options::PadOptions;
use crate::pipeline::{transform, OutputArtifact, TransformError};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Identity of one computation: which file, and which attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub name: String,
    pub generation: u64,
}

/// Lifecycle of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProcessingState {
    /// Nothing started yet, or the last task was cancelled.
    #[default]
    Idle,
    /// A task is in flight.
    Loading,
    Succeeded(OutputArtifact),
    /// Decoding or encoding failed; call `retry` to start again.
    Failed(TransformError),
}

impl ProcessingState {
    /// Short lowercase label, e.g. for CSS classes.
    pub fn label(&self) -> &'static str {
        match self {
            ProcessingState::Idle => "idle",
            ProcessingState::Loading => "loading",
            ProcessingState::Succeeded(_) => "succeeded",
            ProcessingState::Failed(_) => "failed",
        }
    }

    pub fn artifact(&self) -> Option<&OutputArtifact> {
        match self {
            ProcessingState::Succeeded(artifact) => Some(artifact),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TransformError> {
        match self {
            ProcessingState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ProcessingState::Loading)
    }
}

/// A self-contained unit of padding work.
#[derive(Debug, Clone)]
pub struct TransformTask {
    key: TaskKey,
    source: SourceImage,
    color: BackgroundColor,
    options: PadOptions,
}

impl TransformTask {
    pub fn key(&self) -> &TaskKey {
        &self.key
    }

    pub fn color(&self) -> BackgroundColor {
        self.color
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// Run the pipeline for this snapshot.
    pub fn run(&self) -> TaskResult {
        TaskResult {
            key: self.key.clone(),
            outcome: transform(&self.source, self.color, &self.options),
        }
    }
}

/// The outcome of a task, still tagged with its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub key: TaskKey,
    pub outcome: Result<OutputArtifact, TransformError>,
}

/// One selected image and its processing state.
#[derive(Debug, Clone)]
pub struct TransformUnit {
    source: SourceImage,
    state: ProcessingState,
    generation: u64,
}

impl TransformUnit {
    pub fn new(source: SourceImage) -> Self {
        Self {
            source,
            state: ProcessingState::Idle,
            generation: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    /// Key of the current (or most recent) computation.
    pub fn key(&self) -> TaskKey {
        TaskKey {
            name: self.name().to_string(),
            generation: self.generation,
        }
    }

    /// Begin a new computation, invalidating any in flight.
    pub fn start(&mut self, color: BackgroundColor, options: &PadOptions) -> TransformTask {
        self.generation = next_generation();
        self.state = ProcessingState::Loading;
        TransformTask {
            key: self.key(),
            source: self.source.clone(),
            color,
            options: *options,
        }
    }

    /// Restart a failed unit. Returns `None` in any other state.
    pub fn retry(&mut self, color: BackgroundColor, options: &PadOptions) -> Option<TransformTask> {
        match self.state {
            ProcessingState::Failed(_) => Some(self.start(color, options)),
            _ => None,
        }
    }

    /// Abandon the in-flight computation, if any.
    pub fn cancel(&mut self) {
        if self.state.is_loading() {
            self.generation = next_generation();
            self.state = ProcessingState::Idle;
        }
    }

    /// Apply a finished task. Returns `false` (and changes nothing) when the
    /// result is stale or belongs to another unit.
    pub fn finish(&mut self, result: TaskResult) -> bool {
        if result.key != self.key() || !self.state.is_loading() {
            return false;
        }

        self.state = match result.outcome {
            Ok(artifact) => ProcessingState::Succeeded(artifact),
            Err(err) => {
                log::warn!("{}: {}", self.name(), err);
                ProcessingState::Failed(err)
            }
        };
        true
    }
}
