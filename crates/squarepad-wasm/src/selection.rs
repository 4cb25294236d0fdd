//! Selection controller WASM bindings.
//!
//! [`JsSelection`] wraps the core selection controller. Every mutation queues
//! the tasks it starts; the host either runs them all inline with
//! [`JsSelection::process_all`], or drains them with
//! [`JsSelection::take_tasks`], runs each one (for example in a Web Worker),
//! and hands the results back through [`JsSelection::complete`]. Results
//! for files that were removed or restarted in the meantime are dropped.
//!
//! # Example
//!
//! ```typescript
//! import { JsSelection, JsSourceImage } from '@squarepad/wasm';
//!
//! const selection = new JsSelection({ jpeg_quality: 90 });
//! const sources = await Promise.all([...input.files].map(async (file) =>
//!   new JsSourceImage(file.name, file.type, new Uint8Array(await file.arrayBuffer()))));
//!
//! selection.select_files(sources);
//! selection.process_all();
//!
//! for (const unit of selection.units()) {
//!   if (unit.state === 'succeeded') link.href = unit.artifact.data_url;
//! }
//! ```

use crate::types::{js_error, JsArtifact, JsSourceImage};
use squarepad_core::{
    BackgroundColor, PadOptions, SelectionController, TaskResult, TransformTask, TransformUnit,
};
use wasm_bindgen::prelude::*;

/// A snapshot of one unit for rendering.
#[wasm_bindgen]
pub struct JsUnitView {
    name: String,
    state: &'static str,
    artifact: Option<JsArtifact>,
    error: Option<String>,
}

#[wasm_bindgen]
impl JsUnitView {
    /// File name
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// One of "idle", "loading", "succeeded", "failed"
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.state.to_string()
    }

    /// The padded image, once the unit has succeeded
    #[wasm_bindgen(getter)]
    pub fn artifact(&self) -> Option<JsArtifact> {
        self.artifact.clone()
    }

    /// Failure message, once the unit has failed
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }
}

impl JsUnitView {
    fn from_unit(unit: &TransformUnit) -> Self {
        let state = unit.state();
        Self {
            name: unit.name().to_string(),
            state: state.label(),
            artifact: state.artifact().cloned().map(JsArtifact::from_artifact),
            error: state.error().map(|err| err.to_string()),
        }
    }
}

/// One queued padding computation.
#[wasm_bindgen]
pub struct JsTransformTask {
    inner: TransformTask,
}

#[wasm_bindgen]
impl JsTransformTask {
    /// Name of the file this task pads
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.key().name.clone()
    }

    /// Background color as "#rrggbb"
    #[wasm_bindgen(getter)]
    pub fn color(&self) -> String {
        self.inner.color().to_string()
    }

    /// Decode, pad, encode, and restore metadata.
    ///
    /// Never throws: failures are carried in the result.
    pub fn run(&self) -> JsTaskResult {
        JsTaskResult {
            inner: self.inner.run(),
        }
    }
}

/// The outcome of a [`JsTransformTask`], to be passed to
/// [`JsSelection::complete`].
#[wasm_bindgen]
pub struct JsTaskResult {
    inner: TaskResult,
}

#[wasm_bindgen]
impl JsTaskResult {
    /// Name of the file the task padded
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.key.name.clone()
    }

    /// Whether the pipeline produced an artifact
    #[wasm_bindgen(getter)]
    pub fn succeeded(&self) -> bool {
        self.inner.outcome.is_ok()
    }
}

/// The selected images and their shared background color.
#[wasm_bindgen]
pub struct JsSelection {
    controller: SelectionController,
    pending: Vec<TransformTask>,
}

#[wasm_bindgen]
impl JsSelection {
    /// Create an empty selection.
    ///
    /// `options` is an optional object such as
    /// `{ jpeg_quality: 90, preserve_metadata: true, background: "#ffffff" }`;
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsSelection, JsValue> {
        let options: PadOptions = if options.is_undefined() || options.is_null() {
            PadOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(js_error)?
        };
        Ok(Self::with_options(options))
    }

    /// Replace the selection with these files and queue work for each.
    ///
    /// Duplicate file names are skipped after the first.
    pub fn select_files(&mut self, files: Vec<JsSourceImage>) {
        let tasks = self
            .controller
            .select_files(files.into_iter().map(JsSourceImage::into_inner));
        self.replace_pending(tasks);
    }

    /// Set the shared background color ("#rgb" or "#rrggbb") and queue
    /// work for every file.
    pub fn set_color(&mut self, color: &str) -> Result<(), JsValue> {
        let color: BackgroundColor = color.parse().map_err(js_error)?;
        self.apply_color(color);
        Ok(())
    }

    /// Current background color as "#rrggbb"
    #[wasm_bindgen(getter)]
    pub fn color(&self) -> String {
        self.controller.color().to_string()
    }

    /// Remove one file. Returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.pending.retain(|task| task.key().name != name);
        self.controller.remove(name)
    }

    /// Remove every file and drop queued work.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.controller.clear();
    }

    /// Queue a new attempt for a failed file. Returns whether one was queued.
    pub fn retry(&mut self, name: &str) -> bool {
        match self.controller.retry(name) {
            Some(task) => {
                self.pending.push(task);
                true
            }
            None => false,
        }
    }

    /// Drain the queued tasks so the host can run them.
    pub fn take_tasks(&mut self) -> Vec<JsTransformTask> {
        self.pending
            .drain(..)
            .map(|inner| JsTransformTask { inner })
            .collect()
    }

    /// Apply a finished task. Returns `false` when the result is stale.
    pub fn complete(&mut self, result: JsTaskResult) -> bool {
        self.controller.complete(result.inner)
    }

    /// Run every queued task inline. Returns how many results applied.
    pub fn process_all(&mut self) -> usize {
        let tasks = std::mem::take(&mut self.pending);
        self.controller.run_pending(tasks)
    }

    /// Number of queued tasks
    #[wasm_bindgen(getter)]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of selected files
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.controller.len()
    }

    /// Snapshots of every unit, in selection order.
    pub fn units(&self) -> Vec<JsUnitView> {
        self.controller.units().iter().map(JsUnitView::from_unit).collect()
    }

    /// Snapshot of one unit by file name.
    pub fn unit(&self, name: &str) -> Option<JsUnitView> {
        self.controller.unit(name).map(JsUnitView::from_unit)
    }
}

impl JsSelection {
    pub(crate) fn with_options(options: PadOptions) -> Self {
        Self {
            controller: SelectionController::new(options),
            pending: Vec::new(),
        }
    }

    fn apply_color(&mut self, color: BackgroundColor) {
        let tasks = self.controller.set_color(color);
        self.replace_pending(tasks);
    }

    // Every unit was restarted, so anything still queued is stale.
    fn replace_pending(&mut self, tasks: Vec<TransformTask>) {
        self.pending = tasks;
    }
}
