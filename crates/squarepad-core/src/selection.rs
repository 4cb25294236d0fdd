//! The selection controller.
//!
//! Holds the ordered list of selected images, keyed by file name, and the one
//! background color they all share. Every mutation that should trigger work
//! returns the [`TransformTask`]s to run; results come back through
//! [`SelectionController::complete`], which drops anything stale.

use crate::color::BackgroundColor;
use crate::decode::SourceImage;
use crate::options::PadOptions;
use crate::unit::{TaskResult, TransformTask, TransformUnit};

/// Selected images plus the shared background color.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    units: Vec<TransformUnit>,
    color: BackgroundColor,
    options: PadOptions,
}

impl SelectionController {
    /// An empty selection using `options.background` as the initial color.
    pub fn new(options: PadOptions) -> Self {
        Self {
            units: Vec::new(),
            color: options.background,
            options,
        }
    }

    pub fn color(&self) -> BackgroundColor {
        self.color
    }

    pub fn options(&self) -> &PadOptions {
        &self.options
    }

    pub fn units(&self) -> &[TransformUnit] {
        &self.units
    }

    pub fn unit(&self, name: &str) -> Option<&TransformUnit> {
        self.units.iter().find(|unit| unit.name() == name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Replace the selection and start every new unit.
    ///
    /// Names must be unique; when a name repeats, the first file keeps it and
    /// later ones are skipped.
    pub fn select_files(&mut self, files: impl IntoIterator<Item = SourceImage>) -> Vec<TransformTask> {
        self.units.clear();

        for source in files {
            if self.unit(source.name()).is_some() {
                log::warn!("skipping duplicate file name {:?}", source.name());
                continue;
            }
            self.units.push(TransformUnit::new(source));
        }

        log::info!("selected {} image(s)", self.units.len());
        self.start_all()
    }

    /// Change the shared color and restart every unit with it.
    pub fn set_color(&mut self, color: BackgroundColor) -> Vec<TransformTask> {
        log::debug!("background color {} -> {}", self.color, color);
        self.color = color;
        self.start_all()
    }

    /// Remove the entry with this name. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.units.len();
        self.units.retain(|unit| unit.name() != name);
        let removed = self.units.len() != before;
        if removed {
            log::debug!("removed {:?}", name);
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        log::debug!("cleared {} image(s)", self.units.len());
        self.units.clear();
    }

    /// Restart a failed unit.
    pub fn retry(&mut self, name: &str) -> Option<TransformTask> {
        let (color, options) = (self.color, self.options);
        self.units
            .iter_mut()
            .find(|unit| unit.name() == name)
            .and_then(|unit| unit.retry(color, &options))
    }

    /// Apply a finished task. Returns `false` for results whose unit was
    /// removed or restarted since the task was handed out.
    pub fn complete(&mut self, result: TaskResult) -> bool {
        let applied = match self.units.iter_mut().find(|unit| unit.name() == result.key.name) {
            Some(unit) => unit.finish(result),
            None => false,
        };
        if !applied {
            log::debug!("discarded stale task result");
        }
        applied
    }

    /// Run tasks inline and apply their results. Returns how many applied.
    pub fn run_pending(&mut self, tasks: Vec<TransformTask>) -> usize {
        let mut applied = 0;
        for task in tasks {
            if self.complete(task.run()) {
                applied += 1;
            }
        }
        applied
    }

    fn start_all(&mut self) -> Vec<TransformTask> {
        let (color, options) = (self.color, self.options);
        self.units
            .iter_mut()
            .map(|unit| unit.start(color, &options))
            .collect()
    }
}
