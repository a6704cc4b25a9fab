//! Selection session: feeds fetch completions into the grouping engine.
//!
//! One session backs one selector view. It owns the engine, the persisted
//! dataset selection and the outstanding-request counter. Storage side effects
//! happen here, never inside the engine.

use sv_core::RecordKey;
use sv_grouping::{Dimension, GroupSet, GroupingEngine, Record, SelectionEvent};
use sv_state::{DatasetSelection, KeyValueStorage};
use tracing::{debug, info, warn};

use crate::batch::RecordBatch;
use crate::config::SelectorConfig;
use crate::error::{AppError, AppResult};

type GroupSetChanged = Box<dyn FnMut(&GroupingEngine)>;

pub struct SelectionSession<S: KeyValueStorage> {
    config: SelectorConfig,
    engine: GroupingEngine,
    selection: DatasetSelection<S>,
    outstanding: usize,
    on_changed: Option<GroupSetChanged>,
}

impl<S: KeyValueStorage> SelectionSession<S> {
    pub fn new(config: SelectorConfig, selection: DatasetSelection<S>) -> Self {
        Self {
            engine: GroupingEngine::new(config.group_order()),
            config,
            selection,
            outstanding: 0,
            on_changed: None,
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn engine(&self) -> &GroupingEngine {
        &self.engine
    }

    pub fn selection(&self) -> &DatasetSelection<S> {
        &self.selection
    }

    /// Fetches still awaiting a completion or failure.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Called once every time the outstanding counter drops to zero.
    pub fn on_group_set_changed(&mut self, callback: impl FnMut(&GroupingEngine) + 'static) {
        self.on_changed = Some(Box::new(callback));
    }

    /// Start a batch of `expected` fetches.
    ///
    /// An empty batch with nothing else outstanding completes immediately.
    pub fn begin(&mut self, expected: usize) {
        self.outstanding += expected;
        debug!(expected, outstanding = self.outstanding, "begin batch");
        if self.outstanding == 0 {
            self.notify_changed();
        }
    }

    /// Handle one successful fetch.
    ///
    /// The record takes the configured default selection. If the persisted
    /// selection already holds its id it ends up selected, with a `Selected`
    /// notification unless it already arrived selected.
    pub fn on_record(
        &mut self,
        mut record: Record,
        sink: &mut dyn FnMut(SelectionEvent),
    ) -> AppResult<RecordKey> {
        record.selected = self.config.default_selected;
        let previously_selected = self.selection.has_dataset(&record.id);
        let key = self.engine.insert(record)?;

        if previously_selected && !self.engine.record(key)?.selected {
            self.toggle(key, sink)?;
        }

        self.complete_one();
        Ok(key)
    }

    /// Handle one failed fetch. Groups built so far are left untouched.
    pub fn on_fetch_error(&mut self, id: &str, message: &str) {
        warn!(id, message, "dataset fetch failed");
        self.complete_one();
    }

    /// Feed a whole batch: records first, then failures.
    pub fn ingest(
        &mut self,
        batch: RecordBatch,
        sink: &mut dyn FnMut(SelectionEvent),
    ) -> AppResult<()> {
        self.begin(batch.expected());
        for record in batch.records {
            self.on_record(record, sink)?;
        }
        for id in &batch.failed {
            self.on_fetch_error(id, "fetch failed");
        }
        Ok(())
    }

    fn complete_one(&mut self) {
        if self.outstanding == 0 {
            return;
        }
        self.outstanding -= 1;
        if self.outstanding == 0 {
            self.notify_changed();
        }
    }

    fn notify_changed(&mut self) {
        info!(records = self.engine.len(), "batch complete");
        if let Some(callback) = self.on_changed.as_mut() {
            callback(&self.engine);
        }
    }

    pub fn find(&self, id: &str) -> AppResult<RecordKey> {
        self.engine
            .find(id)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown record id: {}", id)))
    }

    /// Toggle one record and mirror the change into the persisted selection.
    pub fn toggle(
        &mut self,
        key: RecordKey,
        sink: &mut dyn FnMut(SelectionEvent),
    ) -> AppResult<()> {
        let mut events = Vec::new();
        self.engine.toggle(key, &mut |e| events.push(e))?;
        self.apply(events, sink)
    }

    /// Toggle a whole group and mirror every change into the persisted selection.
    pub fn toggle_all(
        &mut self,
        dimension: Dimension,
        label: &str,
        sink: &mut dyn FnMut(SelectionEvent),
    ) -> AppResult<()> {
        let mut events = Vec::new();
        self.engine
            .toggle_all(dimension, label, &mut |e| events.push(e))?;
        self.apply(events, sink)
    }

    /// Flip the collapsed flag of a group of the filter dimension.
    pub fn toggle_collapsed(&mut self, label: &str) -> AppResult<bool> {
        Ok(self
            .engine
            .toggle_collapsed(self.config.filter_dimension, label)?)
    }

    /// Persist and forward engine events.
    ///
    /// Every event reaches `sink` even when saving fails; the first storage
    /// error is returned afterwards.
    fn apply(
        &mut self,
        events: Vec<SelectionEvent>,
        sink: &mut dyn FnMut(SelectionEvent),
    ) -> AppResult<()> {
        let mut first_error = None;
        for event in events {
            let saved = match &event {
                SelectionEvent::Selected(id) => self.selection.add_dataset(id, None),
                SelectionEvent::Deselected(id) => self.selection.remove_dataset(id),
            };
            if let Err(err) = saved {
                warn!(id = event.record_id(), error = %err, "failed to persist selection change");
                first_error.get_or_insert(err);
            }
            sink(event);
        }
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    pub fn set_filter_dimension(&mut self, dimension: Dimension) {
        self.config.filter_dimension = dimension;
    }

    /// Groups of the dimension the view currently shows.
    pub fn visible_groups(&self) -> &GroupSet {
        self.engine.groups(self.config.filter_dimension)
    }

    /// Flat display list in arrival order.
    pub fn display_list(&self) -> impl Iterator<Item = &Record> {
        self.engine.records().map(|(_, r)| r)
    }
}
