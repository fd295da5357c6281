use std::collections::HashMap;
use std::sync::Arc;

use crate::aggregate::{derive, DerivedCharts};
use crate::fetch::DetailCompletion;
use crate::model::{ChartSeries, Dataset, EquipmentItem, Summary, UploadReceipt, UploadRejection};
use crate::prelude::{DashResult, DashboardError, DatasetId, ErrorKind};
use crate::selection::generation::{FetchTicket, Generation};
use crate::table::{PageSize, PageView, SortedPager};
use crate::telemetry::{LogManager, MetricsRecorder};

/// Work the controller asks its driver to perform. The controller itself never
/// performs I/O; it hands these back and is told about the results later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FetchDetails(FetchTicket),
    ReloadDatasets,
}

/// What happened to a detail completion handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    Applied,
    Failed,
    Stale,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Succeeded(UploadReceipt),
    Failed(UploadRejection),
}

#[derive(Debug, Clone)]
struct DetailState {
    summary: Option<Summary>,
    chart: Option<ChartSeries>,
    items: Arc<[EquipmentItem]>,
}

impl Default for DetailState {
    fn default() -> Self {
        Self {
            summary: None,
            chart: None,
            items: Arc::from(Vec::new()),
        }
    }
}

/// Owns the dataset list, the current selection and everything loaded for
/// it.
///
/// Every selection change advances a [`Generation`]; a detail completion is
/// applied only while its ticket still matches the latest issued load, so the
/// detail panes always describe the dataset currently selected.
///
/// Deletes and list reloads never overlap: a delete is refused while a reload
/// is outstanding, and a reload requested during a delete waits for it.
pub struct DatasetSelectionController {
    datasets: Vec<Dataset>,
    selected: Option<DatasetId>,
    generation: Generation,
    in_flight: Option<FetchTicket>,
    details: DetailState,
    table: SortedPager,
    reloads_in_flight: usize,
    reload_after_delete: bool,
    pending_delete: Option<DatasetId>,
    errors: HashMap<ErrorKind, DashboardError>,
    upload: UploadStatus,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl DatasetSelectionController {
    pub fn new(page_size: PageSize, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            datasets: Vec::new(),
            selected: None,
            generation: Generation::default(),
            in_flight: None,
            details: DetailState::default(),
            table: SortedPager::new(page_size),
            reloads_in_flight: 0,
            reload_after_delete: false,
            pending_delete: None,
            errors: HashMap::new(),
            upload: UploadStatus::Idle,
            metrics,
            logger: LogManager::new("selection"),
        }
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn selected(&self) -> Option<DatasetId> {
        self.selected
    }

    pub fn selected_dataset(&self) -> Option<&Dataset> {
        let id = self.selected?;
        self.datasets.iter().find(|dataset| dataset.id == id)
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.details.summary.as_ref()
    }

    pub fn chart(&self) -> Option<&ChartSeries> {
        self.details.chart.as_ref()
    }

    pub fn items(&self) -> &[EquipmentItem] {
        &self.details.items
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_list_loading(&self) -> bool {
        self.reloads_in_flight > 0
    }

    pub fn pending_delete(&self) -> Option<DatasetId> {
        self.pending_delete
    }

    pub fn upload_status(&self) -> &UploadStatus {
        &self.upload
    }

    pub fn error(&self, kind: ErrorKind) -> Option<&DashboardError> {
        self.errors.get(&kind)
    }

    /// Operator banner text for the shared error slot. Upload failures are
    /// reported through [`Self::upload_status`] instead.
    pub fn banner(&self) -> Option<String> {
        [ErrorKind::DetailLoad, ErrorKind::Delete, ErrorKind::ListLoad]
            .into_iter()
            .find_map(|kind| {
                let err = self.errors.get(&kind)?;
                let lead = match kind {
                    ErrorKind::ListLoad => "Failed to load datasets. Make sure the backend is running.",
                    ErrorKind::DetailLoad => "Failed to load dataset details.",
                    ErrorKind::Delete => "Failed to delete dataset.",
                    ErrorKind::Upload => return None,
                };
                Some(format!("{lead} ({err})"))
            })
    }

    pub fn dismiss_error(&mut self, kind: ErrorKind) {
        self.errors.remove(&kind);
        if kind == ErrorKind::Upload {
            if let UploadStatus::Failed(_) = self.upload {
                self.upload = UploadStatus::Idle;
            }
        }
    }

    pub fn table(&self) -> &SortedPager {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut SortedPager {
        &mut self.table
    }

    pub fn page(&self) -> PageView<'_> {
        self.table.page(&self.details.items)
    }

    pub fn derived_charts(&self) -> DerivedCharts {
        derive(&self.details.items)
    }

    /// Selecting `None` clears every detail pane. Selecting an id, including
    /// the one already selected, issues a fresh load and supersedes whatever
    /// load was in flight.
    pub fn set_selection(&mut self, id: Option<DatasetId>) -> Vec<Effect> {
        let generation = self.generation.advance();
        self.selected = id;
        match id {
            None => {
                if let Some(ticket) = self.in_flight.take() {
                    self.logger.trace_detail(&format!(
                        "selection cleared; abandoning load of dataset {}",
                        ticket.dataset_id
                    ));
                }
                self.details = DetailState::default();
                self.table.rewind();
                self.errors.remove(&ErrorKind::DetailLoad);
                Vec::new()
            }
            Some(dataset_id) => {
                let ticket = FetchTicket {
                    dataset_id,
                    generation,
                };
                self.in_flight = Some(ticket);
                self.logger.record(&format!(
                    "selected dataset {dataset_id} (generation {})",
                    generation.value()
                ));
                vec![Effect::FetchDetails(ticket)]
            }
        }
    }

    /// Marks the list as loading and asks for a reload. While a delete is
    /// outstanding the reload is held back and issued once the delete settles.
    pub fn request_reload(&mut self) -> Vec<Effect> {
        if let Some(id) = self.pending_delete {
            self.logger
                .trace_detail(&format!("list reload deferred until delete of dataset {id} settles"));
            self.reload_after_delete = true;
            return Vec::new();
        }
        self.reloads_in_flight += 1;
        vec![Effect::ReloadDatasets]
    }

    /// Replaces the dataset list. With nothing selected, the first listed
    /// dataset becomes the selection.
    pub fn apply_dataset_list(&mut self, result: DashResult<Vec<Dataset>>) -> Vec<Effect> {
        self.reloads_in_flight = self.reloads_in_flight.saturating_sub(1);
        match result {
            Ok(datasets) => {
                self.errors.remove(&ErrorKind::ListLoad);
                self.datasets = datasets;
                self.logger
                    .trace_detail(&format!("dataset list holds {} entries", self.datasets.len()));
                let first = self.datasets.first().map(|dataset| dataset.id);
                match (self.selected, first) {
                    (None, Some(id)) => self.set_selection(Some(id)),
                    _ => Vec::new(),
                }
            }
            Err(err) => {
                self.logger.warn(&format!("dataset list failed: {err}"));
                self.errors.insert(ErrorKind::ListLoad, err);
                Vec::new()
            }
        }
    }

    /// Applies a finished detail load if it is still the latest one issued.
    /// Failures leave the previously shown details in place.
    pub fn apply_details(&mut self, completion: DetailCompletion) -> DetailOutcome {
        let ticket = completion.ticket;
        if ticket.generation != self.generation || self.in_flight != Some(ticket) {
            self.metrics.record_stale();
            self.logger.trace_detail(&format!(
                "discarding stale load of dataset {} (generation {}, current {})",
                ticket.dataset_id,
                ticket.generation.value(),
                self.generation.value()
            ));
            return DetailOutcome::Stale;
        }

        self.in_flight = None;
        match completion.result {
            Ok(bundle) => {
                self.details = DetailState {
                    summary: bundle.summary,
                    chart: bundle.chart,
                    items: Arc::from(bundle.items),
                };
                self.table.rewind();
                self.errors.remove(&ErrorKind::DetailLoad);
                self.metrics.record_applied();
                DetailOutcome::Applied
            }
            Err(err) => {
                self.errors.insert(ErrorKind::DetailLoad, err);
                DetailOutcome::Failed
            }
        }
    }

    /// Returns false while another delete or a list reload is still
    /// outstanding. A list fetched before the delete could otherwise bring the
    /// deleted dataset back through auto-select.
    pub fn begin_delete(&mut self, id: DatasetId) -> bool {
        if self.pending_delete.is_some() || self.is_list_loading() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    /// Deleting the selected dataset clears the selection before the list is
    /// reloaded, so auto-select can pick the next dataset.
    pub fn apply_delete(&mut self, id: DatasetId, result: DashResult<()>) -> Vec<Effect> {
        if self.pending_delete == Some(id) {
            self.pending_delete = None;
        }
        let deferred_reload = std::mem::take(&mut self.reload_after_delete);
        match result {
            Ok(()) => {
                self.errors.remove(&ErrorKind::Delete);
                self.logger.record(&format!("deleted dataset {id}"));
                let mut effects = Vec::new();
                if self.selected == Some(id) {
                    effects.extend(self.set_selection(None));
                }
                effects.extend(self.request_reload());
                effects
            }
            Err(err) => {
                self.logger.warn(&format!("delete of dataset {id} failed: {err}"));
                self.errors.insert(ErrorKind::Delete, err);
                if deferred_reload {
                    self.request_reload()
                } else {
                    Vec::new()
                }
            }
        }
    }

    pub fn begin_upload(&mut self) {
        self.upload = UploadStatus::Uploading;
    }

    /// A successful upload reloads the list and selects the new dataset.
    pub fn apply_upload(&mut self, result: DashResult<UploadReceipt>) -> Vec<Effect> {
        match result {
            Ok(receipt) => {
                self.errors.remove(&ErrorKind::Upload);
                let new_id = receipt.dataset_id;
                self.upload = UploadStatus::Succeeded(receipt);
                let mut effects = self.request_reload();
                effects.extend(self.set_selection(Some(new_id)));
                effects
            }
            Err(err) => {
                let rejection = match &err {
                    DashboardError::UploadRejected(rejection) => rejection.clone(),
                    other => UploadRejection::from_message(other.to_string()),
                };
                self.logger.warn(&format!("upload failed: {err}"));
                self.errors.insert(ErrorKind::Upload, err);
                self.upload = UploadStatus::Failed(rejection);
                Vec::new()
            }
        }
    }
}

impl Default for DatasetSelectionController {
    fn default() -> Self {
        Self::new(PageSize::default(), Arc::new(MetricsRecorder::new()))
    }
}
