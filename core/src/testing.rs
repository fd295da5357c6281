//! In-memory `DatasetService` used by the unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::model::{
    Averages, ChartSeries, ChartSeriesWire, Dataset, DatasetStats, EquipmentItem, Summary,
    UploadReceipt,
};
use crate::prelude::{DashResult, DashboardError, DatasetId, DatasetService, UploadRequest};

#[derive(Default)]
struct FakeState {
    order: Vec<DatasetId>,
    datasets: HashMap<DatasetId, Dataset>,
    items: HashMap<DatasetId, Value>,
    list_error: Option<DashboardError>,
    chart_error: Option<DashboardError>,
    detail_errors: HashMap<DatasetId, DashboardError>,
    delete_error: Option<DashboardError>,
    upload_result: Option<DashResult<UploadReceipt>>,
    gates: HashMap<DatasetId, Arc<Notify>>,
    list_gate: Option<Arc<Notify>>,
    next_id: i64,
}

#[derive(Default)]
pub(crate) struct FakeService {
    state: Mutex<FakeState>,
    detail_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

pub(crate) fn sample_items(count: usize) -> Vec<EquipmentItem> {
    (0..count)
        .map(|idx| {
            let kind = ["Pump", "Valve", "Reactor"][idx % 3];
            EquipmentItem::new(
                idx as i64 + 1,
                format!("{kind}-{:02}", idx + 1),
                kind,
                10.0 + idx as f64,
                1.0 + (idx % 4) as f64 * 0.5,
                20.0 + (idx % 7) as f64,
            )
        })
        .collect()
}

fn dataset(id: DatasetId, count: usize) -> Dataset {
    Dataset {
        id,
        filename: format!("dataset-{id}.csv"),
        uploaded_at: Utc
            .with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
            .single()
            .unwrap_or_default(),
        summary: DatasetStats {
            total_equipment_count: count as u64,
        },
    }
}

impl FakeService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_dataset(id: i64, count: usize) -> Self {
        let service = Self::new();
        service.add_dataset(id, count);
        service
    }

    pub(crate) fn add_dataset(&self, id: i64, count: usize) {
        let id = DatasetId(id);
        let mut state = self.state.lock().unwrap();
        if !state.order.contains(&id) {
            state.order.push(id);
        }
        state.datasets.insert(id, dataset(id, count));
        state
            .items
            .insert(id, serde_json::to_value(sample_items(count)).unwrap());
        state.next_id = state.next_id.max(id.0);
    }

    /// Holds the next list request until the returned gate is notified.
    pub(crate) fn gate_list(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.state.lock().unwrap().list_gate = Some(notify.clone());
        notify
    }

    pub(crate) fn gate(&self, id: i64) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .gates
            .insert(DatasetId(id), notify.clone());
        notify
    }

    pub(crate) fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_list_with(&self, err: DashboardError) {
        self.state.lock().unwrap().list_error = Some(err);
    }

    pub(crate) fn heal_list(&self) {
        self.state.lock().unwrap().list_error = None;
    }

    pub(crate) fn fail_chart_with(&self, err: DashboardError) {
        self.state.lock().unwrap().chart_error = Some(err);
    }

    pub(crate) fn fail_details_for(&self, id: i64, err: DashboardError) {
        self.state
            .lock()
            .unwrap()
            .detail_errors
            .insert(DatasetId(id), err);
    }

    pub(crate) fn fail_delete_with(&self, err: DashboardError) {
        self.state.lock().unwrap().delete_error = Some(err);
    }

    pub(crate) fn respond_to_upload(&self, result: DashResult<UploadReceipt>) {
        self.state.lock().unwrap().upload_result = Some(result);
    }

    pub(crate) fn set_items_payload(&self, id: i64, payload: Value) {
        self.state
            .lock()
            .unwrap()
            .items
            .insert(DatasetId(id), payload);
    }

    fn item_snapshot(&self, id: DatasetId) -> Vec<EquipmentItem> {
        let state = self.state.lock().unwrap();
        state
            .items
            .get(&id)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    async fn enter_detail(&self, id: DatasetId) -> DashResult<()> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let (gate, error) = {
            let state = self.state.lock().unwrap();
            (state.gates.get(&id).cloned(), state.detail_errors.get(&id).cloned())
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DatasetService for FakeService {
    async fn list_datasets(&self) -> DashResult<Vec<Dataset>> {
        let gate = self.state.lock().unwrap().list_gate.take();
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.list_error {
            return Err(err.clone());
        }
        Ok(state
            .order
            .iter()
            .rev()
            .filter_map(|id| state.datasets.get(id).cloned())
            .collect())
    }

    async fn summary(&self, id: DatasetId) -> DashResult<Option<Summary>> {
        self.enter_detail(id).await?;
        let items = self.item_snapshot(id);
        if items.is_empty() {
            return Ok(None);
        }
        let mut type_distribution = BTreeMap::new();
        for item in &items {
            *type_distribution.entry(item.kind.clone()).or_insert(0) += 1;
        }
        let count = items.len() as f64;
        Ok(Some(Summary {
            total_count: items.len() as u64,
            averages: Averages {
                flowrate: items.iter().map(|item| item.flowrate).sum::<f64>() / count,
                pressure: items.iter().map(|item| item.pressure).sum::<f64>() / count,
                temperature: items.iter().map(|item| item.temperature).sum::<f64>() / count,
            },
            type_distribution,
        }))
    }

    async fn chart(&self, id: DatasetId) -> DashResult<Option<ChartSeries>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.state.lock().unwrap().chart_error.clone() {
            return Err(err);
        }
        let items = self.item_snapshot(id);
        let mut wire = ChartSeriesWire::default();
        for item in &items {
            if !wire.labels.contains(&item.kind) {
                wire.labels.push(item.kind.clone());
                wire.flowrate.push(item.flowrate);
                wire.pressure.push(item.pressure);
            }
        }
        Ok(ChartSeries::from_wire(wire))
    }

    async fn items(&self, id: DatasetId) -> DashResult<Value> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state.items.get(&id).cloned().unwrap_or_else(|| json!([])))
    }

    async fn delete_dataset(&self, id: DatasetId) -> DashResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.delete_error {
            return Err(err.clone());
        }
        if state.datasets.remove(&id).is_none() {
            return Err(DashboardError::Status {
                status: 404,
                body: "Dataset not found".into(),
            });
        }
        state.order.retain(|existing| *existing != id);
        state.items.remove(&id);
        Ok(())
    }

    async fn upload(&self, request: UploadRequest) -> DashResult<UploadReceipt> {
        let scripted = self.state.lock().unwrap().upload_result.take();
        if let Some(result) = scripted {
            return result;
        }
        let id = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            state.next_id
        };
        self.add_dataset(id, 4);
        Ok(UploadReceipt {
            dataset_id: DatasetId(id),
            message: "File uploaded successfully".into(),
            filename: Some(request.filename),
        })
    }
}
