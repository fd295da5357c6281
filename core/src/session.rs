use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::ClientConfig;
use crate::fetch::FetchOrchestrator;
use crate::prelude::{DatasetId, DatasetService, UploadRequest};
use crate::selection::{DatasetSelectionController, DetailOutcome, Effect};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// Async driver around the selection controller: performs the effects it
/// returns and feeds the results back.
///
/// The controller lock is only taken for synchronous transitions and never
/// held across an await, so several operations can be in flight at once while
/// the generation check keeps the detail panes consistent.
pub struct DashboardSession {
    controller: Mutex<DatasetSelectionController>,
    orchestrator: FetchOrchestrator,
    service: Arc<dyn DatasetService>,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl DashboardSession {
    pub fn new(service: Arc<dyn DatasetService>, config: &ClientConfig) -> Self {
        let metrics = Arc::new(MetricsRecorder::new());
        let orchestrator = FetchOrchestrator::new(service.clone(), metrics.clone())
            .with_strict_item_shape(config.strict_item_shape);
        Self {
            controller: Mutex::new(DatasetSelectionController::new(
                config.page_size,
                metrics.clone(),
            )),
            orchestrator,
            service,
            metrics,
            logger: LogManager::new("session"),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&DatasetSelectionController) -> R) -> R {
        let controller = self.controller.lock().unwrap_or_else(PoisonError::into_inner);
        f(&controller)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut DatasetSelectionController) -> R) -> R {
        let mut controller = self.controller.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut controller)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Reloads the dataset list, following any auto-selection it triggers.
    pub async fn refresh(&self) -> Vec<DetailOutcome> {
        let effects = self.update(|controller| controller.request_reload());
        self.run(effects).await
    }

    pub async fn select(&self, id: Option<DatasetId>) -> Vec<DetailOutcome> {
        let effects = self.update(|controller| controller.set_selection(id));
        self.run(effects).await
    }

    /// Deletes one dataset. Returns without doing anything while another
    /// delete or a list reload is outstanding.
    pub async fn delete(&self, id: DatasetId) -> Vec<DetailOutcome> {
        if !self.update(|controller| controller.begin_delete(id)) {
            self.logger
                .warn(&format!("delete of dataset {id} ignored; a delete or list reload is in progress"));
            return Vec::new();
        }
        let result = self.service.delete_dataset(id).await;
        let effects = self.update(|controller| controller.apply_delete(id, result));
        self.run(effects).await
    }

    pub async fn upload(&self, request: UploadRequest) -> Vec<DetailOutcome> {
        self.update(|controller| controller.begin_upload());
        let result = self.service.upload(request).await;
        let effects = self.update(|controller| controller.apply_upload(result));
        self.run(effects).await
    }

    /// Executes effects in order until the controller stops asking for more.
    pub async fn run(&self, effects: Vec<Effect>) -> Vec<DetailOutcome> {
        let mut queue: VecDeque<Effect> = effects.into();
        let mut outcomes = Vec::new();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::ReloadDatasets => {
                    let result = self.service.list_datasets().await;
                    let follow_up = self.update(|controller| controller.apply_dataset_list(result));
                    queue.extend(follow_up);
                }
                Effect::FetchDetails(ticket) => {
                    let completion = self.orchestrator.load(ticket).await;
                    let outcome = self.update(|controller| controller.apply_details(completion));
                    outcomes.push(outcome);
                }
            }
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UploadReceipt;
    use crate::prelude::{DashboardError, ErrorKind};
    use crate::selection::UploadStatus;
    use crate::testing::FakeService;

    fn session(service: &Arc<FakeService>) -> DashboardSession {
        DashboardSession::new(service.clone(), &ClientConfig::default())
    }

    #[tokio::test]
    async fn refresh_auto_selects_and_loads_first_dataset() {
        let service = Arc::new(FakeService::with_dataset(1, 4));
        service.add_dataset(2, 12);
        let session = session(&service);

        let outcomes = session.refresh().await;
        assert_eq!(outcomes, vec![DetailOutcome::Applied]);
        session.read(|controller| {
            assert_eq!(controller.selected(), Some(DatasetId(2)));
            assert_eq!(controller.items().len(), 12);
            assert!(controller.summary().is_some());
            assert!(controller.page().show_controls);
        });
    }

    #[tokio::test]
    async fn empty_service_leaves_nothing_selected() {
        let service = Arc::new(FakeService::new());
        let session = session(&service);
        assert!(session.refresh().await.is_empty());
        session.read(|controller| {
            assert_eq!(controller.selected(), None);
            assert!(!controller.is_list_loading());
        });
    }

    #[tokio::test]
    async fn slower_earlier_selection_is_discarded() {
        let service = Arc::new(FakeService::with_dataset(1, 3));
        service.add_dataset(2, 5);
        let gate_a = service.gate(1);
        let session = Arc::new(session(&service));

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.select(Some(DatasetId(1))).await })
        };
        tokio::task::yield_now().await;
        while service.detail_calls() < 3 {
            tokio::task::yield_now().await;
        }

        let fast = session.select(Some(DatasetId(2))).await;
        assert_eq!(fast, vec![DetailOutcome::Applied]);

        gate_a.notify_one();
        let slow = slow.await.unwrap();
        assert_eq!(slow, vec![DetailOutcome::Stale]);

        session.read(|controller| {
            assert_eq!(controller.selected(), Some(DatasetId(2)));
            assert_eq!(controller.items().len(), 5);
        });
        assert_eq!(session.metrics().stale, 1);
        assert_eq!(session.metrics().applied, 1);
    }

    #[tokio::test]
    async fn concurrent_selections_settle_on_the_latest() {
        let service = Arc::new(FakeService::with_dataset(1, 3));
        service.add_dataset(2, 5);
        let gate_a = service.gate(1);
        let session = session(&service);

        let (first, second, ()) = tokio::join!(
            session.select(Some(DatasetId(1))),
            session.select(Some(DatasetId(2))),
            async { gate_a.notify_one() }
        );
        assert_eq!(first, vec![DetailOutcome::Stale]);
        assert_eq!(second, vec![DetailOutcome::Applied]);
        session.read(|controller| assert_eq!(controller.items().len(), 5));
    }

    #[tokio::test]
    async fn deleting_selected_dataset_moves_to_the_next() {
        let service = Arc::new(FakeService::with_dataset(1, 3));
        service.add_dataset(2, 5);
        let session = session(&service);
        session.refresh().await;

        let outcomes = session.delete(DatasetId(2)).await;
        assert_eq!(outcomes, vec![DetailOutcome::Applied]);
        session.read(|controller| {
            assert_eq!(controller.datasets().len(), 1);
            assert_eq!(controller.selected(), Some(DatasetId(1)));
            assert_eq!(controller.items().len(), 3);
            assert_eq!(controller.pending_delete(), None);
        });
    }

    #[tokio::test]
    async fn delete_is_refused_while_a_refresh_is_outstanding() {
        let service = Arc::new(FakeService::with_dataset(1, 3));
        service.add_dataset(2, 5);
        let session = Arc::new(session(&service));
        session.refresh().await;

        let gate = service.gate_list();
        let refresh = {
            let session = session.clone();
            tokio::spawn(async move { session.refresh().await })
        };
        while service.list_calls() < 2 {
            tokio::task::yield_now().await;
        }

        assert!(session.delete(DatasetId(2)).await.is_empty());
        session.read(|controller| {
            assert_eq!(controller.pending_delete(), None);
            assert_eq!(controller.selected(), Some(DatasetId(2)));
        });

        gate.notify_one();
        refresh.await.unwrap();
        assert_eq!(session.delete(DatasetId(2)).await, vec![DetailOutcome::Applied]);
        session.read(|controller| {
            assert_eq!(controller.selected(), Some(DatasetId(1)));
            assert_eq!(controller.datasets().len(), 1);
        });
    }

    #[tokio::test]
    async fn failed_delete_changes_nothing() {
        let service = Arc::new(FakeService::with_dataset(1, 3));
        let session = session(&service);
        session.refresh().await;
        service.fail_delete_with(DashboardError::Status {
            status: 500,
            body: "db locked".into(),
        });
        let list_calls = service.list_calls();

        assert!(session.delete(DatasetId(1)).await.is_empty());
        assert_eq!(service.list_calls(), list_calls);
        session.read(|controller| {
            assert_eq!(controller.selected(), Some(DatasetId(1)));
            assert_eq!(controller.items().len(), 3);
            assert!(controller.error(ErrorKind::Delete).is_some());
        });
    }

    #[tokio::test]
    async fn failed_list_keeps_previous_list() {
        let service = Arc::new(FakeService::with_dataset(1, 3));
        let session = session(&service);
        session.refresh().await;

        service.fail_list_with(DashboardError::Transport("refused".into()));
        session.refresh().await;
        session.read(|controller| {
            assert_eq!(controller.datasets().len(), 1);
            assert!(controller.error(ErrorKind::ListLoad).is_some());
        });

        service.heal_list();
        session.refresh().await;
        session.read(|controller| assert!(controller.error(ErrorKind::ListLoad).is_none()));
    }

    #[tokio::test]
    async fn failed_detail_load_keeps_previous_details() {
        let service = Arc::new(FakeService::with_dataset(1, 3));
        let session = session(&service);
        session.refresh().await;

        service.fail_details_for(1, DashboardError::Transport("timed out".into()));
        let outcomes = session.select(Some(DatasetId(1))).await;
        assert_eq!(outcomes, vec![DetailOutcome::Failed]);
        session.read(|controller| {
            assert_eq!(controller.items().len(), 3);
            assert!(controller.summary().is_some());
            assert!(controller.banner().is_some());
        });
    }

    #[tokio::test]
    async fn upload_selects_the_new_dataset() {
        let service = Arc::new(FakeService::with_dataset(1, 3));
        let session = session(&service);
        session.refresh().await;

        let outcomes = session
            .upload(UploadRequest {
                filename: "new.csv".into(),
                contents: b"Equipment Name,Type,Flowrate,Pressure,Temperature\n".to_vec(),
            })
            .await;
        assert_eq!(outcomes, vec![DetailOutcome::Applied]);
        session.read(|controller| {
            assert_eq!(controller.selected(), Some(DatasetId(2)));
            assert_eq!(controller.datasets().len(), 2);
            assert_eq!(controller.items().len(), 4);
            assert!(matches!(
                controller.upload_status(),
                UploadStatus::Succeeded(UploadReceipt { dataset_id: DatasetId(2), .. })
            ));
        });
    }

    #[tokio::test]
    async fn rejected_upload_keeps_current_selection() {
        let service = Arc::new(FakeService::with_dataset(1, 3));
        let session = session(&service);
        session.refresh().await;
        service.respond_to_upload(Err(DashboardError::UploadRejected(
            crate::model::UploadRejection::from_message("Invalid file type. Please upload a CSV file."),
        )));

        let outcomes = session
            .upload(UploadRequest {
                filename: "notes.txt".into(),
                contents: b"hello".to_vec(),
            })
            .await;
        assert!(outcomes.is_empty());
        session.read(|controller| {
            assert_eq!(controller.selected(), Some(DatasetId(1)));
            assert!(matches!(controller.upload_status(), UploadStatus::Failed(_)));
            assert!(controller.banner().is_none());
        });
    }
}
