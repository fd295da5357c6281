use std::sync::Arc;

use crate::fetch::normalize::normalize_items;
use crate::model::{ChartSeries, EquipmentItem, Summary};
use crate::prelude::{DashResult, DatasetService};
use crate::selection::generation::FetchTicket;
use crate::telemetry::{LogManager, MetricsRecorder};

/// Everything the detail panes need for one dataset, delivered together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailBundle {
    pub summary: Option<Summary>,
    pub chart: Option<ChartSeries>,
    pub items: Vec<EquipmentItem>,
}

/// Result of one detail load, tagged with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailCompletion {
    pub ticket: FetchTicket,
    pub result: DashResult<DetailBundle>,
}

/// Issues the summary, chart and items requests for a dataset together and
/// joins them at a single point.
#[derive(Clone)]
pub struct FetchOrchestrator {
    service: Arc<dyn DatasetService>,
    metrics: Arc<MetricsRecorder>,
    strict_item_shape: bool,
    logger: LogManager,
}

impl FetchOrchestrator {
    pub fn new(service: Arc<dyn DatasetService>, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            service,
            metrics,
            strict_item_shape: false,
            logger: LogManager::new("fetch"),
        }
    }

    pub fn with_strict_item_shape(mut self, strict: bool) -> Self {
        self.strict_item_shape = strict;
        self
    }

    /// Runs the three requests concurrently. The first failure fails the
    /// whole load; there is no partial bundle and no retry.
    pub async fn load(&self, ticket: FetchTicket) -> DetailCompletion {
        let id = ticket.dataset_id;
        self.metrics.record_issued();
        self.logger.trace_detail(&format!(
            "loading dataset {id} (generation {})",
            ticket.generation.value()
        ));

        let joined = tokio::try_join!(
            self.service.summary(id),
            self.service.chart(id),
            self.service.items(id)
        );

        let result = joined.and_then(|(summary, chart, raw_items)| {
            let normalized = normalize_items(raw_items, self.strict_item_shape)?;
            if normalized.skipped > 0 {
                self.logger.warn(&format!(
                    "dataset {id}: skipped {} malformed equipment entries",
                    normalized.skipped
                ));
            }
            Ok(DetailBundle {
                summary,
                chart,
                items: normalized.items,
            })
        });

        if let Err(err) = &result {
            self.metrics.record_failed();
            self.logger
                .warn(&format!("detail load for dataset {id} failed: {err}"));
        }

        DetailCompletion { ticket, result }
    }
}
