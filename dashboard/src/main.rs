use chrono::Local;
use charts::{BarChart, DonutChart, ScatterPlot};
use equipcore::aggregate::palette;
use equipcore::fetch::{DetailCompletion, FetchOrchestrator};
use equipcore::model::{Dataset, UploadReceipt, UploadRejection};
use equipcore::present::{history_line, summary_cards, NO_SUMMARY};
use equipcore::selection::{Effect, UploadStatus};
use equipcore::table::{row_cells, PageSize, SortKey};
use equipcore::telemetry::MetricsRecorder;
use equipcore::{
    ClientConfig, DashResult, DashboardError, DatasetId, DatasetSelectionController,
    DatasetService, ErrorKind, HttpDatasetService, UploadRequest,
};
use iced::{
    time,
    widget::{button, column, pick_list, row, scrollable, text, text_input, Canvas, Column, Container, Row},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod charts;

const UPLOAD_HINT: &str =
    "CSV columns: Equipment Name, Type, Flowrate, Pressure, Temperature";

fn main() -> iced::Result {
    env_logger::init();
    let mut config = ClientConfig::default().with_env_overrides();
    if let Err(err) = config.validate() {
        log::warn!("{err}; falling back to default client settings");
        config = ClientConfig::default();
    }
    let service: Arc<dyn DatasetService> = match HttpDatasetService::new(&config) {
        Ok(service) => Arc::new(service),
        Err(err) => {
            log::error!("cannot build HTTP client: {err}");
            std::process::exit(1);
        }
    };

    iced::application(
        move || Dashboard::boot(service.clone(), &config),
        Dashboard::update,
        Dashboard::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .run()
}

fn application_title(state: &Dashboard) -> String {
    match state.controller.selected_dataset() {
        Some(dataset) => format!("Equipment Dashboard - {}", dataset.filename),
        None => "Equipment Dashboard".into(),
    }
}

// Upload ages in the sidebar are relative, so re-render once a minute.
fn application_subscription(_: &Dashboard) -> Subscription<Message> {
    time::every(Duration::from_secs(60)).map(|_| Message::Tick)
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

struct Dashboard {
    controller: DatasetSelectionController,
    orchestrator: FetchOrchestrator,
    service: Arc<dyn DatasetService>,
    upload_path: String,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    Refresh,
    DatasetsLoaded(DashResult<Vec<Dataset>>),
    Select(DatasetId),
    DetailsLoaded(DetailCompletion),
    Delete(DatasetId),
    Deleted(DatasetId, DashResult<()>),
    UploadPathChanged(String),
    SubmitUpload,
    Uploaded(DashResult<UploadReceipt>),
    DismissError(ErrorKind),
    Sort(SortKey),
    PageSizeChosen(PageSize),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
}

impl Dashboard {
    fn boot(service: Arc<dyn DatasetService>, config: &ClientConfig) -> (Self, Task<Message>) {
        let metrics = Arc::new(MetricsRecorder::new());
        let orchestrator = FetchOrchestrator::new(service.clone(), metrics.clone())
            .with_strict_item_shape(config.strict_item_shape);
        let mut state = Dashboard {
            controller: DatasetSelectionController::new(config.page_size, metrics),
            orchestrator,
            service,
            upload_path: String::new(),
            status: format!("Connecting to {}...", config.base_url),
        };
        let effects = state.controller.request_reload();
        let task = state.perform(effects);
        (state, task)
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::none(),
            Message::Refresh => {
                let effects = state.controller.request_reload();
                state.perform(effects)
            }
            Message::DatasetsLoaded(result) => {
                if let Ok(datasets) = &result {
                    state.status = format!("{} datasets", datasets.len());
                }
                let effects = state.controller.apply_dataset_list(result);
                state.perform(effects)
            }
            Message::Select(id) => {
                let effects = state.controller.set_selection(Some(id));
                state.perform(effects)
            }
            Message::DetailsLoaded(completion) => {
                state.controller.apply_details(completion);
                Task::none()
            }
            Message::Delete(id) => {
                if !state.controller.begin_delete(id) {
                    state.status = if state.controller.is_list_loading() {
                        "Wait for the dataset list to finish loading".into()
                    } else {
                        "Another delete is still in progress".into()
                    };
                    return Task::none();
                }
                state.status = format!("Deleting dataset {id}...");
                let service = state.service.clone();
                Task::perform(
                    async move { (id, service.delete_dataset(id).await) },
                    |(id, result)| Message::Deleted(id, result),
                )
            }
            Message::Deleted(id, result) => {
                if result.is_ok() {
                    state.status = format!("Deleted dataset {id}");
                }
                let effects = state.controller.apply_delete(id, result);
                state.perform(effects)
            }
            Message::UploadPathChanged(path) => {
                state.upload_path = path;
                Task::none()
            }
            Message::SubmitUpload => {
                let path = PathBuf::from(state.upload_path.trim());
                if path.as_os_str().is_empty() {
                    return Task::none();
                }
                state.controller.begin_upload();
                let service = state.service.clone();
                Task::perform(upload_file(service, path), Message::Uploaded)
            }
            Message::Uploaded(result) => {
                if result.is_ok() {
                    state.upload_path.clear();
                }
                let effects = state.controller.apply_upload(result);
                state.perform(effects)
            }
            Message::DismissError(kind) => {
                state.controller.dismiss_error(kind);
                Task::none()
            }
            Message::Sort(key) => {
                state.controller.table_mut().toggle_sort(key);
                Task::none()
            }
            Message::PageSizeChosen(size) => {
                state.controller.table_mut().set_page_size(size);
                Task::none()
            }
            Message::FirstPage => {
                state.controller.table_mut().first();
                Task::none()
            }
            Message::PreviousPage => {
                state.controller.table_mut().previous();
                Task::none()
            }
            Message::NextPage => {
                let total = state.controller.items().len();
                state.controller.table_mut().next(total);
                Task::none()
            }
            Message::LastPage => {
                let total = state.controller.items().len();
                state.controller.table_mut().last(total);
                Task::none()
            }
        }
    }

    /// Turns controller effects into async tasks whose results come back as
    /// messages.
    fn perform(&self, effects: Vec<Effect>) -> Task<Message> {
        Task::batch(effects.into_iter().map(|effect| match effect {
            Effect::ReloadDatasets => {
                let service = self.service.clone();
                Task::perform(
                    async move { service.list_datasets().await },
                    Message::DatasetsLoaded,
                )
            }
            Effect::FetchDetails(ticket) => {
                let orchestrator = self.orchestrator.clone();
                Task::perform(
                    async move { orchestrator.load(ticket).await },
                    Message::DetailsLoaded,
                )
            }
        }))
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let layout = row![state.sidebar(), state.details()]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn sidebar(&self) -> Element<'_, Message> {
        let controller = &self.controller;
        let now = Local::now();

        let history: Column<'_, Message> = if controller.datasets().is_empty() {
            let empty = if controller.is_list_loading() {
                "Loading datasets..."
            } else {
                "No datasets uploaded yet"
            };
            Column::new().push(text(empty).size(12))
        } else {
            controller
                .datasets()
                .iter()
                .fold(Column::new().spacing(6), |col, dataset| {
                    let marker = if controller.selected() == Some(dataset.id) {
                        "▶ "
                    } else {
                        ""
                    };
                    let delete = button(text("Delete").size(12)).padding(4);
                    let delete = if controller.pending_delete().is_none() {
                        delete.on_press(Message::Delete(dataset.id))
                    } else {
                        delete
                    };
                    col.push(
                        row![
                            button(text(format!("{marker}{}", history_line(dataset, now))).size(12))
                                .on_press(Message::Select(dataset.id))
                                .width(Length::Fill)
                                .padding(6),
                            delete,
                        ]
                        .spacing(6)
                        .align_y(Alignment::Center),
                    )
                })
        };

        let upload_button = button("Upload CSV").padding(8);
        let upload_button = match controller.upload_status() {
            UploadStatus::Uploading => upload_button,
            _ => upload_button.on_press(Message::SubmitUpload),
        };
        let upload_feedback: Element<'_, Message> = match controller.upload_status() {
            UploadStatus::Idle => text(UPLOAD_HINT).size(12).into(),
            UploadStatus::Uploading => text("Uploading...").size(12).into(),
            UploadStatus::Succeeded(receipt) => text(receipt.message.clone()).size(12).into(),
            UploadStatus::Failed(rejection) => column![
                text(rejection.hint_text()).size(12),
                button(text("Dismiss").size(12))
                    .on_press(Message::DismissError(ErrorKind::Upload))
                    .padding(4),
            ]
            .spacing(4)
            .into(),
        };

        column![
            text("Upload Dataset").size(22),
            text_input("Path to CSV file", &self.upload_path)
                .on_input(Message::UploadPathChanged)
                .on_submit(Message::SubmitUpload)
                .padding(6),
            upload_button,
            upload_feedback,
            row![
                text("History").size(22),
                button(text("Refresh").size(12))
                    .on_press(Message::Refresh)
                    .padding(4),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
            scrollable(history).height(Length::Fill),
            text(&self.status).size(12),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0))
        .into()
    }

    fn details(&self) -> Element<'_, Message> {
        let controller = &self.controller;
        let mut content = Column::new().spacing(12).padding(16).width(Length::Fill);

        if let Some(banner) = controller.banner() {
            let kind = [ErrorKind::DetailLoad, ErrorKind::Delete, ErrorKind::ListLoad]
                .into_iter()
                .find(|kind| controller.error(*kind).is_some())
                .unwrap_or(ErrorKind::ListLoad);
            content = content.push(
                row![
                    text(banner).size(14),
                    button(text("Dismiss").size(12))
                        .on_press(Message::DismissError(kind))
                        .padding(4),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            );
        }

        if controller.selected().is_none() {
            return content
                .push(text("Select or upload a dataset to view its equipment.").size(16))
                .into();
        }
        if controller.is_loading() {
            content = content.push(text("Loading dataset...").size(14));
        }

        content = content.push(self.summary_row());
        content = content.push(self.chart_row());
        content.push(self.table()).into()
    }

    fn summary_row(&self) -> Element<'_, Message> {
        match self.controller.summary() {
            Some(summary) => summary_cards(summary)
                .into_iter()
                .fold(Row::new().spacing(12), |row, card| {
                    row.push(
                        Container::new(
                            column![text(card.title).size(12), text(card.display_value()).size(22)]
                                .spacing(4),
                        )
                        .padding(10)
                        .width(Length::FillPortion(1)),
                    )
                })
                .into(),
            None => text(NO_SUMMARY).size(14).into(),
        }
    }

    fn chart_row(&self) -> Element<'_, Message> {
        let mut charts = Row::new().spacing(12);

        if let Some(chart) = self.controller.chart() {
            let flowrate = BarChart {
                bars: chart
                    .bars
                    .iter()
                    .map(|bar| (bar.label.clone(), bar.flowrate))
                    .collect(),
                swatch: palette::BLUE,
            };
            let pressure = BarChart {
                bars: chart
                    .bars
                    .iter()
                    .map(|bar| (bar.label.clone(), bar.pressure))
                    .collect(),
                swatch: palette::ORANGE,
            };
            charts = charts
                .push(chart_panel("Avg flowrate by type", Canvas::new(flowrate)))
                .push(chart_panel("Avg pressure by type", Canvas::new(pressure)));
        }

        let derived = self.controller.derived_charts();
        match derived.distribution {
            Some(distribution) => {
                charts = charts.push(chart_panel(
                    "Type distribution",
                    Canvas::new(DonutChart { distribution }),
                ));
            }
            None => charts = charts.push(text("No equipment data to chart.").size(14)),
        }
        if let Some(series) = derived.scatter {
            charts = charts.push(chart_panel(
                "Pressure vs temperature",
                Canvas::new(ScatterPlot {
                    series,
                    swatch: palette::PURPLE,
                }),
            ));
        }
        charts.into()
    }

    fn table(&self) -> Element<'_, Message> {
        let controller = &self.controller;
        let view = controller.page();
        if view.total == 0 {
            return text("No equipment rows.").size(14).into();
        }

        let header = SortKey::ALL
            .into_iter()
            .fold(Row::new().spacing(4), |row, key| {
                let direction = controller.table().direction_for(key);
                row.push(
                    button(text(format!("{} {}", key.header(), direction.indicator())).size(13))
                        .on_press(Message::Sort(key))
                        .width(Length::FillPortion(1))
                        .padding(6),
                )
            });
        let rows = view.rows.iter().fold(Column::new().spacing(2), |col, item| {
            col.push(row_cells(item).into_iter().fold(
                Row::new().spacing(4),
                |row, cell| row.push(text(cell).size(13).width(Length::FillPortion(1))),
            ))
        });

        let mut footer = Row::new()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text(view.range_caption()).size(12));
        if view.show_controls {
            footer = footer
                .push(pick_list(
                    &PageSize::ALL[..],
                    Some(view.page_size),
                    Message::PageSizeChosen,
                ))
                .push(nav_button("First", view.can_previous(), Message::FirstPage))
                .push(nav_button("Previous", view.can_previous(), Message::PreviousPage))
                .push(text(view.page_caption()).size(12))
                .push(nav_button("Next", view.can_next(), Message::NextPage))
                .push(nav_button("Last", view.can_next(), Message::LastPage));
        }

        column![header, scrollable(rows).height(Length::Fixed(320.0)), footer]
            .spacing(8)
            .into()
    }
}

fn chart_panel<'a, P>(title: &'a str, canvas: Canvas<P, Message>) -> Element<'a, Message>
where
    P: iced::widget::canvas::Program<Message> + 'a,
{
    column![
        text(title).size(14),
        canvas.width(Length::Fill).height(Length::Fixed(220.0)),
    ]
    .spacing(6)
    .width(Length::FillPortion(1))
    .into()
}

fn nav_button(label: &str, enabled: bool, message: Message) -> Element<'_, Message> {
    let nav = button(text(label).size(12)).padding(4);
    if enabled {
        nav.on_press(message).into()
    } else {
        nav.into()
    }
}

async fn upload_file(
    service: Arc<dyn DatasetService>,
    path: PathBuf,
) -> DashResult<UploadReceipt> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(DashboardError::UploadRejected(UploadRejection::from_message(
            "Invalid file type. Please upload a CSV file.",
        )));
    }
    let contents = tokio::fs::read(&path).await?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());
    service.upload(UploadRequest { filename, contents }).await
}
