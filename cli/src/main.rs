use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;
use equipcore::selection::UploadStatus;
use equipcore::table::SortDirection;
use equipcore::{DashboardSession, DatasetId, ErrorKind, HttpDatasetService, UploadRequest};
use options::{Cli, Command};
use std::fs;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;

mod options;
mod render;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.connection.resolve()?;
    log::info!("using dataset service at {}", config.base_url);

    let service = HttpDatasetService::new(&config).context("building HTTP client")?;
    let session = DashboardSession::new(Arc::new(service), &config);

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating async runtime")?;
    runtime.block_on(run(&session, cli.command, &config))?;

    if cli.metrics {
        println!("{}", render::metrics(session.metrics()));
    }
    Ok(())
}

async fn run(
    session: &DashboardSession,
    command: Command,
    config: &equipcore::ClientConfig,
) -> anyhow::Result<()> {
    match command {
        Command::List => {
            session.refresh().await;
            ensure_no_error(session, ErrorKind::ListLoad)?;
            print!("{}", session.read(|controller| render::dataset_list(controller, Local::now()))?);
        }
        Command::Show { dataset } => {
            load(session, dataset).await?;
            print!("{}", session.read(render::details)?);
        }
        Command::Table {
            dataset,
            sort,
            desc,
            page,
            page_size,
        } => {
            let page_size = options::page_size(page_size, config)?;
            load(session, dataset).await?;
            let text = session.update(|controller| {
                let total = controller.items().len();
                let direction = match (sort, desc) {
                    (None, _) => SortDirection::Unsorted,
                    (Some(_), false) => SortDirection::Ascending,
                    (Some(_), true) => SortDirection::Descending,
                };
                let table = controller.table_mut();
                table.set_page_size(page_size);
                table.set_sort(sort, direction);
                table.go_to(page.saturating_sub(1), total);
                render::table(&controller.page(), controller.table())
            });
            print!("{}", text?);
        }
        Command::Upload { file } => {
            let contents =
                fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let filename = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.csv".to_string());
            session.upload(UploadRequest { filename, contents }).await;

            let status = session.read(|controller| controller.upload_status().clone());
            match status {
                UploadStatus::Succeeded(receipt) => {
                    println!("{} (dataset {})", receipt.message, receipt.dataset_id);
                    print!("{}", session.read(render::details)?);
                }
                UploadStatus::Failed(rejection) => bail!("{}", rejection.hint_text()),
                UploadStatus::Idle | UploadStatus::Uploading => {
                    bail!("upload finished without a result")
                }
            }
        }
        Command::Delete { id } => {
            session.refresh().await;
            ensure_no_error(session, ErrorKind::ListLoad)?;
            session.delete(DatasetId(id)).await;
            ensure_no_error(session, ErrorKind::Delete)?;
            println!("Deleted dataset {id}.");
            print!("{}", session.read(|controller| render::dataset_list(controller, Local::now()))?);
        }
    }
    Ok(())
}

/// Lists datasets, then selects the requested one. Without an explicit id the
/// newest dataset picked by auto-select is used.
async fn load(session: &DashboardSession, dataset: Option<i64>) -> anyhow::Result<()> {
    session.refresh().await;
    ensure_no_error(session, ErrorKind::ListLoad)?;
    if let Some(id) = dataset {
        let id = DatasetId(id);
        let known = session.read(|controller| {
            controller.datasets().iter().any(|dataset| dataset.id == id)
        });
        if !known {
            bail!("dataset {id} does not exist");
        }
        if session.read(|controller| controller.selected()) != Some(id) {
            session.select(Some(id)).await;
        }
    }
    if session.read(|controller| controller.selected()).is_none() {
        bail!("no datasets uploaded yet");
    }
    ensure_no_error(session, ErrorKind::DetailLoad)
}

fn ensure_no_error(session: &DashboardSession, kind: ErrorKind) -> anyhow::Result<()> {
    match session.read(|controller| controller.error(kind).cloned()) {
        Some(err) => Err(err).with_context(|| format!("{kind:?} failed")),
        None => Ok(()),
    }
}
