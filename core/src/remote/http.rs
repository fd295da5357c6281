use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::model::{ChartSeries, Dataset, Summary, UploadReceipt, UploadRejection};
use crate::prelude::{DashResult, DashboardError, DatasetId, DatasetService, UploadRequest};
use crate::telemetry::LogManager;

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::Decode(err.to_string())
        } else {
            DashboardError::Transport(err.to_string())
        }
    }
}

/// REST client for the dataset service.
#[derive(Clone)]
pub struct HttpDatasetService {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    logger: LogManager,
}

impl HttpDatasetService {
    pub fn new(config: &ClientConfig) -> DashResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
            logger: LogManager::new("remote"),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header("Authorization", format!("Token {token}")),
            None => request,
        }
    }

    async fn get_json(&self, path: &str) -> DashResult<Value> {
        let url = self.url(path);
        self.logger.trace_detail(&format!("GET {url}"));
        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<Value>().await?)
    }
}

/// Maps non-success statuses onto the error taxonomy, keeping the body for
/// diagnostics.
async fn check_status(response: Response) -> DashResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(DashboardError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DashboardError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl DatasetService for HttpDatasetService {
    async fn list_datasets(&self) -> DashResult<Vec<Dataset>> {
        let payload = self.get_json("datasets/").await?;
        Ok(Dataset::list_from_value(payload))
    }

    async fn summary(&self, id: DatasetId) -> DashResult<Option<Summary>> {
        let payload = self.get_json(&format!("datasets/{id}/summary/")).await?;
        Ok(Summary::from_value(payload))
    }

    async fn chart(&self, id: DatasetId) -> DashResult<Option<ChartSeries>> {
        let payload = self.get_json(&format!("datasets/{id}/chart_data/")).await?;
        Ok(ChartSeries::from_value(payload))
    }

    async fn items(&self, id: DatasetId) -> DashResult<Value> {
        self.get_json(&format!("equipment/?dataset={id}")).await
    }

    async fn delete_dataset(&self, id: DatasetId) -> DashResult<()> {
        let url = self.url(&format!("datasets/{id}/"));
        self.logger.record(&format!("DELETE {url}"));
        let response = self.authorize(self.client.delete(&url)).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn upload(&self, request: UploadRequest) -> DashResult<UploadReceipt> {
        let url = self.url("upload/");
        self.logger
            .record(&format!("uploading {} ({} bytes)", request.filename, request.contents.len()));
        let part = multipart::Part::bytes(request.contents)
            .file_name(request.filename)
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);
        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<UploadReceipt>().await?);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(DashboardError::Unauthorized);
        }
        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            let rejection = serde_json::from_str::<UploadRejection>(&body)
                .unwrap_or_else(|_| UploadRejection::from_message(body.clone()));
            return Err(DashboardError::UploadRejected(rejection));
        }
        Err(DashboardError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
