use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::prelude::{DashResult, DashboardError};
use crate::table::PageSize;

pub const BASE_URL_ENV: &str = "EQUIPDASH_BASE_URL";
pub const TOKEN_ENV: &str = "EQUIPDASH_TOKEN";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub auth_token: Option<String>,
    pub strict_item_shape: bool,
    pub page_size: PageSize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
            auth_token: None,
            strict_item_shape: false,
            page_size: PageSize::Ten,
        }
    }
}

impl ClientConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> DashResult<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            DashboardError::Io(format!("reading client config {}: {err}", path_ref.display()))
        })?;
        let config: ClientConfig = serde_yaml::from_str(&contents).map_err(|err| {
            DashboardError::Config(format!("parsing client config {}: {err}", path_ref.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `EQUIPDASH_BASE_URL` and `EQUIPDASH_TOKEN` on top of the
    /// current values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.base_url = base_url;
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|value| !value.trim().is_empty()) {
            self.auth_token = Some(token);
        }
        self
    }

    pub fn validate(&self) -> DashResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DashboardError::Config(format!(
                "base_url must be an http(s) URL (got {url:?})"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(DashboardError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if matches!(&self.auth_token, Some(token) if token.trim().is_empty()) {
            return Err(DashboardError::Config("auth_token must not be blank".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
