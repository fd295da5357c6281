use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use equipcore::table::{PageSize, SortKey};
use equipcore::ClientConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Inspect and manage equipment datasets")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// Print fetch counters after the command finishes
    #[arg(long, default_value_t = false, global = true)]
    pub metrics: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Default)]
pub struct ConnectionArgs {
    /// Load client settings from YAML
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    #[arg(long, global = true)]
    pub token: Option<String>,
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
    /// Fail instead of showing an empty table on unknown item payloads
    #[arg(long, default_value_t = false, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List uploaded datasets, newest first
    List,
    /// Summary, charts and type distribution for one dataset
    Show {
        /// Defaults to the newest dataset
        #[arg(long)]
        dataset: Option<i64>,
    },
    /// Sorted, paginated equipment table
    Table {
        #[arg(long)]
        dataset: Option<i64>,
        /// name, type, flowrate, pressure or temperature
        #[arg(long)]
        sort: Option<SortKey>,
        #[arg(long, default_value_t = false)]
        desc: bool,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Upload a CSV file and show the resulting dataset
    Upload { file: PathBuf },
    /// Delete a dataset by id
    Delete { id: i64 },
}

impl ConnectionArgs {
    /// File settings first, then environment, then flags.
    pub fn resolve(&self) -> anyhow::Result<ClientConfig> {
        let config = match &self.config {
            Some(path) => ClientConfig::load(path)
                .with_context(|| format!("loading client config {}", path.display()))?,
            None => ClientConfig::default(),
        };
        let mut config = config.with_env_overrides();
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(token) = &self.token {
            config.auth_token = Some(token.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if self.strict {
            config.strict_item_shape = true;
        }
        config.validate().context("validating client config")?;
        Ok(config)
    }
}

pub fn page_size(requested: Option<usize>, config: &ClientConfig) -> anyhow::Result<PageSize> {
    match requested {
        Some(value) => PageSize::try_from(value).context("choosing page size"),
        None => Ok(config.page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn flags_override_config_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"base_url: http://file-host:8000/api\ntimeout_secs: 5\n")
            .unwrap();
        let path = temp.into_temp_path();
        let args = ConnectionArgs {
            config: Some(path.to_path_buf()),
            timeout_secs: Some(12),
            strict: true,
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.timeout_secs, 12);
        assert!(config.strict_item_shape);
    }

    #[test]
    fn invalid_flag_value_is_reported() {
        let args = ConnectionArgs {
            base_url: Some("localhost:8000".into()),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn table_command_parses_sort_key() {
        let cli = Cli::try_parse_from([
            "equipctl", "table", "--dataset", "4", "--sort", "flowrate", "--desc", "--page-size", "20",
        ])
        .unwrap();
        match cli.command {
            Command::Table {
                dataset,
                sort,
                desc,
                page_size,
                ..
            } => {
                assert_eq!(dataset, Some(4));
                assert_eq!(sort, Some(SortKey::Flowrate));
                assert!(desc);
                assert_eq!(page_size, Some(20));
            }
            _ => panic!("expected table command"),
        }
    }

    #[test]
    fn page_size_falls_back_to_config() {
        let config = ClientConfig::default();
        assert_eq!(page_size(None, &config).unwrap(), PageSize::Ten);
        assert!(page_size(Some(15), &config).is_err());
    }
}
