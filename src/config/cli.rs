use crate::config::toml_config::ClientConfig;
use crate::core::AdminResource;
use crate::domain::model::{Conditions, Metadata, QueryParams};
use crate::utils::error::{BuxError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "bux-admin.toml";

#[derive(Debug, Clone, Parser)]
#[command(name = "bux-admin")]
#[command(about = "Administrative client for a BUX wallet server")]
pub struct CliConfig {
    #[arg(long, short = 'c', help = "TOML config file (default: ./bux-admin.toml if present)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "BUX server URL, e.g. https://bux.example.com/v1")]
    pub server: Option<String>,

    #[arg(long, help = "Admin xpriv used to sign admin requests")]
    pub admin_key: Option<String>,

    #[arg(long, help = "User xpriv")]
    pub xpriv: Option<String>,

    #[arg(long, help = "Access key (hex private key)")]
    pub access_key: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Log responses from the server")]
    pub debug: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Write logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check whether the admin key is accepted by the server
    Status,
    /// Show server-wide statistics
    Stats,
    /// Register a new xpub
    RegisterXpub {
        xpub: String,
        #[arg(long, help = "Metadata as a JSON object")]
        metadata: Option<String>,
    },
    /// Show the xpub record of the configured user key
    GetXpub,
    /// Search an admin model collection
    Search {
        #[arg(value_enum)]
        resource: AdminResource,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count an admin model collection
    Count {
        #[arg(value_enum)]
        resource: AdminResource,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Manage paymail addresses
    #[command(subcommand)]
    Paymail(PaymailCommand),
    /// Record a transaction from its hex
    RecordTx { hex: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PaymailCommand {
    Get {
        address: String,
    },
    Create {
        xpub_id: String,
        address: String,
        #[arg(long, default_value = "")]
        public_name: String,
        #[arg(long, default_value = "")]
        avatar: String,
    },
    Delete {
        address: String,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long, help = "Conditions as a JSON object")]
    pub conditions: Option<String>,

    #[arg(long, help = "Metadata as a JSON object")]
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct PageArgs {
    #[arg(long)]
    pub page: Option<i32>,

    #[arg(long)]
    pub page_size: Option<i32>,

    #[arg(long)]
    pub order_by: Option<String>,

    #[arg(long)]
    pub sort_direction: Option<String>,
}

impl FilterArgs {
    pub fn conditions(&self) -> Result<Option<Conditions>> {
        self.conditions
            .as_deref()
            .map(|raw| parse_json_object("conditions", raw))
            .transpose()
    }

    pub fn metadata(&self) -> Result<Option<Metadata>> {
        parse_metadata(self.metadata.as_deref())
    }
}

impl PageArgs {
    /// `None` when no paging flag was given, so the server applies its defaults.
    pub fn query_params(&self) -> Option<QueryParams> {
        if self.page.is_none()
            && self.page_size.is_none()
            && self.order_by.is_none()
            && self.sort_direction.is_none()
        {
            return None;
        }

        Some(QueryParams {
            page: self.page.unwrap_or_default(),
            page_size: self.page_size.unwrap_or_default(),
            order_by_field: self.order_by.clone().unwrap_or_default(),
            sort_direction: self.sort_direction.clone().unwrap_or_default(),
        })
    }
}

pub fn parse_metadata(raw: Option<&str>) -> Result<Option<Metadata>> {
    raw.map(|raw| {
        parse_json_object("metadata", raw).map(|object| object.into_iter().collect())
    })
    .transpose()
}

pub fn parse_json_object(field: &str, raw: &str) -> Result<Conditions> {
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Object(object) => Ok(object),
        other => Err(BuxError::InvalidConfigValueError {
            field: field.to_string(),
            value: other.to_string(),
            reason: "expected a JSON object".to_string(),
        }),
    }
}

impl CliConfig {
    /// 合併設定檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() => {
                ClientConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                let url = validate_required_field("server", &self.server)?;
                let mut config = ClientConfig::default();
                config.server.url = url.clone();
                config
            }
        };

        if let Some(server) = &self.server {
            config.server.url = server.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.server.timeout_seconds = Some(timeout);
        }
        if self.admin_key.is_some() {
            config.keys.admin_key = self.admin_key.clone();
        }
        if self.xpriv.is_some() {
            config.keys.xpriv = self.xpriv.clone();
        }
        if self.access_key.is_some() {
            config.keys.access_key = self.access_key.clone();
        }
        if self.debug {
            config.client.debug = true;
        }

        config.validate()?;
        Ok(config)
    }
}
