use crate::core::TransportOptions;
use crate::utils::error::{BuxError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub client: ClientOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct KeysConfig {
    pub xpriv: Option<String>,
    pub admin_key: Option<String>,
    pub access_key: Option<String>,
}

// 避免金鑰出現在日誌中
impl std::fmt::Debug for KeysConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "***");
        f.debug_struct("KeysConfig")
            .field("xpriv", &mask(&self.xpriv))
            .field("admin_key", &mask(&self.admin_key))
            .field("access_key", &mask(&self.access_key))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientOptions {
    #[serde(default = "default_sign_request")]
    pub sign_request: bool,
    #[serde(default)]
    pub debug: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            sign_request: default_sign_request(),
            debug: false,
        }
    }
}

fn default_sign_request() -> bool {
    true
}

impl ClientConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BuxError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BuxError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BUX_ADMIN_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| BuxError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.server
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            server: self.server.url.clone(),
            xpriv: self.keys.xpriv.clone(),
            admin_key: self.keys.admin_key.clone(),
            access_key: self.keys.access_key.clone(),
            sign_request: self.client.sign_request,
            debug: self.client.debug,
            timeout: Some(self.timeout()),
        }
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("server.url", &self.server.url)?;

        if let Some(timeout) = self.server.timeout_seconds {
            validate_range("server.timeout_seconds", timeout, 1, 600)?;
        }

        let keys = [
            ("keys.xpriv", &self.keys.xpriv),
            ("keys.admin_key", &self.keys.admin_key),
            ("keys.access_key", &self.keys.access_key),
        ];
        for (field, key) in keys {
            if let Some(key) = key {
                validate_non_empty_string(field, key)?;
                if key.contains("${") {
                    return Err(BuxError::ConfigValidationError {
                        field: field.to_string(),
                        message: "environment variable is not set".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
