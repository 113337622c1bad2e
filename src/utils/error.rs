use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuxError {
    #[error("an admin key must be set to perform admin operations")]
    AdminKeyError,

    #[error("missing xpriv or access key to authenticate the request")]
    MissingKeyError,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Server responded with status {status}: {message}")]
    ResponseError { status: u16, message: String },

    #[error("Extended key error: {0}")]
    KeyError(#[from] bitcoin::bip32::Error),

    #[error("Signing key error: {0}")]
    SecpError(#[from] bitcoin::secp256k1::Error),

    #[error("Invalid hex string '{value}': {reason}")]
    HexError { value: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Server,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BuxError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BuxError::AdminKeyError
            | BuxError::MissingKeyError
            | BuxError::KeyError(_)
            | BuxError::SecpError(_) => ErrorCategory::Authentication,
            BuxError::HttpError(_) => ErrorCategory::Network,
            BuxError::ResponseError { .. } => ErrorCategory::Server,
            BuxError::SerializationError(_) | BuxError::HexError { .. } => ErrorCategory::Data,
            BuxError::ConfigError { .. }
            | BuxError::MissingConfigError { .. }
            | BuxError::InvalidConfigValueError { .. }
            | BuxError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            BuxError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BuxError::HttpError(_) => ErrorSeverity::Medium,
            BuxError::ResponseError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            BuxError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BuxError::AdminKeyError => "此操作需要管理員金鑰 (admin key)".to_string(),
            BuxError::MissingKeyError => "尚未設定 xpriv 或 access key".to_string(),
            BuxError::HttpError(e) => format!("無法連線到 BUX 伺服器: {}", e),
            BuxError::ResponseError { status, message } => {
                format!("伺服器回應錯誤 ({}): {}", status, message)
            }
            BuxError::SerializationError(e) => format!("JSON 資料格式錯誤: {}", e),
            BuxError::KeyError(e) => format!("擴展金鑰無效: {}", e),
            BuxError::SecpError(e) => format!("簽章金鑰無效: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Authentication => {
                "Check the admin_key / xpriv / access_key values in the config file or flags"
            }
            ErrorCategory::Network => "Check the server URL and that the BUX server is reachable",
            ErrorCategory::Server => "Inspect the server message; the request was rejected",
            ErrorCategory::Data => "The server returned a payload this client could not decode",
            ErrorCategory::Configuration => "Fix the configuration file and try again",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, BuxError>;
