use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BilledError {
    #[error("Config directory not found at {0}. Run 'billed init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Failed to read session file {path}: {source}")]
    SessionParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not logged in. Run 'billed login' first.")]
    NotLoggedIn,

    /// Rejection from the remote bills API; the message is shown verbatim.
    #[error("{0}")]
    Api(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Upload request failed: {0}")]
    Upload(#[from] reqwest::Error),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date '{0}'")]
    DateFormat(String),

    #[error("Invalid bill index '{0}'. Use 'billed bills' to see available bills.")]
    InvalidBillIndex(String),

    #[error("Receipt file not found: {0}")]
    ReceiptNotFound(PathBuf),

    #[error("Unsupported receipt '{0}'. Only JPG, JPEG and PNG files are accepted.")]
    InvalidReceipt(String),

    #[error("Bill '{0}' has no receipt attached")]
    NoReceipt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BilledError>;
