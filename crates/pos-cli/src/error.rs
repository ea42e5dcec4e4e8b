use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Operation(#[from] pos_operations::OperationError),

    #[error("database error")]
    Store(#[from] pos_store::StoreError),

    #[error("order rolled back at {phase}")]
    Placement {
        phase: &'static str,
        #[source]
        source: pos_operations::OperationError,
    },

    #[error("failed to read configuration '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("configuration file '{0}' does not exist")]
    ConfigMissing(PathBuf),

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("failed to encode JSON output")]
    Json(#[from] serde_json::Error),

    #[error("password prompt requires a terminal; use --password-stdin")]
    NotATty,

    #[error("no password supplied on stdin")]
    EmptyPassword,

    #[error("user accounts already exist; init only creates the first admin")]
    AlreadyInitialised,
}

pub type Result<T> = std::result::Result<T, CliError>;
