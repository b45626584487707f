use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reconciling remote resources with the plan file
#[derive(Error, Debug)]
pub enum ImportError {
    /// Plan file could not be opened, read, written or closed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State file could not be read
    #[error("Unable to read state file {}: {reason}", .path.display())]
    StateRead { path: PathBuf, reason: String },

    /// State file is not valid state JSON
    #[error("Unable to decode state file {}: {source}", .path.display())]
    StateDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// State tool command failed
    #[error("Command '{command}' failed (exit code {}): {stderr}", exit_code_label(.exit_code))]
    ExecutorFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Resource definitions could not be fetched from the importer
    #[error("Resource source error: {0}")]
    Source(String),
}

impl ImportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

pub type Result<T> = std::result::Result<T, ImportError>;
