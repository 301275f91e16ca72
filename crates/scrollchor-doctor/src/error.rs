use std::path::PathBuf;

use scrollchor_core::DefinitionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("path not found: {}", path.display())]
    MissingPath { path: PathBuf },

    #[error("failed to parse page definition {}: {source}", path.display())]
    PageJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid page definition: {0}")]
    Definition(#[from] DefinitionError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl DoctorError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::InvalidArgument { .. } => 2,
            Self::MissingPath { .. } => 3,
            Self::PageJson { .. } | Self::Definition(_) => 4,
            Self::Json(_) | Self::Io(_) => 10,
        }
    }
}

pub type Result<T> = std::result::Result<T, DoctorError>;
