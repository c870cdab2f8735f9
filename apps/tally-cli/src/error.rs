//! # Application Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ConfigError ──┐                                                        │
//! │  CoreError ────┼──► AppError ──► code() ──► "error[CODE]: message"      │
//! │  io / json ────┘                  │                                     │
//! │                                   └──► exit_code() ──► process exit     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use serde::Serialize;
use tally_core::CoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad environment configuration
    ConfigError,

    /// Document file missing or unreadable
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Business rule rejected the operation (frozen document, deposit)
    BusinessLogic,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {line}: {reason}")]
    Input { line: usize, reason: String },

    #[error("Cannot serialize output: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Config(_) => ErrorCode::ConfigError,
            AppError::Read { .. } => ErrorCode::NotFound,
            AppError::Parse { .. } | AppError::Input { .. } => ErrorCode::ValidationError,
            AppError::Core(CoreError::DocumentFrozen { .. })
            | AppError::Core(CoreError::InvalidDepositAmount { .. }) => ErrorCode::BusinessLogic,
            AppError::Core(_) => ErrorCode::ValidationError,
            AppError::Serialize(_) => ErrorCode::Internal,
        }
    }

    /// Message suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Core(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.code() {
            ErrorCode::ConfigError => 78,
            ErrorCode::NotFound => 66,
            ErrorCode::ValidationError | ErrorCode::BusinessLogic => 65,
            ErrorCode::Internal => 70,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
