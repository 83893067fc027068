//! Shared error taxonomy. Library modules define their own `thiserror` enums
//! for domain-specific failures; this is the umbrella type the application
//! driver (`main.rs`, `Engine::run`) collects everything into.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{component} failed: {error}")]
    SystemError { component: &'static str, error: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("settings file error: {0}")]
    SettingsError(#[from] serde_json::Error),

    #[error("GPU buffer access failed: {0}")]
    BufferAccess(String),

    #[error("GPU operation failed: {0}")]
    GpuOperationFailed(String),

    #[error("{0}")]
    Internal(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Mirrors the engine's existing `.context("...")`-on-`Option` convenience,
/// used at call sites that currently do `opt.ok_or_else(...)`.
pub trait OptionExt<T> {
    fn engine_context(self, msg: &'static str) -> EngineResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn engine_context(self, msg: &'static str) -> EngineResult<T> {
        self.ok_or_else(|| EngineError::Internal(msg.to_string()))
    }
}

/// Thin alias over `anyhow::Context` kept for call sites migrated from the
/// old per-module error types to `anyhow` at the application boundary.
pub use anyhow::Context as ErrorContext;
