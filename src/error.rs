//! Top-level error type for console commands

use thiserror::Error;

use crate::catalog::FormError;
use crate::client::ApiError;
use crate::config::ConfigError;
use crate::playground::PlaygroundError;

/// Errors that can surface from a console command
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Playground(#[from] PlaygroundError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Template lint reported problems
    #[error("lint found {count} problem(s)")]
    Lint { count: usize },
}
