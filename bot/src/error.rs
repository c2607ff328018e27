//! Errors specific to planning and execution, layered on top of
//! [`common::GameError`] for store-originated failures.

use thiserror::Error;

use common::GameError;

#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Store(#[from] GameError),

    #[error("pathfinder found no route: {0}")]
    NoRoute(String),

    #[error("plan validation failed: {0}")]
    Validation(String),
}

pub type BotResult<T> = Result<T, BotError>;
