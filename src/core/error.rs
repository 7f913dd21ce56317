//! Error types for the terraforge engine

use thiserror::Error;

/// Main error type for the engine
///
/// Only request-level errors surface to callers, and only before any
/// world mutation begins. Per-block failures (parse, clear, restore)
/// are absorbed into counters by the component that hits them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid blueprint id: {0:?}")]
    InvalidBlueprintId(String),

    #[error("blueprint not found: {0}")]
    BlueprintNotFound(String),

    #[error("blueprint error: {0}")]
    Blueprint(String),

    #[error("block spec error: {0}")]
    Spec(String),

    #[error("invalid request: {0}")]
    Request(String),

    #[error("world error: {0}")]
    World(String),

    #[error("world handle is no longer valid")]
    WorldGone,

    #[error("nothing to undo")]
    UndoEmpty,

    #[error("engine is not running")]
    EngineStopped,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
