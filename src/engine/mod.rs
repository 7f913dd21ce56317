//! Request surface and the world-task orchestrator

pub mod orchestrator;
pub mod request;

pub use orchestrator::{Engine, EngineConfig, EngineHandle, EngineStatus};
pub use request::{BuildRequest, DigLimits, DigRequest, DigShape, Facing8};
