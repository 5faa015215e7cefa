//! State machines for seminar and TTS order lifecycles
//!
//! Both engines are pure: they validate and apply transitions on in-memory
//! records and never touch storage. Handlers persist the result in a single
//! save after every check has passed.

pub mod seminar;
pub mod tts;

use thiserror::Error;

/// Workflow validation errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Requested state is not one the engine accepts at all
    #[error("Invalid state argument: {0}")]
    InvalidArgument(String),

    /// The (current, requested) pair is not a legal transition
    #[error("Invalid transition: {from} --> {to}")]
    InvalidTransition { from: String, to: String },
}
