//! The module contains the errors the history engine can return.
//!
//! Every variant is a validation failure: the requested action is blocked and
//! the engine state is left untouched. Network failures are not errors of the
//! engine, they are reported through [`FetchOutcome::Failed`].
//!
//!  [`FetchOutcome::Failed`]: crate::FetchOutcome::Failed
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Please select a full range!")]
    IncompleteRange,
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Invalid preset: {0} days")]
    InvalidPreset(u32),
    #[error("Invalid link: {0}")]
    InvalidLink(String),
}
