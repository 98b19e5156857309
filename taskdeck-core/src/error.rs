//! Structural input errors.
//!
//! Two-tier policy: per-field parse problems (bad due-date text,
//! unknown priority words) degrade to a neutral contribution and never
//! surface here. Only structurally broken input — a task without a
//! usable title — is an error the caller must handle.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("task at index {index} has an empty title")]
    MissingTitle { index: usize },
}
