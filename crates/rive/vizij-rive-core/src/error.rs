//! Error types for import and graph validation.

use serde::{Deserialize, Serialize};

/// Outcome of validating one object while an artboard initializes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    Ok,
    /// An id did not resolve to an object of the expected type.
    MissingObject,
    /// The object resolved but breaks a structural rule (e.g. wrong parent type).
    InvalidObject,
}

/// Structural failure that aborts initialization of a single artboard.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum GraphError {
    #[error("object {id}: missing {what}")]
    MissingObject { id: u32, what: String },

    #[error("object {id}: invalid, {reason}")]
    InvalidObject { id: u32, reason: String },

    #[error("cycle detected in graph at object {id}")]
    Cycle { id: u32 },
}

impl GraphError {
    pub fn missing(id: u32, what: impl Into<String>) -> Self {
        GraphError::MissingObject {
            id,
            what: what.into(),
        }
    }

    pub fn invalid(id: u32, reason: impl Into<String>) -> Self {
        GraphError::InvalidObject {
            id,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GraphError::MissingObject { .. } => StatusCode::MissingObject,
            GraphError::InvalidObject { .. } | GraphError::Cycle { .. } => {
                StatusCode::InvalidObject
            }
        }
    }
}

/// Why a file could not be imported at all.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ImportError {
    #[error("unsupported file version {major}.{minor} (runtime supports {supported}.x)")]
    UnsupportedVersion { major: u32, minor: u32, supported: u32 },

    #[error("malformed file: {reason}")]
    Malformed { reason: String },
}

impl ImportError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ImportError::Malformed {
            reason: reason.into(),
        }
    }
}

/// Coarse import status for hosts that only need the category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportResult {
    Success,
    UnsupportedVersion,
    Malformed,
}

impl<T> From<&Result<T, ImportError>> for ImportResult {
    fn from(result: &Result<T, ImportError>) -> Self {
        match result {
            Ok(_) => ImportResult::Success,
            Err(ImportError::UnsupportedVersion { .. }) => ImportResult::UnsupportedVersion,
            Err(ImportError::Malformed { .. }) => ImportResult::Malformed,
        }
    }
}
