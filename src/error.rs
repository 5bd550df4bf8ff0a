// src/error.rs
use thiserror::Error;

/// Failure while extracting fields from a record that passed the malformed-input guard.
///
/// These are batch-fatal: the stream that produced one stops yielding records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{record_type} record '{host_name}': record data has no `{field}`")]
    MissingField {
        record_type: String,
        host_name: String,
        field: &'static str,
    },

    #[error("{record_type} record '{host_name}': invalid `{field}`: {reason}")]
    InvalidField {
        record_type: String,
        host_name: String,
        field: &'static str,
        reason: String,
    },
}

impl NormalizeError {
    pub fn missing(record_type: &str, host_name: Option<&str>, field: &'static str) -> Self {
        NormalizeError::MissingField {
            record_type: record_type.to_string(),
            host_name: host_name.unwrap_or_default().to_string(),
            field,
        }
    }

    pub fn invalid(
        record_type: &str,
        host_name: Option<&str>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        NormalizeError::InvalidField {
            record_type: record_type.to_string(),
            host_name: host_name.unwrap_or_default().to_string(),
            field,
            reason: reason.into(),
        }
    }

    /// Name of the field that could not be extracted.
    pub fn field(&self) -> &'static str {
        match self {
            NormalizeError::MissingField { field, .. } => field,
            NormalizeError::InvalidField { field, .. } => field,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The record source failed before the batch was complete.
    #[error(transparent)]
    Read(anyhow::Error),

    #[error("failed to write output")]
    Io(#[from] std::io::Error),

    #[error("failed to encode JSON")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode CSV")]
    Csv(#[from] csv::Error),
}
