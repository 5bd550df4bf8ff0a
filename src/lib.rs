//! Crate entrypoint: flattens DNS server resource records into one uniform shape.
//!
//! Raw records come in through [`source`], are checked by [`validation`],
//! mapped by [`normalizer`] into [`record::Normalized`] values, and written
//! out by [`export`].

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod normalizer;
pub mod record;
pub mod source;
pub mod validation;

pub use config::NormalizerConfig;
pub use error::{ExportError, NormalizeError};
pub use normalizer::{fqdn, normalize, normalize_record, try_normalize};
pub use record::{Normalized, NormalizedRecord, RecordPayload};
pub use source::RawRecord;
