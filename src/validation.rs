use serde_json::Value;

use crate::source::RawRecord;

/// Why a raw record is replaced by a placeholder instead of being normalized.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("record has no record type")]
    MissingRecordType,
    #[error("record has no record data")]
    MissingRecordData,
}

/// A raw record that carries both a type discriminant and a non-empty payload.
#[derive(Debug, Clone, Copy)]
pub struct WellFormed<'a> {
    pub raw: &'a RawRecord,
    pub record_type: &'a str,
    pub record_data: &'a Value,
}

impl<'a> WellFormed<'a> {
    pub fn host_name(&self) -> Option<&'a str> {
        self.raw.host_name.as_deref()
    }
}

pub fn validate_record(raw: &RawRecord) -> Result<WellFormed<'_>, MalformedReason> {
    let Some(record_type) = raw.record_type() else {
        return Err(MalformedReason::MissingRecordType);
    };
    let Some(record_data) = raw.record_data() else {
        return Err(MalformedReason::MissingRecordData);
    };

    Ok(WellFormed {
        raw,
        record_type,
        record_data,
    })
}
