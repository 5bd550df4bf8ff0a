//! Maps raw resource records onto the uniform [`Normalized`] shape.
//!
//! Each input record is handled on its own: records without a type or payload
//! become placeholders, everything else is dispatched on its record type.
//! A record that claims a known type but whose payload cannot be read is a
//! hard error and ends the stream.
use std::borrow::Borrow;

use chrono::TimeDelta;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::NormalizerConfig;
use crate::error::NormalizeError;
use crate::format::{Timestamp, parse_duration, parse_timestamp};
use crate::record::{
    MalformedPlaceholder, Normalized, NormalizedRecord, RecordPayload, SoaData,
};
use crate::source::RawRecord;
use crate::source::types::{is_empty_value, lookup};
use crate::validation::{WellFormed, validate_record};

/// Owner name denoting the zone apex.
pub const ZONE_APEX: &str = "@";
/// FQDN used when host name or zone name is missing.
pub const UNKNOWN_FQDN: &str = "Unknown";

/// Fully-qualified name of a record owner within `zone_name`.
pub fn fqdn(host_name: &str, zone_name: &str) -> String {
    if host_name == ZONE_APEX && !zone_name.is_empty() {
        zone_name.to_string()
    } else if !host_name.is_empty() && !zone_name.is_empty() {
        format!("{host_name}.{zone_name}")
    } else {
        UNKNOWN_FQDN.to_string()
    }
}

/// Normalizes a single raw record.
pub fn normalize_record(
    raw: &RawRecord,
    config: &NormalizerConfig,
) -> Result<Normalized, NormalizeError> {
    let record = match validate_record(raw) {
        Ok(record) => record,
        Err(reason) => {
            warn!(
                %reason,
                host_name = raw.host_name.as_deref().unwrap_or_default(),
                "substituting placeholder for malformed record"
            );
            return Ok(Normalized::Malformed(MalformedPlaceholder {
                dns_server: config.server_name().to_string(),
                reason,
            }));
        }
    };

    let extract = Extractor { record };
    let payload = extract.payload()?;
    let timestamp = extract.timestamp()?;
    let time_to_live = extract.time_to_live()?;

    let normalized = NormalizedRecord {
        distinguished_name: raw.distinguished_name.clone(),
        host_name: raw.host_name.clone(),
        fqdn: fqdn(
            raw.host_name.as_deref().unwrap_or_default(),
            config.zone().unwrap_or_default(),
        ),
        record_class: raw.record_class.clone(),
        record_type: record.record_type.to_string(),
        timestamp,
        time_to_live,
        type_code: raw.type_code,
        dns_server: config.server_name().to_string(),
        payload,
    };
    debug!(
        fqdn = %normalized.fqdn,
        record_type = %normalized.record_type,
        "normalized record"
    );
    Ok(Normalized::Record(normalized))
}

/// Lazily normalizes `records`, one output per input, in input order.
///
/// After the first [`NormalizeError`] the iterator yields that error and then ends.
pub fn normalize<I>(records: I, config: &NormalizerConfig) -> Normalize<'_, I::IntoIter>
where
    I: IntoIterator,
    I::Item: Borrow<RawRecord>,
{
    Normalize {
        records: records.into_iter(),
        config,
        failed: false,
    }
}

pub struct Normalize<'c, I> {
    records: I,
    config: &'c NormalizerConfig,
    failed: bool,
}

impl<I> Iterator for Normalize<'_, I>
where
    I: Iterator,
    I::Item: Borrow<RawRecord>,
{
    type Item = Result<Normalized, NormalizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let raw = self.records.next()?;
        let result = normalize_record(raw.borrow(), self.config);
        if let Err(err) = &result {
            error!(%err, "stopping normalization");
            self.failed = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            let (_, upper) = self.records.size_hint();
            (0, upper)
        }
    }
}

/// Like [`normalize`], for a record source that can itself fail.
///
/// Source errors are passed through in order; the stream ends after the first
/// error of either kind, so a consumer never sees records past a gap.
pub fn try_normalize<I, E>(
    records: I,
    config: &NormalizerConfig,
) -> TryNormalize<'_, I::IntoIter>
where
    I: IntoIterator<Item = Result<RawRecord, E>>,
    E: From<NormalizeError> + std::fmt::Display,
{
    TryNormalize {
        records: records.into_iter(),
        config,
        failed: false,
    }
}

pub struct TryNormalize<'c, I> {
    records: I,
    config: &'c NormalizerConfig,
    failed: bool,
}

impl<I, E> Iterator for TryNormalize<'_, I>
where
    I: Iterator<Item = Result<RawRecord, E>>,
    E: From<NormalizeError> + std::fmt::Display,
{
    type Item = Result<Normalized, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self
            .records
            .next()?
            .and_then(|raw| normalize_record(&raw, self.config).map_err(E::from));
        if let Err(err) = &result {
            error!(%err, "stopping normalization");
            self.failed = true;
        }
        Some(result)
    }
}

/// Field accessors over a well-formed record's payload.
struct Extractor<'a> {
    record: WellFormed<'a>,
}

impl<'a> Extractor<'a> {
    fn payload(&self) -> Result<RecordPayload, NormalizeError> {
        let payload = match self.record.record_type {
            "A" => RecordPayload::A {
                ipv4: self.address("IPv4Address")?,
            },
            "AAAA" => RecordPayload::Aaaa {
                ipv6: self.address("IPv6Address")?,
            },
            "CNAME" => RecordPayload::Cname {
                host_name_alias: self.string("HostNameAlias")?,
            },
            "TXT" => RecordPayload::Txt {
                descriptive_text: self.string("DescriptiveText")?,
            },
            "NS" => RecordPayload::Ns {
                name_server: self.string("NameServer")?,
            },
            "SRV" => RecordPayload::Srv {
                domain_name: self.string("DomainName")?,
                port: self.integer("Port")?,
                priority: self.integer("Priority")?,
                weight: self.integer("Weight")?,
            },
            "SOA" => RecordPayload::Soa(SoaData {
                expire_limit: self.duration("ExpireLimit")?,
                minimum_time_to_live: self.duration("MinimumTimeToLive")?,
                primary_server: self.string("PrimaryServer")?,
                refresh_interval: self.duration("RefreshInterval")?,
                responsible_person: self.string("ResponsiblePerson")?,
                retry_delay: self.duration("RetryDelay")?,
                serial_number: self.integer("SerialNumber")?,
            }),
            "MX" => RecordPayload::Mx {
                mail_exchange: self.string("MailExchange")?,
                preference: self.integer("Preference")?,
            },
            "PTR" => RecordPayload::Ptr {
                ptr_domain_name: self.string("PtrDomainName")?,
            },
            _ => RecordPayload::Unknown {
                text: render_unknown(self.record.record_data),
            },
        };
        Ok(payload)
    }

    fn timestamp(&self) -> Result<Option<Timestamp>, NormalizeError> {
        match self.record.raw.timestamp.as_ref() {
            Some(value) if !is_falsy(value) => parse_timestamp(value)
                .map(Some)
                .map_err(|reason| self.invalid("timestamp", reason)),
            _ => Ok(None),
        }
    }

    fn time_to_live(&self) -> Result<Option<TimeDelta>, NormalizeError> {
        match self.record.raw.time_to_live.as_ref() {
            Some(value) if !is_empty_value(value) => parse_duration(value)
                .map(Some)
                .map_err(|reason| self.invalid("timeToLive", reason)),
            _ => Ok(None),
        }
    }

    fn field(&self, name: &'static str) -> Result<&'a Value, NormalizeError> {
        lookup(self.record.record_data, name)
            .filter(|value| !value.is_null())
            .ok_or_else(|| {
                NormalizeError::missing(self.record.record_type, self.record.host_name(), name)
            })
    }

    fn string(&self, name: &'static str) -> Result<String, NormalizeError> {
        match self.field(name)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(self.invalid(name, format!("expected a string, got {other}"))),
        }
    }

    fn integer<T: TryFrom<u64>>(&self, name: &'static str) -> Result<T, NormalizeError> {
        let value = self.field(name)?;
        let number = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
        .ok_or_else(|| self.invalid(name, format!("expected an unsigned integer, got {value}")))?;

        T::try_from(number).map_err(|_| self.invalid(name, format!("{number} is out of range")))
    }

    fn duration(&self, name: &'static str) -> Result<TimeDelta, NormalizeError> {
        parse_duration(self.field(name)?).map_err(|reason| self.invalid(name, reason))
    }

    fn address<T: std::str::FromStr>(&self, name: &'static str) -> Result<T, NormalizeError> {
        let value = self.field(name)?;
        let text = match value {
            Value::String(s) => Some(s.as_str()),
            Value::Object(_) => lookup(value, "IPAddressToString").and_then(Value::as_str),
            _ => None,
        }
        .ok_or_else(|| self.invalid(name, format!("expected an address, got {value}")))?;

        text.trim()
            .parse::<T>()
            .map_err(|_| self.invalid(name, format!("'{text}' is not a valid address")))
    }

    fn invalid(&self, name: &'static str, reason: impl Into<String>) -> NormalizeError {
        NormalizeError::invalid(self.record.record_type, self.record.host_name(), name, reason)
    }
}

/// Absent-equivalent timestamps: null, empty text, or zero (static records).
fn is_falsy(value: &Value) -> bool {
    is_empty_value(value) || value.as_f64() == Some(0.0)
}

/// `key=value` dump of a payload with no dedicated mapping, keys sorted.
fn render_unknown(data: &Value) -> String {
    match data {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            entries
                .into_iter()
                .map(|(key, value)| format!("{key}={}", render_scalar(value)))
                .collect::<Vec<_>>()
                .join("; ")
        }
        other => render_scalar(other),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
