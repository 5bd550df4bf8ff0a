//! Normalized record model.
//!
//! A [`NormalizedRecord`] is a fixed set of base fields plus one
//! [`RecordPayload`] variant. It is flattened into ordered `(name, value)`
//! pairs only at the export boundary, see [`Normalized::fields`]. Exporters
//! derive their columns from first-seen field order, so the order produced
//! here is part of the output format.
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::TimeDelta;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::format::{Timestamp, format_duration};
use crate::validation::MalformedReason;

/// Base field names, in output order.
pub const BASE_FIELDS: [&str; 9] = [
    "distinguishedName",
    "hostName",
    "fqdn",
    "recordClass",
    "recordType",
    "timestamp",
    "timeToLive",
    "type",
    "dnsServer",
];

/// Value of one flattened output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(u64),
}

impl FieldValue {
    fn text(value: Option<&str>) -> Self {
        value.map_or(FieldValue::Null, |s| FieldValue::Text(s.to_string()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    /// Null renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Integer(n) => serializer.serialize_u64(*n),
        }
    }
}

/// Start-of-authority payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaData {
    pub expire_limit: TimeDelta,
    pub minimum_time_to_live: TimeDelta,
    pub primary_server: String,
    pub refresh_interval: TimeDelta,
    pub responsible_person: String,
    pub retry_delay: TimeDelta,
    pub serial_number: u32,
}

/// Type-specific record payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordPayload {
    A {
        ipv4: Ipv4Addr,
    },
    Aaaa {
        ipv6: Ipv6Addr,
    },
    Cname {
        host_name_alias: String,
    },
    Txt {
        descriptive_text: String,
    },
    Ns {
        name_server: String,
    },
    Srv {
        domain_name: String,
        port: u16,
        priority: u16,
        weight: u16,
    },
    Soa(SoaData),
    Mx {
        mail_exchange: String,
        preference: u16,
    },
    Ptr {
        ptr_domain_name: String,
    },
    /// Any record type without a dedicated mapping; holds a rendering of the whole payload.
    Unknown {
        text: String,
    },
}

impl RecordPayload {
    /// Extension fields appended after the base fields, in output order.
    pub fn extension_fields(&self) -> Vec<(&'static str, FieldValue)> {
        let text = |s: &str| FieldValue::Text(s.to_string());
        let duration = |d: &TimeDelta| FieldValue::Text(format_duration(*d));

        match self {
            RecordPayload::A { ipv4 } => vec![("ipv4", FieldValue::Text(ipv4.to_string()))],
            RecordPayload::Aaaa { ipv6 } => vec![("ipv6", FieldValue::Text(ipv6.to_string()))],
            RecordPayload::Cname { host_name_alias } => {
                vec![("hostNameAlias", text(host_name_alias))]
            }
            RecordPayload::Txt { descriptive_text } => {
                vec![("descriptiveText", text(descriptive_text))]
            }
            RecordPayload::Ns { name_server } => vec![("nameServer", text(name_server))],
            RecordPayload::Srv {
                domain_name,
                port,
                priority,
                weight,
            } => vec![
                ("domainName", text(domain_name)),
                ("port", FieldValue::Integer(u64::from(*port))),
                ("priority", FieldValue::Integer(u64::from(*priority))),
                ("weight", FieldValue::Integer(u64::from(*weight))),
            ],
            RecordPayload::Soa(soa) => vec![
                ("expireLimit", duration(&soa.expire_limit)),
                ("minimumTimeToLive", duration(&soa.minimum_time_to_live)),
                ("primaryServer", text(&soa.primary_server)),
                ("refreshInterval", duration(&soa.refresh_interval)),
                ("responsiblePerson", text(&soa.responsible_person)),
                ("retryDelay", duration(&soa.retry_delay)),
                ("serialNumber", FieldValue::Integer(u64::from(soa.serial_number))),
            ],
            RecordPayload::Mx {
                mail_exchange,
                preference,
            } => vec![
                ("mailExchange", text(mail_exchange)),
                ("preference", FieldValue::Integer(u64::from(*preference))),
            ],
            RecordPayload::Ptr { ptr_domain_name } => {
                vec![("ptrDomainName", text(ptr_domain_name))]
            }
            RecordPayload::Unknown { text: rendered } => {
                vec![("unknownRecordType", text(rendered))]
            }
        }
    }
}

/// A well-formed record in the uniform output shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub distinguished_name: Option<String>,
    pub host_name: Option<String>,
    pub fqdn: String,
    pub record_class: Option<String>,
    pub record_type: String,
    pub timestamp: Option<Timestamp>,
    pub time_to_live: Option<TimeDelta>,
    pub type_code: Option<u16>,
    pub dns_server: String,
    pub payload: RecordPayload,
}

impl NormalizedRecord {
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut fields = vec![
            ("distinguishedName", FieldValue::text(self.distinguished_name.as_deref())),
            ("hostName", FieldValue::text(self.host_name.as_deref())),
            ("fqdn", FieldValue::Text(self.fqdn.clone())),
            ("recordClass", FieldValue::text(self.record_class.as_deref())),
            ("recordType", FieldValue::Text(self.record_type.clone())),
            (
                "timestamp",
                self.timestamp
                    .map_or(FieldValue::Null, |ts| FieldValue::Text(ts.to_string())),
            ),
            (
                "timeToLive",
                self.time_to_live
                    .map_or(FieldValue::Null, |ttl| FieldValue::Text(format_duration(ttl))),
            ),
            (
                "type",
                self.type_code
                    .map_or(FieldValue::Null, |t| FieldValue::Integer(u64::from(t))),
            ),
            ("dnsServer", FieldValue::Text(self.dns_server.clone())),
        ];
        fields.extend(self.payload.extension_fields());
        fields
    }
}

/// Stand-in for a raw record that had no type or no payload.
///
/// Carries only `dnsServer`; every other base field except `fqdn` is emitted as null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedPlaceholder {
    pub dns_server: String,
    pub reason: MalformedReason,
}

impl MalformedPlaceholder {
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        BASE_FIELDS
            .iter()
            .filter(|name| **name != "fqdn")
            .map(|name| match *name {
                "dnsServer" => (*name, FieldValue::Text(self.dns_server.clone())),
                _ => (*name, FieldValue::Null),
            })
            .collect()
    }
}

/// One output item per input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Record(NormalizedRecord),
    Malformed(MalformedPlaceholder),
}

impl Normalized {
    /// Flattened `(name, value)` pairs in output order.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        match self {
            Normalized::Record(record) => record.fields(),
            Normalized::Malformed(placeholder) => placeholder.fields(),
        }
    }

    pub fn record_type(&self) -> Option<&str> {
        match self {
            Normalized::Record(record) => Some(&record.record_type),
            Normalized::Malformed(_) => None,
        }
    }

    pub fn fqdn(&self) -> Option<&str> {
        match self {
            Normalized::Record(record) => Some(&record.fqdn),
            Normalized::Malformed(_) => None,
        }
    }

    pub fn dns_server(&self) -> &str {
        match self {
            Normalized::Record(record) => &record.dns_server,
            Normalized::Malformed(placeholder) => &placeholder.dns_server,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Normalized::Malformed(_))
    }

    /// Whether this output passes a record-type filter.
    ///
    /// An empty filter passes everything. Otherwise only records whose type is
    /// listed pass; placeholders have no type and never do.
    pub fn matches_types<S: AsRef<str>>(&self, wanted: &[S]) -> bool {
        wanted.is_empty()
            || self
                .record_type()
                .is_some_and(|t| wanted.iter().any(|w| w.as_ref() == t))
    }
}

fn serialize_fields<S: Serializer>(
    fields: Vec<(&'static str, FieldValue)>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (name, value) in &fields {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_fields(self.fields(), serializer)
    }
}

impl Serialize for MalformedPlaceholder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_fields(self.fields(), serializer)
    }
}

impl Serialize for Normalized {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_fields(self.fields(), serializer)
    }
}
