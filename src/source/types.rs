use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resource record as emitted by the DNS server management API.
///
/// Every attribute is optional: the upstream source may hand over partial
/// objects, and the normalizer decides what counts as malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, alias = "DistinguishedName")]
    pub distinguished_name: Option<String>,
    #[serde(default, alias = "HostName")]
    pub host_name: Option<String>, // "@" marks the zone apex
    #[serde(default, alias = "RecordClass")]
    pub record_class: Option<String>, // "IN"
    #[serde(default, alias = "RecordType")]
    pub record_type: Option<String>, // "A", "SRV", ...
    #[serde(rename = "type", default, alias = "Type")]
    pub type_code: Option<u16>,
    #[serde(default, alias = "Timestamp")]
    pub timestamp: Option<Value>, // absent for static records
    #[serde(default, alias = "TimeToLive")]
    pub time_to_live: Option<Value>,
    #[serde(default, alias = "RecordData")]
    pub record_data: Option<Value>,
}

impl RawRecord {
    /// Record type discriminant, `None` when absent or empty.
    pub fn record_type(&self) -> Option<&str> {
        self.record_type.as_deref().filter(|t| !t.is_empty())
    }

    /// Payload object, `None` when absent, null or empty.
    pub fn record_data(&self) -> Option<&Value> {
        self.record_data.as_ref().filter(|data| !is_empty_value(data))
    }
}

/// Looks up `name` in a payload object, ignoring ASCII case.
pub(crate) fn lookup<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    map.get(name).or_else(|| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
