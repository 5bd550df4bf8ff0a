#![allow(dead_code)]
//! Shared fixtures: a fluent builder for raw records and canned payloads.

use dnsflat::{NormalizerConfig, RawRecord};
use serde_json::{Value, json};

pub const ZONE: &str = "contoso.com";
pub const SERVER: &str = "DC01";

pub fn config() -> NormalizerConfig {
    NormalizerConfig::new(Some(ZONE.into()), SERVER)
}

/// Fluent builder for [`RawRecord`] fixtures.
pub struct RawRecordBuilder {
    record: RawRecord,
}

impl RawRecordBuilder {
    pub fn new(host_name: &str, record_type: &str, type_code: u16) -> Self {
        Self {
            record: RawRecord {
                distinguished_name: Some(format!(
                    "DC={host_name},DC={ZONE},cn=MicrosoftDNS,DC=DomainDnsZones,DC=contoso,DC=com"
                )),
                host_name: Some(host_name.into()),
                record_class: Some("IN".into()),
                record_type: Some(record_type.into()),
                type_code: Some(type_code),
                timestamp: None,
                time_to_live: Some(json!(3600)),
                record_data: None,
            },
        }
    }

    pub fn data(mut self, data: Value) -> Self {
        self.record.record_data = Some(data);
        self
    }

    pub fn timestamp(mut self, timestamp: Value) -> Self {
        self.record.timestamp = Some(timestamp);
        self
    }

    pub fn ttl(mut self, ttl: Value) -> Self {
        self.record.time_to_live = Some(ttl);
        self
    }

    pub fn without_type(mut self) -> Self {
        self.record.record_type = None;
        self
    }

    pub fn build(self) -> RawRecord {
        self.record
    }
}

/// A well-formed record for `record_type` with its canonical payload.
pub fn well_formed(record_type: &str) -> RawRecord {
    let (host, code, data) = match record_type {
        "A" => ("www", 1, json!({ "IPv4Address": "10.0.0.5" })),
        "AAAA" => ("www", 28, json!({ "IPv6Address": "2001:db8::5" })),
        "CNAME" => ("ftp", 5, json!({ "HostNameAlias": "www.contoso.com." })),
        "TXT" => ("@", 16, json!({ "DescriptiveText": "v=spf1 mx -all" })),
        "NS" => ("@", 2, json!({ "NameServer": "dc01.contoso.com." })),
        "SRV" => (
            "_ldap._tcp",
            33,
            json!({ "DomainName": "dc01.contoso.com.", "Port": 389, "Priority": 0, "Weight": 100 }),
        ),
        "SOA" => (
            "@",
            6,
            json!({
                "ExpireLimit": "1.00:00:00",
                "MinimumTimeToLive": "01:00:00",
                "PrimaryServer": "dc01.contoso.com.",
                "RefreshInterval": "00:15:00",
                "ResponsiblePerson": "hostmaster.contoso.com.",
                "RetryDelay": "00:10:00",
                "SerialNumber": 2024030101u32
            }),
        ),
        "MX" => (
            "@",
            15,
            json!({ "MailExchange": "mail.contoso.com.", "Preference": 10 }),
        ),
        "PTR" => ("5", 12, json!({ "PtrDomainName": "www.contoso.com." })),
        other => panic!("no fixture for {other}"),
    };
    RawRecordBuilder::new(host, record_type, code).data(data).build()
}
