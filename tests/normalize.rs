mod common;

use assert_json_diff::assert_json_eq;
use common::*;
use dnsflat::{
    NormalizeError, Normalized, NormalizerConfig, normalize, normalize_record,
    record::{BASE_FIELDS, FieldValue},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn field_names(record: &Normalized) -> Vec<&'static str> {
    record.fields().into_iter().map(|(name, _)| name).collect()
}

fn extension_names(record: &Normalized) -> Vec<&'static str> {
    field_names(record).split_off(BASE_FIELDS.len())
}

#[test]
fn one_output_per_input_in_order() {
    let records: Vec<_> = ["A", "MX", "NS", "TXT", "PTR", "CNAME", "SRV", "AAAA", "SOA"]
        .into_iter()
        .map(well_formed)
        .chain([RawRecordBuilder::new("bad", "A", 1).build()])
        .collect();

    let config = config();
    let out: Vec<Normalized> = normalize(&records, &config)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(out.len(), records.len());
    for (raw, normalized) in records.iter().zip(&out).take(records.len() - 1) {
        assert_eq!(normalized.record_type(), raw.record_type.as_deref());
    }
    assert!(out.last().unwrap().is_malformed());
}

#[rstest]
#[case::missing_type(RawRecordBuilder::new("www", "A", 1).data(json!({ "IPv4Address": "10.0.0.1" })).without_type().build())]
#[case::missing_data(RawRecordBuilder::new("www", "A", 1).build())]
#[case::null_data(RawRecordBuilder::new("www", "A", 1).data(Value::Null).build())]
#[case::empty_data(RawRecordBuilder::new("www", "A", 1).data(json!({})).build())]
fn malformed_records_become_placeholders(#[case] raw: dnsflat::RawRecord) {
    let normalized = normalize_record(&raw, &config()).unwrap();

    assert!(normalized.is_malformed());
    assert_json_eq!(
        serde_json::to_value(&normalized).unwrap(),
        json!({
            "distinguishedName": null,
            "hostName": null,
            "recordClass": null,
            "recordType": null,
            "timestamp": null,
            "timeToLive": null,
            "type": null,
            "dnsServer": SERVER,
        })
    );
}

#[test]
fn malformed_record_does_not_stop_the_batch() {
    let records = vec![
        RawRecordBuilder::new("gone", "A", 1).build(),
        well_formed("A"),
    ];
    let config = config();
    let out: Vec<_> = normalize(records, &config).collect();

    assert_eq!(out.len(), 2);
    assert!(out[0].as_ref().unwrap().is_malformed());
    assert_eq!(out[1].as_ref().unwrap().fqdn(), Some("www.contoso.com"));
}

#[rstest]
#[case("@", Some("contoso.com"), "contoso.com")]
#[case("www", Some("contoso.com"), "www.contoso.com")]
#[case("www", Some(""), "Unknown")]
#[case("www", None, "Unknown")]
#[case("", Some("contoso.com"), "Unknown")]
fn fqdn_is_derived_from_host_and_zone(
    #[case] host: &str,
    #[case] zone: Option<&str>,
    #[case] expected: &str,
) {
    let raw = RawRecordBuilder::new(host, "NS", 2)
        .data(json!({ "NameServer": "dc01.contoso.com." }))
        .build();
    let config = NormalizerConfig::new(zone.map(Into::into), SERVER);

    let normalized = normalize_record(&raw, &config).unwrap();
    assert_eq!(normalized.fqdn(), Some(expected));
}

#[rstest]
#[case::a("A", &["ipv4"])]
#[case::aaaa("AAAA", &["ipv6"])]
#[case::cname("CNAME", &["hostNameAlias"])]
#[case::txt("TXT", &["descriptiveText"])]
#[case::ns("NS", &["nameServer"])]
#[case::srv("SRV", &["domainName", "port", "priority", "weight"])]
#[case::soa("SOA", &[
    "expireLimit",
    "minimumTimeToLive",
    "primaryServer",
    "refreshInterval",
    "responsiblePerson",
    "retryDelay",
    "serialNumber",
])]
#[case::mx("MX", &["mailExchange", "preference"])]
#[case::ptr("PTR", &["ptrDomainName"])]
fn base_fields_then_type_fields(#[case] record_type: &str, #[case] expected: &[&str]) {
    let normalized = normalize_record(&well_formed(record_type), &config()).unwrap();

    let names = field_names(&normalized);
    assert_eq!(&names[..BASE_FIELDS.len()], &BASE_FIELDS[..]);
    assert_eq!(extension_names(&normalized), expected.to_vec());
}

#[rstest]
#[case::a("A", json!({ "ipv4": "10.0.0.5" }))]
#[case::aaaa("AAAA", json!({ "ipv6": "2001:db8::5" }))]
#[case::cname("CNAME", json!({ "hostNameAlias": "www.contoso.com." }))]
#[case::txt("TXT", json!({ "descriptiveText": "v=spf1 mx -all" }))]
#[case::ns("NS", json!({ "nameServer": "dc01.contoso.com." }))]
#[case::srv("SRV", json!({ "domainName": "dc01.contoso.com.", "port": 389, "priority": 0, "weight": 100 }))]
#[case::soa("SOA", json!({
    "expireLimit": "1.00:00:00",
    "minimumTimeToLive": "01:00:00",
    "primaryServer": "dc01.contoso.com.",
    "refreshInterval": "00:15:00",
    "responsiblePerson": "hostmaster.contoso.com.",
    "retryDelay": "00:10:00",
    "serialNumber": 2024030101u32,
}))]
#[case::mx("MX", json!({ "mailExchange": "mail.contoso.com.", "preference": 10 }))]
#[case::ptr("PTR", json!({ "ptrDomainName": "www.contoso.com." }))]
fn type_fields_are_copied_from_payload(#[case] record_type: &str, #[case] expected: Value) {
    let raw = well_formed(record_type);
    let normalized = normalize_record(&raw, &config()).unwrap();

    let mut value = serde_json::to_value(&normalized).unwrap();
    let object = value.as_object_mut().unwrap();
    for base in BASE_FIELDS {
        assert!(object.remove(base).is_some(), "missing base field {base}");
    }
    assert_json_eq!(value, expected);
}

#[test]
fn base_fields_pass_through() {
    let raw = well_formed("A");
    let normalized = normalize_record(&raw, &config()).unwrap();
    let fields = normalized.fields();

    assert_eq!(
        fields[0].1,
        FieldValue::Text(raw.distinguished_name.clone().unwrap())
    );
    assert_eq!(fields[1].1, FieldValue::Text("www".into()));
    assert_eq!(fields[3].1, FieldValue::Text("IN".into()));
    assert_eq!(fields[7].1, FieldValue::Integer(1));
    assert_eq!(fields[8].1, FieldValue::Text(SERVER.into()));
}

#[test]
fn unknown_type_renders_whole_payload() {
    let raw = RawRecordBuilder::new("@", "SPF", 99)
        .data(json!({ "DescriptiveText": "v=spf1 -all" }))
        .build();
    let normalized = normalize_record(&raw, &config()).unwrap();

    assert_eq!(extension_names(&normalized), vec!["unknownRecordType"]);
    let value = serde_json::to_value(&normalized).unwrap();
    assert_eq!(value["recordType"], json!("SPF"));
    assert_eq!(value["unknownRecordType"], json!("DescriptiveText=v=spf1 -all"));
}

#[test]
fn apex_ns_record_end_to_end() {
    let raw = RawRecordBuilder::new("@", "NS", 2)
        .data(json!({ "NameServer": "dc01.contoso.com." }))
        .ttl(json!("01:00:00"))
        .build();
    let config = NormalizerConfig::new(Some("contoso.com".into()), "DC01");

    let normalized = normalize_record(&raw, &config).unwrap();
    assert_json_eq!(
        serde_json::to_value(&normalized).unwrap(),
        json!({
            "distinguishedName": raw.distinguished_name,
            "hostName": "@",
            "fqdn": "contoso.com",
            "recordClass": "IN",
            "recordType": "NS",
            "timestamp": null,
            "timeToLive": "01:00:00",
            "type": 2,
            "dnsServer": "DC01",
            "nameServer": "dc01.contoso.com.",
        })
    );
}

#[test]
fn aging_timestamp_is_rendered_round_trip() {
    let raw = RawRecordBuilder::new("host1", "A", 1)
        .data(json!({ "IPv4Address": "10.0.0.9" }))
        .timestamp(json!("2024-03-01T08:00:00"))
        .ttl(json!({ "Ticks": 12_000_000_000_i64 }))
        .build();

    let value = serde_json::to_value(normalize_record(&raw, &config()).unwrap()).unwrap();
    assert_eq!(value["timestamp"], json!("2024-03-01T08:00:00.0000000"));
    assert_eq!(value["timeToLive"], json!("00:20:00"));
}

#[test]
fn batch_stops_at_unreadable_record() {
    let records = vec![
        well_formed("A"),
        RawRecordBuilder::new("@", "MX", 15)
            .data(json!({ "MailExchange": "mail.contoso.com." }))
            .build(),
        well_formed("CNAME"),
    ];
    let config = config();

    let mut produced = Vec::new();
    let mut failure = None;
    for result in normalize(&records, &config) {
        match result {
            Ok(record) => produced.push(record),
            Err(err) => failure = Some(err),
        }
    }

    assert_eq!(produced.len(), 1);
    assert_eq!(produced[0].record_type(), Some("A"));
    assert!(matches!(
        failure,
        Some(NormalizeError::MissingField { field: "Preference", .. })
    ));

    let collected: Result<Vec<_>, _> = normalize(&records, &config).collect();
    assert!(collected.is_err());
}
