use std::collections::BTreeMap;

use custody_canonical::{
    canonical_bytes, compute_digest, BatchId, Canonicalizer, Digest, HygieneReport,
    HygieneStatus, HygieneWarning, ProfileId,
};
use serde_json::json;

#[test]
fn digest_serializes_as_plain_string() {
    let digest = Digest::from_bytes(&[0u8; 32]);
    assert_eq!(
        serde_json::to_string(&digest).unwrap(),
        format!("\"{}\"", "0".repeat(64))
    );
}

#[test]
fn batch_id_is_transparent_on_the_wire() {
    let id = BatchId::parse("B1718035200000").unwrap();
    assert_eq!(serde_json::to_value(&id).unwrap(), json!("B1718035200000"));
}

#[test]
fn hygiene_report_matches_expected_shape() {
    let report = HygieneReport {
        status: HygieneStatus::Ok,
        warnings: vec![HygieneWarning::new("NonFiniteNumber")],
        metrics: BTreeMap::new(),
        profile_id: ProfileId::new("example_profile_0001".into()),
    };

    let serialized = serde_json::to_value(&report).unwrap();
    let expected = json!({
        "status": "Ok",
        "warnings": ["NonFiniteNumber"],
        "metrics": {},
        "profile_id": "example_profile_0001"
    });

    assert_eq!(serialized, expected);
}

#[test]
fn canonicalizer_produces_ordered_bytes() {
    let profile = ProfileId::parse("profileid000000001").unwrap();
    let canonicalizer = Canonicalizer::new(profile);
    let value = json!({"b": 1, "a": {"nested": 2}});
    let result = canonicalizer.canonicalize(&value).unwrap();
    assert_eq!(
        String::from_utf8(result.bytes).unwrap(),
        r#"{"a":{"nested":2},"b":1}"#
    );
    assert_eq!(result.report.status, HygieneStatus::Ok);
}

#[test]
fn block_shaped_array_keeps_field_order() {
    let canonicalizer = Canonicalizer::default_profile();
    let fields = json!([
        0,
        "2024-06-10T12:00:00.000Z",
        "B1",
        "IOT_UPDATE",
        {"temperature": 20, "humidity": 50},
        "0"
    ]);
    let bytes = canonical_bytes(&fields, &canonicalizer).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"[0,"2024-06-10T12:00:00.000Z","B1","IOT_UPDATE",{"humidity":50,"temperature":20},"0"]"#
    );
}

#[test]
fn digest_is_stable_across_key_order() {
    let canonicalizer = Canonicalizer::default_profile();
    let a = compute_digest(
        b"golden\0",
        &json!({"lat": 1.5, "lng": -3, "location": "Port"}),
        &canonicalizer,
    )
    .unwrap();
    let b = compute_digest(
        b"golden\0",
        &json!({"location": "Port", "lng": -3, "lat": 1.5}),
        &canonicalizer,
    )
    .unwrap();
    assert_eq!(a, b);
}
