use herdgate_types::RecordKind;
use pretty_assertions::assert_eq;
use serde_json::json;

// ── Locator ──

#[test]
fn record_path_for_cow() {
    assert_eq!(RecordKind::Cow.record_path("abc123"), "Cow/abc123");
}

#[test]
fn record_path_for_milk() {
    assert_eq!(RecordKind::Milk.record_path("m-9"), "Milk/m-9");
}

#[test]
fn collection_paths() {
    assert_eq!(RecordKind::Cow.collection_path(), "Cow");
    assert_eq!(RecordKind::Milk.collection_path(), "Milk");
}

// ── Parsing ──

#[test]
fn parse_valid_kinds() {
    assert_eq!("Cow".parse::<RecordKind>().unwrap(), RecordKind::Cow);
    assert_eq!("Milk".parse::<RecordKind>().unwrap(), RecordKind::Milk);
}

#[test]
fn parse_rejects_unknown_kind() {
    assert!("Goat".parse::<RecordKind>().is_err());
    // Case-sensitive, matching the external collection names exactly
    assert!("cow".parse::<RecordKind>().is_err());
    assert!("".parse::<RecordKind>().is_err());
}

// ── Legacy payload inference ──

#[test]
fn mobile_field_implies_cow() {
    let payload = json!({ "name": "Bella", "mobile": "+15551234" });
    assert_eq!(RecordKind::infer(&payload), Some(RecordKind::Cow));
}

#[test]
fn mobile_number_field_implies_milk() {
    let payload = json!({ "mobileNumber": "+15554321", "litres": 12 });
    assert_eq!(RecordKind::infer(&payload), Some(RecordKind::Milk));
}

#[test]
fn inference_prefers_mobile_when_both_present() {
    let payload = json!({ "mobile": "a", "mobileNumber": "b" });
    assert_eq!(RecordKind::infer(&payload), Some(RecordKind::Cow));
}

#[test]
fn inference_fails_without_marker_fields() {
    assert_eq!(RecordKind::infer(&json!({ "name": "Bella" })), None);
    assert_eq!(RecordKind::infer(&json!({})), None);
}

#[test]
fn null_marker_does_not_count() {
    let payload = json!({ "mobile": null });
    assert_eq!(RecordKind::infer(&payload), None);
}

#[test]
fn empty_or_zero_marker_does_not_count() {
    assert_eq!(RecordKind::infer(&json!({ "mobile": "" })), None);
    assert_eq!(RecordKind::infer(&json!({ "mobile": 0 })), None);
    assert_eq!(RecordKind::infer(&json!({ "mobileNumber": false })), None);
}

#[test]
fn empty_mobile_falls_through_to_mobile_number() {
    let payload = json!({ "mobile": "", "mobileNumber": "+15554321" });
    assert_eq!(RecordKind::infer(&payload), Some(RecordKind::Milk));
}

// ── Serde ──

#[test]
fn kind_serializes_as_collection_name() {
    assert_eq!(serde_json::to_string(&RecordKind::Cow).unwrap(), "\"Cow\"");
    assert_eq!(serde_json::to_string(&RecordKind::Milk).unwrap(), "\"Milk\"");
}

#[test]
fn kind_deserializes_from_collection_name() {
    let kind: RecordKind = serde_json::from_str("\"Milk\"").unwrap();
    assert_eq!(kind, RecordKind::Milk);
}
