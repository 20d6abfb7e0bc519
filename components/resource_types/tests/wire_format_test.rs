// Wire format tests for records and tracker messages

use pretty_assertions::assert_eq;
use resource_types::*;
use serde_json::json;

#[test]
fn test_record_serialization_uses_type_key() {
    let record = ResourceRecord::new("17", "https://example.com/app.js", ResourceType::Script, 420, 33);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(
        json,
        json!({
            "id": "17",
            "name": "app.js",
            "url": "https://example.com/app.js",
            "type": "script",
            "size": 420,
            "time": 33
        })
    );
}

#[test]
fn test_record_deserialization_normalizes_type() {
    let json_str = r#"{"id":"9","name":"data","url":"https://api.example.com/data","type":"xmlhttprequest","size":10,"time":5}"#;
    let record: ResourceRecord = serde_json::from_str(json_str).unwrap();

    assert_eq!(record.resource_type, ResourceType::Xhr);
    assert_eq!(record.name, "data");
}

#[test]
fn test_record_deserialization_unknown_type_and_missing_fields() {
    let json_str = r#"{"id":"3","url":"https://example.com/","type":"ping"}"#;
    let record: ResourceRecord = serde_json::from_str(json_str).unwrap();

    assert_eq!(record.resource_type, ResourceType::Document);
    assert_eq!(record.name, "");
    assert_eq!(record.size, 0);
    assert_eq!(record.time, 0);
}

#[test]
fn test_resources_response_parses() {
    let payload = json!({
        "resources": [
            {"id": "1", "name": "a.js", "url": "https://x.test/a.js", "type": "script", "size": 5000, "time": 100},
            {"id": "2", "name": "b.png", "url": "https://x.test/b.png", "type": "image", "size": 200000, "time": 50}
        ]
    });

    let response: TrackerResponse = serde_json::from_value(payload).unwrap();
    match response {
        TrackerResponse::Resources { resources } => {
            assert_eq!(resources.len(), 2);
            assert_eq!(resources[1].resource_type, ResourceType::Image);
        }
        other => panic!("expected resources, got {:?}", other),
    }
}

#[test]
fn test_null_fields_read_as_missing() {
    let json_str = r#"{"id":"4","name":null,"url":"https://x.test/lib/c.css","type":"stylesheet","size":null,"time":12}"#;
    let record: ResourceRecord = serde_json::from_str(json_str).unwrap();

    assert_eq!(record.name, "");
    assert_eq!(record.size, 0);
    assert_eq!(record.time, 12);
}

#[test]
fn test_malformed_record_does_not_sink_snapshot() {
    let payload = json!({
        "resources": [
            {"id": "1", "name": "a.js", "url": "https://x.test/a.js", "type": "script", "size": 5000, "time": 100},
            {"id": "2", "url": "https://x.test/b.png", "type": "image", "size": "big", "time": 50},
            {"name": "no-id.js", "url": "https://x.test/no-id.js", "type": "script"},
            {"id": "4", "name": null, "url": "https://x.test/d.woff2", "type": "font", "size": 7, "time": 1}
        ]
    });

    let response: TrackerResponse = serde_json::from_value(payload).unwrap();
    match response {
        TrackerResponse::Resources { resources } => {
            let ids: Vec<&str> = resources.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, vec!["1", "4"]);
            assert_eq!(resources[1].name, "");
            assert_eq!(resources[1].resource_type, ResourceType::Font);
        }
        other => panic!("expected resources, got {:?}", other),
    }
}

#[test]
fn test_cleared_and_error_responses_parse() {
    let cleared: TrackerResponse = serde_json::from_str(r#"{"status":"cleared"}"#).unwrap();
    assert_eq!(cleared, TrackerResponse::cleared());

    let failure: TrackerResponse =
        serde_json::from_str(r#"{"error":{"code":-32600,"message":"Invalid Request"}}"#).unwrap();
    assert_eq!(failure, TrackerResponse::failure(ProtocolError::invalid_request()));
}

#[test]
fn test_unknown_action_is_rejected() {
    let result = serde_json::from_str::<TrackerRequest>(r#"{"action":"deleteEverything"}"#);
    assert!(result.is_err());
}
