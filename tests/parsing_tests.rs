use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use squarefund::api::parsing::{
    event_header, extract_body, get_header_value, http_method, is_preflight, parse_json_body,
    v_str,
};
use squarefund::core::models::{ConfirmationEmailRequest, EmailKind, HelpRequest};
use squarefund::errors::ServiceError;

#[test]
fn test_http_method_from_rest_and_http_api_events() {
    let rest = json!({ "httpMethod": "POST" });
    let http = json!({ "requestContext": { "http": { "method": "OPTIONS" } } });

    assert_eq!(http_method(&rest), Some("POST"));
    assert_eq!(http_method(&http), Some("OPTIONS"));
    assert_eq!(http_method(&json!({})), None);
    assert!(!is_preflight(&rest));
    assert!(is_preflight(&http));
    assert!(is_preflight(&json!({ "httpMethod": "options" })));
}

#[test]
fn test_headers_match_case_insensitively() {
    let event = json!({ "headers": { "authorization": "Bearer abc", "X-Other": "1" } });

    assert_eq!(event_header(&event, "Authorization"), Some("Bearer abc"));
    assert_eq!(get_header_value(&event["headers"], "x-other"), Some("1"));
    assert_eq!(event_header(&json!({}), "Authorization"), None);
    assert_eq!(v_str(&event, &["headers", "X-Other"]), Some("1"));
}

#[test]
fn test_base64_body_is_decoded() {
    let encoded = general_purpose::STANDARD.encode(r#"{"message":"hi"}"#);
    let event = json!({ "body": encoded, "isBase64Encoded": true });

    assert_eq!(extract_body(&event).unwrap(), r#"{"message":"hi"}"#);
    let request: HelpRequest = parse_json_body(&event).unwrap();
    assert_eq!(request.message().as_deref(), Some("hi"));

    let broken = json!({ "body": "%%%", "isBase64Encoded": true });
    assert!(matches!(
        extract_body(&broken),
        Err(ServiceError::InvalidRequest(_))
    ));
}

#[test]
fn test_inline_object_body_is_accepted() {
    let event = json!({ "body": { "message": "inline" } });

    let request: HelpRequest = parse_json_body(&event).unwrap();
    assert_eq!(request.message().as_deref(), Some("inline"));
}

#[test]
fn test_empty_body_reads_as_empty_object() {
    for event in [json!({}), json!({ "body": null }), json!({ "body": "  " })] {
        let request: HelpRequest = parse_json_body(&event).unwrap();
        assert_eq!(request.message(), None);
    }
}

#[test]
fn test_invalid_json_is_invalid_request() {
    let err = parse_json_body::<HelpRequest>(&json!({ "body": "{nope" })).unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().starts_with("Invalid request: Invalid JSON body"));
}

#[test]
fn test_confirmation_request_validation() {
    let event = json!({ "body": json!({
        "buyerEmail": "b@example.com",
        "buyerName": "Jamie",
        "squares": [7, 12],
        "fundraiserId": "fr-1",
        "emailType": "approved"
    }).to_string() });

    let request: ConfirmationEmailRequest = parse_json_body(&event).unwrap();
    let confirmation = request.validate().unwrap();
    assert_eq!(confirmation.kind, EmailKind::Approved);
    assert_eq!(confirmation.squares, "7,12");

    let event = json!({ "body": json!({ "buyerName": "", "emailType": "approved" }).to_string() });
    let request: ConfirmationEmailRequest = parse_json_body(&event).unwrap();
    match request.validate() {
        Err(ServiceError::MissingFields(fields)) => assert_eq!(
            fields,
            vec!["buyerEmail", "buyerName", "squares", "fundraiserId"]
        ),
        other => panic!("expected missing fields, got {other:?}"),
    }
}
