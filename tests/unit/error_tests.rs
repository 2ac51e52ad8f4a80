use data_adapters::mcp::payload::{error_body, error_result};
use data_adapters::{AppError, ErrorKind, ToolError};
use serde_json::json;

#[test]
fn tool_error_display_includes_kind() {
    let err = ToolError::not_found("No data found for symbol: ZZZZ");
    assert_eq!(err.to_string(), "not_found: No data found for symbol: ZZZZ");
}

#[test]
fn error_kinds_serialize_snake_case() {
    let kinds = [
        (ErrorKind::AuthenticationFailure, "authentication_failure"),
        (ErrorKind::NotFound, "not_found"),
        (ErrorKind::RateLimited, "rate_limited"),
        (ErrorKind::Unavailable, "unavailable"),
        (ErrorKind::InvalidRequest, "invalid_request"),
        (ErrorKind::UpstreamError, "upstream_error"),
    ];
    for (kind, label) in kinds {
        assert_eq!(serde_json::to_value(kind).unwrap(), json!(label));
        assert_eq!(kind.as_str(), label);
    }
}

#[test]
fn app_error_display_is_prefixed() {
    assert_eq!(AppError::Config("bad".into()).to_string(), "config: bad");
    assert_eq!(AppError::Mcp("closed".into()).to_string(), "mcp: closed");
}

#[test]
fn error_payload_carries_flag_message_and_hint() {
    let err = ToolError::unavailable("Database 'money_stuff' does not exist")
        .with_hint("createdb money_stuff");
    let body = error_body(&err);
    assert_eq!(
        body,
        json!({
            "error": true,
            "kind": "unavailable",
            "message": "Database 'money_stuff' does not exist",
            "hint": "createdb money_stuff",
        })
    );

    let result = error_result(&err);
    assert_eq!(result.is_error, Some(true));
    assert_eq!(result.content.len(), 1);
}
