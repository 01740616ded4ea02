use jsonschema::validator_for;
use serde_json::Value;

use databricks_agent_mcp::protocol::{ErrorDebug, ToolError, ToolResult};

const ERROR_PAYLOAD_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Tool error payload",
  "type": "object",
  "required": ["error", "message"],
  "additionalProperties": false,
  "properties": {
    "error": { "type": "string", "minLength": 1 },
    "message": { "type": "string", "minLength": 1 },
    "debug": {
      "type": "object",
      "required": ["base_url", "endpoint"],
      "additionalProperties": false,
      "properties": {
        "base_url": { "type": "string" },
        "endpoint": { "type": "string" }
      }
    }
  }
}"#;

fn assert_valid(payload: &ToolError) -> String {
    let json_str = serde_json::to_string_pretty(payload).unwrap();
    let json_value: Value = serde_json::from_str(&json_str).unwrap();

    let schema_json: Value = serde_json::from_str(ERROR_PAYLOAD_SCHEMA).unwrap();
    let validator = validator_for(&schema_json).unwrap();
    assert!(validator.is_valid(&json_value), "error payload must satisfy schema: {json_str}");
    json_str
}

#[test]
fn golden_error_payload_without_debug() {
    let payload = ToolError::new(
        "No OBO token available",
        "This tool requires OBO authentication. Running locally without token.",
    );

    let expected = r#"{
  "error": "No OBO token available",
  "message": "This tool requires OBO authentication. Running locally without token."
}"#;

    assert_eq!(assert_valid(&payload).trim(), expected.trim(), "error payload snapshot mismatch");
}

#[test]
fn golden_error_payload_with_debug() {
    let payload = ToolError::new("Error code: 500 - boom", "Failed to query the agent").with_debug(
        ErrorDebug {
            base_url: "https://example.com/serving-endpoints".into(),
            endpoint: "my-agent".into(),
        },
    );

    let expected = r#"{
  "error": "Error code: 500 - boom",
  "message": "Failed to query the agent",
  "debug": {
    "base_url": "https://example.com/serving-endpoints",
    "endpoint": "my-agent"
  }
}"#;

    assert_eq!(assert_valid(&payload).trim(), expected.trim(), "error payload snapshot mismatch");
}

#[test]
fn error_payload_becomes_error_tool_result() {
    let result: ToolResult = ToolError::new("boom", "Failed to retrieve user information").into();
    assert!(result.is_error);

    let parsed: ToolError = serde_json::from_str(result.first_text().unwrap()).unwrap();
    assert_eq!(parsed.error, "boom");
    assert_eq!(parsed.message, "Failed to retrieve user information");
    assert!(parsed.debug.is_none());
}
