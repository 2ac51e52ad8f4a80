//! Helpers for declaring static tool catalogs.

use std::sync::Arc;

use rmcp::model::Tool;
use serde_json::{Map, Value};

/// Convert a `serde_json::Value::Object` into the `Arc<Map>` expected by `Tool`.
#[must_use]
pub fn schema(value: Value) -> Arc<Map<String, Value>> {
    match value {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(Map::default()),
    }
}

/// Declare a tool with a JSON-schema argument object.
#[must_use]
pub fn tool(name: &'static str, description: &'static str, input_schema: Value) -> Tool {
    Tool::new(name, description, schema(input_schema))
}

/// Look up a tool by name.
#[must_use]
pub fn find<'a>(tools: &'a [Tool], name: &str) -> Option<&'a Tool> {
    tools.iter().find(|tool| tool.name == name)
}

/// Names listed in the schema's `required` array.
#[must_use]
pub fn required_fields(tool: &Tool) -> Vec<&str> {
    tool.input_schema
        .get("required")
        .and_then(Value::as_array)
        .map(|fields| fields.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Required fields absent (or `null`) in the supplied arguments.
#[must_use]
pub fn missing_required<'a>(tool: &'a Tool, arguments: &Map<String, Value>) -> Vec<&'a str> {
    required_fields(tool)
        .into_iter()
        .filter(|field| arguments.get(*field).map_or(true, Value::is_null))
        .collect()
}
