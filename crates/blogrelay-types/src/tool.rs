//! Tool definition types.
//!
//! A [`Tool`] describes one named, schema-validated operation exposed to
//! tool-protocol clients. Definitions are registered once at startup and
//! immutable thereafter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition: name, description and declared input schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Tool name (machine-readable identifier, unique within a registry)
    pub name: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolInputSchema,
}

impl Tool {
    /// Create a new tool with name and description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            input_schema: ToolInputSchema::default(),
        }
    }

    /// Set the input schema.
    #[must_use]
    pub fn with_schema(mut self, schema: ToolInputSchema) -> Self {
        self.input_schema = schema;
        self
    }
}

/// JSON Schema for tool input parameters.
///
/// Always an object schema; the declared properties and required list are
/// compiled into a validator at registration time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInputSchema {
    /// Schema type (always "object")
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    /// Required property names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Whether additional properties are allowed
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        Self {
            schema_type: "object".into(),
            properties: None,
            required: None,
            additional_properties: Some(false),
        }
    }
}

impl ToolInputSchema {
    /// Schema accepting an empty object and nothing else.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Object schema from property definitions and required names.
    #[must_use]
    pub fn object(properties: Value, required: &[&str]) -> Self {
        Self {
            schema_type: "object".into(),
            properties: Some(properties),
            required: if required.is_empty() {
                None
            } else {
                Some(required.iter().map(ToString::to_string).collect())
            },
            additional_properties: Some(false),
        }
    }

    /// Render the full JSON Schema document for compilation.
    #[must_use]
    pub fn to_schema_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"type": "object"}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn schema_value_carries_required_and_closed_properties() {
        let schema = ToolInputSchema::object(
            serde_json::json!({
                "blogId": {"type": "string", "description": "Blog id"},
                "maxResults": {"type": "integer"},
            }),
            &["blogId"],
        );
        let value = schema.to_schema_value();
        assert_eq!(value["type"], "object");
        assert_eq!(value["required"], serde_json::json!(["blogId"]));
        assert_eq!(value["additionalProperties"], serde_json::json!(false));
    }

    #[test]
    fn tool_serializes_input_schema_key() {
        let tool = Tool::new("list_blogs", "List all accessible blogs");
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("\"inputSchema\""));
    }
}
