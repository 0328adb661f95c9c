//! Tool registry: named operations with pre-compiled parameter validators.

use std::collections::HashMap;
use std::sync::Arc;

use jsonschema::Validator;
use tracing::warn;

use blogrelay_types::{RelayError, RelayResult, Tool};

use crate::handler::ToolHandler;

/// One registered tool: its handler plus the validator compiled from the
/// declared input schema.
pub struct RegisteredTool {
    handler: Arc<dyn ToolHandler>,
    validator: Validator,
}

impl RegisteredTool {
    /// The handler to invoke after validation.
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    /// Check arguments against the tool's declared schema.
    ///
    /// # Errors
    ///
    /// `RelayError::Validation` listing every schema violation.
    pub fn validate_args(&self, args: &serde_json::Value) -> RelayResult<()> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(args)
            .map(|e| {
                let path = e.instance_path().to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RelayError::Validation(errors.join("; ")))
        }
    }
}

/// Registry of named tools. Populated once at startup, immutable afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    // Registration order, for stable tool listings
    order: Vec<String>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, compiling its input schema into a validator.
    ///
    /// Registering a name twice overwrites the earlier entry (last write
    /// wins) and logs a warning - treat that as a wiring mistake, not a
    /// feature.
    ///
    /// # Errors
    ///
    /// `RelayError::Internal` when the declared input schema does not
    /// compile.
    pub fn register(&mut self, handler: impl ToolHandler + 'static) -> RelayResult<()> {
        let tool = handler.tool_definition();
        let schema = tool.input_schema.to_schema_value();
        let validator = jsonschema::validator_for(&schema).map_err(|e| {
            RelayError::Internal(format!("invalid input schema for tool '{}': {e}", tool.name))
        })?;

        let name = tool.name.clone();
        let entry = RegisteredTool {
            handler: Arc::new(handler),
            validator,
        };
        if self.tools.insert(name.clone(), entry).is_some() {
            warn!(tool = %name, "duplicate tool registration; replacing earlier entry");
        } else {
            self.order.push(name);
        }
        Ok(())
    }

    /// Look up a registered tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// Registered tool names, in registration order.
    #[must_use]
    pub fn tool_names(&self) -> &[String] {
        &self.order
    }

    /// Registered tool definitions, in registration order.
    #[must_use]
    pub fn tool_definitions(&self) -> Vec<Tool> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|entry| entry.handler.tool_definition())
            .collect()
    }
}
