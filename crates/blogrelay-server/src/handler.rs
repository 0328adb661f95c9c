//! Tool handler trait and the function-based adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use blogrelay_types::{RelayResult, Tool};

type BoxFuture<T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send>>;

/// A registered tool's executable side.
///
/// Handlers receive parameters that already passed schema validation and
/// return a plain structured payload; the dispatcher imposes no further
/// envelope on success.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with validated arguments.
    async fn handle(&self, args: Value) -> RelayResult<Value>;

    /// The tool definition this handler serves.
    fn tool_definition(&self) -> Tool;
}

/// Function-based tool handler wrapping an async closure.
pub struct FunctionToolHandler {
    tool: Tool,
    handler: Arc<dyn Fn(Value) -> BoxFuture<RelayResult<Value>> + Send + Sync>,
}

impl std::fmt::Debug for FunctionToolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionToolHandler")
            .field("tool", &self.tool)
            .finish()
    }
}

impl FunctionToolHandler {
    /// Wrap an async closure as a tool handler.
    pub fn new<F, Fut>(tool: Tool, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = RelayResult<Value>> + Send + 'static,
    {
        let handler = Arc::new(move |args| Box::pin(handler(args)) as BoxFuture<_>);
        Self { tool, handler }
    }
}

#[async_trait]
impl ToolHandler for FunctionToolHandler {
    async fn handle(&self, args: Value) -> RelayResult<Value> {
        (self.handler)(args).await
    }

    fn tool_definition(&self) -> Tool {
        self.tool.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogrelay_types::ToolInputSchema;
    use serde_json::json;

    #[tokio::test]
    async fn function_handler_invokes_closure() {
        let handler = FunctionToolHandler::new(
            Tool::new("echo", "Echo arguments back").with_schema(ToolInputSchema::empty()),
            |args| async move { Ok(args) },
        );
        let result = handler.handle(json!({"a": 1})).await.unwrap();
        assert_eq!(result, json!({"a": 1}));
        assert_eq!(handler.tool_definition().name, "echo");
    }
}
