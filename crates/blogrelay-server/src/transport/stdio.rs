//! Stream-framed transport over stdin/stdout.
//!
//! Newline-delimited JSON: one request per line in, one response per line
//! out. Requests are processed strictly in arrival order - each one is
//! fully dispatched before the next line is read, so responses can never
//! interleave. Logging goes to stderr, keeping the stdout frame clean.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info};

use blogrelay_types::{RelayError, RelayResult};

use crate::dispatch::Dispatcher;
use crate::telemetry::TelemetrySink;

/// The single long-lived stdio peer is tracked under this identity.
const STDIO_CLIENT_ID: &str = "stdio";

/// Serve requests from the current process's stdin until EOF.
///
/// # Errors
///
/// `RelayError::Transport` when stdin or stdout fails mid-stream.
pub async fn run(dispatcher: Arc<Dispatcher>, telemetry: Arc<TelemetrySink>) -> RelayResult<()> {
    info!("serving on stdio");
    serve(tokio::io::stdin(), tokio::io::stdout(), dispatcher, telemetry).await
}

async fn serve<R, W>(
    reader: R,
    writer: W,
    dispatcher: Arc<Dispatcher>,
    telemetry: Arc<TelemetrySink>,
) -> RelayResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = FramedRead::new(BufReader::new(reader), LinesCodec::new());
    let mut responses = FramedWrite::new(writer, LinesCodec::new());

    while let Some(line) = lines.next().await {
        let line = line.map_err(|e| RelayError::Transport(format!("stdin read failed: {e}")))?;
        telemetry.touch_client(STDIO_CLIENT_ID, None);

        let response = dispatcher.handle_raw(&line).await;
        let encoded = serde_json::to_string(&response)
            .map_err(|e| RelayError::Internal(format!("unserializable response: {e}")))?;
        responses
            .send(encoded)
            .await
            .map_err(|e| RelayError::Transport(format!("stdout write failed: {e}")))?;
    }

    debug!("stdin closed; stdio transport done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FunctionToolHandler;
    use crate::registry::ToolRegistry;
    use blogrelay_types::{Tool, ToolInputSchema};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn echo_stack() -> (Arc<Dispatcher>, Arc<TelemetrySink>) {
        let mut registry = ToolRegistry::new();
        registry
            .register(FunctionToolHandler::new(
                Tool::new("echo", "Echo arguments back").with_schema(ToolInputSchema::object(
                    json!({"value": {"type": "integer"}}),
                    &["value"],
                )),
                |args| async move { Ok(args) },
            ))
            .unwrap();
        let telemetry = Arc::new(TelemetrySink::new("stdio", &["echo".to_string()]));
        let dispatcher = Arc::new(Dispatcher::new(registry, telemetry.clone()));
        (dispatcher, telemetry)
    }

    #[tokio::test]
    async fn one_response_line_per_request_line_in_order() {
        let (dispatcher, telemetry) = echo_stack();
        let (mut peer, server_io) = tokio::io::duplex(4096);
        let (reader, writer) = tokio::io::split(server_io);

        let server = tokio::spawn(serve(reader, writer, dispatcher, telemetry.clone()));

        peer.write_all(
            b"{\"tool\":\"echo\",\"params\":{\"value\":1}}\n\
              {\"tool\":\"echo\",\"params\":{\"value\":2}}\n\
              not json\n",
        )
        .await
        .unwrap();
        peer.shutdown().await.unwrap();

        server.await.unwrap().unwrap();

        let mut output = String::new();
        peer.read_to_string(&mut output).await.unwrap();
        let responses: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0], json!({"value": 1}));
        assert_eq!(responses[1], json!({"value": 2}));
        assert!(
            responses[2]["error"]
                .as_str()
                .unwrap()
                .starts_with("parse error:")
        );

        // All three lines were requests from the single stdio peer
        let connections = telemetry.connections();
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].id, "stdio");
        assert_eq!(connections[0].request_count, 3);
    }
}
