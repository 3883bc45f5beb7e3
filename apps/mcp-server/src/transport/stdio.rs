//! Standard I/O transport for MCP
//!
//! Accepts both newline-delimited JSON (what MCP clients send) and
//! `Content-Length` framed messages, and answers in the framing the request
//! arrived in.
//!
//! IMPORTANT: All logging MUST go to stderr. stdout is reserved for
//! JSON-RPC protocol messages only.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::ConverterConfig;
use crate::converter::ConvertError;
use crate::mcp::protocol::*;
use crate::mcp::RtlDocxMcpServer;

/// How a message was delimited on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// One JSON document per line
    Line,
    /// `Content-Length: N` header block followed by N bytes
    ContentLength,
}

/// Largest `Content-Length` body accepted on stdin
pub const MAX_MESSAGE_BYTES: usize = 10 * 1024 * 1024;

const CONTENT_LENGTH: &str = "Content-Length:";

/// Run the MCP server using stdio transport
pub async fn run_stdio_server(config: ConverterConfig) -> Result<(), ConvertError> {
    tracing::info!("Starting stdio transport");

    let server = RtlDocxMcpServer::new(config);
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    serve(&server, &mut stdin, &mut stdout).await
}

/// Message loop over a reader/writer pair. Returns at EOF.
///
/// A malformed `Content-Length` frame is answered with a parse error, then
/// input is skipped up to the next `Content-Length` header.
pub async fn serve<R, W>(
    server: &RtlDocxMcpServer,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), ConvertError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        // Read request
        let (body, framing) = match read_message(reader).await {
            Ok(Some(message)) => message,
            Ok(None) => {
                tracing::info!("EOF reached, shutting down");
                break;
            }
            Err(ConvertError::ProtocolError(msg)) => {
                tracing::warn!("Malformed frame: {}", msg);
                let response = JsonRpcResponse::error(None, PARSE_ERROR, msg);
                if let Err(e) = write_message(writer, &response, Framing::ContentLength).await {
                    tracing::error!("Failed to write response: {}", e);
                }
                resync(reader).await?;
                continue;
            }
            Err(e) => {
                tracing::error!("Failed to read message: {}", e);
                continue;
            }
        };

        let response = match serde_json::from_slice::<JsonRpcRequest>(&body) {
            Ok(request) => {
                tracing::debug!("Received request: {:?}", request.method);
                server.handle_request(request).await
            }
            Err(e) => Some(JsonRpcResponse::error(
                None,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            )),
        };

        // Write response
        if let Some(response) = response {
            if let Err(e) = write_message(writer, &response, framing).await {
                tracing::error!("Failed to write response: {}", e);
            }
        }
    }

    Ok(())
}

/// Read one raw JSON-RPC message. Returns `None` at EOF.
pub async fn read_message<R: AsyncBufRead + Unpin>(
    reader: &mut R,
) -> Result<Option<(Vec<u8>, Framing)>, ConvertError> {
    let mut line = String::new();

    // Skip blank lines between messages
    let header = loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            break trimmed.to_string();
        }
    };

    if !header.starts_with(CONTENT_LENGTH) {
        return Ok(Some((header.into_bytes(), Framing::Line)));
    }

    let content_length = header[CONTENT_LENGTH.len()..].trim().parse::<usize>();

    // Consume remaining headers up to the blank separator line
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(ConvertError::ProtocolError(
                "Unexpected EOF in message headers".to_string(),
            ));
        }
        if line.trim().is_empty() {
            break;
        }
    }

    let content_length = content_length
        .map_err(|_| ConvertError::ProtocolError(format!("Invalid header: {}", header)))?;
    if content_length > MAX_MESSAGE_BYTES {
        return Err(ConvertError::ProtocolError(format!(
            "Content-Length {} exceeds the {} byte limit",
            content_length, MAX_MESSAGE_BYTES
        )));
    }

    // Read body
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;
    Ok(Some((body, Framing::ContentLength)))
}

/// Discard input up to the next `Content-Length` header, or to EOF
pub async fn resync<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<(), ConvertError> {
    let marker = CONTENT_LENGTH.as_bytes();

    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(());
        }

        let found = buf.windows(marker.len()).position(|w| w == marker);
        let available = buf.len();
        match found {
            Some(pos) => {
                reader.consume(pos);
                return Ok(());
            }
            None => reader.consume(available),
        }
    }
}

/// Write a JSON-RPC message to the output stream
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
    framing: Framing,
) -> Result<(), ConvertError> {
    let body = serde_json::to_string(response)?;

    match framing {
        Framing::Line => {
            writer.write_all(body.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        Framing::ContentLength => {
            let header = format!("Content-Length: {}\r\n\r\n", body.len());
            writer.write_all(header.as_bytes()).await?;
            writer.write_all(body.as_bytes()).await?;
        }
    }
    writer.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_read_content_length_message() {
        let input = "Content-Length: 52\r\n\r\n{\"jsonrpc\":\"2.0\",\"method\":\"ping\",\"id\":1,\"params\":{}}";
        let mut reader = input.as_bytes();

        let (body, framing) = read_message(&mut reader).await.unwrap().unwrap();
        let request: JsonRpcRequest = serde_json::from_slice(&body).unwrap();
        assert_eq!(request.method, "ping");
        assert_eq!(framing, Framing::ContentLength);
    }

    #[tokio::test]
    async fn test_read_line_messages() {
        let input = "\n{\"jsonrpc\":\"2.0\",\"method\":\"ping\",\"id\":1}\n\n{\"jsonrpc\":\"2.0\",\"method\":\"tools/list\",\"id\":2}\n";
        let mut reader = input.as_bytes();

        let (first, framing) = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(framing, Framing::Line);
        let first: JsonRpcRequest = serde_json::from_slice(&first).unwrap();
        assert_eq!(first.method, "ping");

        let (second, _) = read_message(&mut reader).await.unwrap().unwrap();
        let second: JsonRpcRequest = serde_json::from_slice(&second).unwrap();
        assert_eq!(second.method, "tools/list");

        assert!(read_message(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_invalid_content_length() {
        let mut reader = "Content-Length: many\r\n\r\n{}".as_bytes();
        let err = read_message(&mut reader).await.unwrap_err();
        assert!(matches!(err, ConvertError::ProtocolError(_)));
    }

    #[tokio::test]
    async fn test_oversized_content_length_rejected() {
        let mut reader = "Content-Length: 18446744073709551615\r\n\r\n{}".as_bytes();
        let err = read_message(&mut reader).await.unwrap_err();
        assert!(matches!(err, ConvertError::ProtocolError(msg) if msg.contains("limit")));
    }

    #[tokio::test]
    async fn test_resync_stops_at_next_header() {
        let mut reader = "{\"stale\":true}Content-Length: 2\r\n\r\n{}".as_bytes();
        resync(&mut reader).await.unwrap();

        let (body, framing) = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(body, b"{}");
        assert_eq!(framing, Framing::ContentLength);
    }

    #[tokio::test]
    async fn test_serve_answers_bad_frame_and_recovers() {
        let server = RtlDocxMcpServer::new(ConverterConfig::default());
        let ping = r#"{"jsonrpc":"2.0","id":9,"method":"ping"}"#;
        let input = format!(
            "Content-Length: many\r\n\r\n{{\"jsonrpc\":\"2.0\"}}Content-Length: {}\r\n\r\n{}",
            ping.len(),
            ping
        );
        let mut reader = input.as_bytes();
        let mut output = Vec::new();

        serve(&server, &mut reader, &mut output).await.unwrap();

        let mut replies = output.as_slice();
        let (first, framing) = read_message(&mut replies).await.unwrap().unwrap();
        assert_eq!(framing, Framing::ContentLength);
        let first: JsonRpcResponse = serde_json::from_slice(&first).unwrap();
        assert_eq!(first.error.unwrap().code, PARSE_ERROR);

        let (second, framing) = read_message(&mut replies).await.unwrap().unwrap();
        assert_eq!(framing, Framing::ContentLength);
        let second: JsonRpcResponse = serde_json::from_slice(&second).unwrap();
        assert_eq!(second.id, Some(json!(9)));
        assert!(second.result.is_some());

        assert!(read_message(&mut replies).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_content_length_message() {
        let response = JsonRpcResponse::success(Some(json!(1)), json!({"result": "ok"}));
        let mut output = Vec::new();

        write_message(&mut output, &response, Framing::ContentLength)
            .await
            .unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.starts_with("Content-Length:"));
        assert!(output_str.contains("result"));
    }

    #[tokio::test]
    async fn test_write_line_message() {
        let response = JsonRpcResponse::success(Some(json!(1)), json!({}));
        let mut output = Vec::new();

        write_message(&mut output, &response, Framing::Line)
            .await
            .unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.ends_with("}\n"));
        assert_eq!(output_str.lines().count(), 1);
    }
}
