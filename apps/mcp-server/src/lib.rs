//! Markdown to RTL DOCX MCP Server
//!
//! A Model Context Protocol server that exposes RTL Hebrew Word document
//! conversion to MCP-compliant AI agents.

pub mod mcp;
pub mod transport;

// Re-export from rtl-docx-engine
pub use rtl_docx_engine::config;
pub use rtl_docx_engine::converter;
pub use rtl_docx_engine::templates;

pub use mcp::server::RtlDocxMcpServer;
pub use rtl_docx_engine::ConverterConfig;
