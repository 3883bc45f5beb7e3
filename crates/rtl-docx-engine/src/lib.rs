//! RTL Word document conversion engine
//!
//! This crate turns Markdown into right-to-left Hebrew Word documents by
//! delegating the actual rendering to pandoc. It provides:
//! - Markdown preprocessing (task-list checkboxes, RTL front matter)
//! - Pandoc invocation with a per-request scratch directory and timeout
//! - Template discovery from a directory of reference `.docx` files
//!
//! Both the HTTP API and the MCP server are thin callers of this crate.

pub mod config;
pub mod converter;
pub mod templates;

pub use config::ConverterConfig;
pub use converter::{
    convert_file, convert_markdown_to_docx, convert_to_file, preprocess, ConvertError,
};
pub use templates::{list_templates, resolve_template, Template};
