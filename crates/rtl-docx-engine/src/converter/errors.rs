//! Error types for conversion and transport operations

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between receiving Markdown and handing back
/// a Word document
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Template '{id}' not found{}", available_suffix(.available))]
    TemplateNotFound { id: String, available: Vec<String> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Pandoc exited abnormally; carries its stderr verbatim
    #[error("Pandoc conversion failed: {0}")]
    ConversionError(String),

    #[error("Input file not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("Conversion timeout after {0}ms")]
    Timeout(u64),

    #[error("Path security violation: {0}")]
    PathSecurityViolation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn available_suffix(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(". Available templates: {}", available.join(", "))
    }
}

impl ConvertError {
    /// Template lookup failure without the list of alternatives
    pub fn template_not_found(id: impl Into<String>) -> Self {
        ConvertError::TemplateNotFound {
            id: id.into(),
            available: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_message() {
        let err = ConvertError::template_not_found("style-red");
        assert_eq!(err.to_string(), "Template 'style-red' not found");
    }

    #[test]
    fn test_template_not_found_lists_available() {
        let err = ConvertError::TemplateNotFound {
            id: "style-red".to_string(),
            available: vec!["style-blue".to_string(), "style-clear".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Template 'style-red' not found. Available templates: style-blue, style-clear"
        );
    }

    #[test]
    fn test_conversion_error_keeps_stderr() {
        let err = ConvertError::ConversionError("Unknown option --bogus".to_string());
        assert!(err.to_string().ends_with("Unknown option --bogus"));
    }
}
