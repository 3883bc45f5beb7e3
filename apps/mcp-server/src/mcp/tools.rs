//! MCP Tool definitions and handlers

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::json;

use super::protocol::{Tool, ToolResultContent};
use crate::config::ConverterConfig;
use crate::converter::{check_markdown_input, convert_file, convert_to_file, ConvertError};
use crate::templates::{self, resolve_template_or_default};

/// Get all tool definitions
pub fn get_tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: "list_templates".to_string(),
            description: Some(
                "List available DOCX templates for RTL conversion. Use the template id when \
                 calling the conversion tools."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Tool {
            name: "convert_markdown_to_rtl_docx".to_string(),
            description: Some(
                "Convert Markdown text to a right-to-left Hebrew Word document (David font, \
                 task-list checkboxes, highlighted code blocks) and save it to output_path"
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "markdown_content": {
                        "type": "string",
                        "description": "The Markdown text to convert"
                    },
                    "output_path": {
                        "type": "string",
                        "description": "Where to save the .docx file (absolute path)"
                    },
                    "template_id": {
                        "type": "string",
                        "description": "Template id from list_templates (default: style-clear)"
                    }
                },
                "required": ["markdown_content", "output_path"]
            }),
        },
        Tool {
            name: "convert_markdown_file_to_rtl_docx".to_string(),
            description: Some(
                "Convert a .md file to a right-to-left Hebrew Word document. Without \
                 output_path the document is written next to the input with a .docx extension"
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "input_path": {
                        "type": "string",
                        "description": "Path to the input .md file (absolute path)"
                    },
                    "output_path": {
                        "type": "string",
                        "description": "Where to save the .docx file"
                    },
                    "template_id": {
                        "type": "string",
                        "description": "Template id from list_templates (default: style-clear)"
                    }
                },
                "required": ["input_path"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct ConvertTextArgs {
    markdown_content: String,
    output_path: PathBuf,
    #[serde(default)]
    template_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConvertFileArgs {
    input_path: PathBuf,
    #[serde(default)]
    output_path: Option<PathBuf>,
    #[serde(default)]
    template_id: Option<String>,
}

/// Handle a tool call
pub async fn handle_tool_call(
    name: &str,
    arguments: serde_json::Value,
    config: &ConverterConfig,
) -> Result<Vec<ToolResultContent>, ConvertError> {
    match name {
        "list_templates" => handle_list_templates(config),
        "convert_markdown_to_rtl_docx" => handle_convert_text(arguments, config).await,
        "convert_markdown_file_to_rtl_docx" => handle_convert_file(arguments, config).await,
        _ => Err(ConvertError::UnknownTool(name.to_string())),
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T, ConvertError> {
    serde_json::from_value(args).map_err(|e| ConvertError::InvalidArgument(e.to_string()))
}

fn success_message(path: &std::path::Path) -> Vec<ToolResultContent> {
    vec![ToolResultContent::Text {
        text: format!("Successfully created RTL Word document: {}", path.display()),
    }]
}

fn handle_list_templates(config: &ConverterConfig) -> Result<Vec<ToolResultContent>, ConvertError> {
    let templates = templates::list_templates(&config.templates_dir);
    let result = json!({
        "templates": templates,
        "count": templates.len(),
        "default": config.default_template
    });

    Ok(vec![ToolResultContent::Text {
        text: serde_json::to_string_pretty(&result)?,
    }])
}

async fn handle_convert_text(
    args: serde_json::Value,
    config: &ConverterConfig,
) -> Result<Vec<ToolResultContent>, ConvertError> {
    let args: ConvertTextArgs = parse_args(args)?;
    let template = resolve_template_or_default(config, args.template_id.as_deref())?;

    tracing::info!(
        "Converting {} bytes of markdown to {}",
        args.markdown_content.len(),
        args.output_path.display()
    );

    let written = convert_to_file(&args.markdown_content, &template, &args.output_path, config)
        .await?;
    Ok(success_message(&written))
}

async fn handle_convert_file(
    args: serde_json::Value,
    config: &ConverterConfig,
) -> Result<Vec<ToolResultContent>, ConvertError> {
    let args: ConvertFileArgs = parse_args(args)?;

    // Input problems are reported before template problems
    check_markdown_input(&args.input_path)?;
    let template = resolve_template_or_default(config, args.template_id.as_deref())?;

    tracing::info!("Converting file {}", args.input_path.display());

    let written = convert_file(
        &args.input_path,
        args.output_path.as_deref(),
        &template,
        config,
    )
    .await?;
    Ok(success_message(&written))
}
