//! MCP Resource providers

use super::protocol::{Resource, ResourceContent, ResourceTemplate};
use crate::config::ConverterConfig;
use crate::converter::ConvertError;
use crate::templates;

const LIST_URI: &str = "templates://list";
const TEMPLATE_URI_PREFIX: &str = "templates://";

/// Get all resource definitions
pub fn get_resource_definitions(config: &ConverterConfig) -> Vec<Resource> {
    let mut resources = vec![Resource {
        uri: LIST_URI.to_string(),
        name: "Available Templates".to_string(),
        description: Some("List of available RTL Word templates".to_string()),
        mime_type: Some("text/plain".to_string()),
    }];

    for template in templates::list_templates(&config.templates_dir) {
        resources.push(Resource {
            uri: format!("{}{}", TEMPLATE_URI_PREFIX, template.id),
            name: template.name,
            description: Some(format!("Reference document {}", template.filename)),
            mime_type: Some("text/plain".to_string()),
        });
    }

    resources
}

/// Get parameterised resource definitions
pub fn get_resource_templates() -> Vec<ResourceTemplate> {
    vec![ResourceTemplate {
        uri_template: "templates://{template_id}".to_string(),
        name: "Template Info".to_string(),
        description: Some("Details about a specific template".to_string()),
        mime_type: Some("text/plain".to_string()),
    }]
}

/// Read a resource by URI
pub fn read_resource(uri: &str, config: &ConverterConfig) -> Result<ResourceContent, ConvertError> {
    let text = if uri == LIST_URI {
        templates_list_text(config)
    } else if let Some(id) = uri
        .strip_prefix(TEMPLATE_URI_PREFIX)
        .filter(|id| !id.is_empty())
    {
        template_info_text(id, config)?
    } else {
        return Err(ConvertError::ResourceNotFound(uri.to_string()));
    };

    Ok(ResourceContent {
        uri: uri.to_string(),
        mime_type: Some("text/plain".to_string()),
        text: Some(text),
        blob: None,
    })
}

fn templates_list_text(config: &ConverterConfig) -> String {
    let mut lines = vec!["Available RTL Word Templates:".to_string(), String::new()];
    for t in templates::list_templates(&config.templates_dir) {
        lines.push(format!("- {}: {}", t.id, t.name));
    }
    lines.push(String::new());
    lines.push(format!("Default: {}", config.default_template));
    lines.join("\n")
}

// Unknown ids are answered with a readable message rather than an error
fn template_info_text(id: &str, config: &ConverterConfig) -> Result<String, ConvertError> {
    match templates::describe_template(&config.templates_dir, id) {
        Ok(text) => Ok(text),
        Err(ConvertError::TemplateNotFound { id, available }) => Ok(format!(
            "Template '{}' not found. Available: {}",
            id,
            available.join(", ")
        )),
        Err(other) => Err(other),
    }
}
