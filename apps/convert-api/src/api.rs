//! API handlers for the conversion server
//!
//! Provides REST endpoints for:
//! - Template listing
//! - Markdown upload conversion

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use rtl_docx_engine::converter::output::{is_markdown_upload, output_filename};
use rtl_docx_engine::converter::DOCX_MIME_TYPE;
use rtl_docx_engine::{convert_markdown_to_docx, list_templates, resolve_template, Template};

use crate::error::ServerError;
use crate::AppState;

/// Root response
#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// Handler: GET /
pub async fn handle_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Markdown to DOCX Converter API",
        status: "running",
    })
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "convert-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Template list response
#[derive(Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
}

/// Handler: GET /templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = list_templates(&state.config.templates_dir);
    debug!("Listing {} templates", templates.len());
    Json(TemplateListResponse { templates })
}

/// Fields collected from a `/convert` multipart body
#[derive(Debug, Default)]
struct ConvertUpload {
    filename: Option<String>,
    content: Option<Bytes>,
    template: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<ConvertUpload, ServerError> {
    let mut upload = ConvertUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                upload.filename = field.file_name().map(str::to_string);
                upload.content = Some(field.bytes().await.map_err(|e| {
                    ServerError::InvalidRequest(format!("Could not read upload: {}", e))
                })?);
            }
            Some("template") => {
                upload.template = Some(field.text().await.map_err(|e| {
                    ServerError::InvalidRequest(format!("Could not read template field: {}", e))
                })?);
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(upload)
}

/// Handler: POST /convert
///
/// Multipart fields: `file` (a `.md`, `.markdown` or `.txt` upload) and
/// `template` (a template id). Responds with the Word document as an
/// attachment.
pub async fn handle_convert(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ServerError> {
    let upload = read_upload(multipart).await?;

    let content = upload
        .content
        .ok_or_else(|| ServerError::InvalidRequest("Missing 'file' field".to_string()))?;
    let filename = upload.filename.unwrap_or_default();
    let template_id = upload
        .template
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ServerError::InvalidRequest("Missing 'template' field".to_string()))?;

    if !is_markdown_upload(&filename) {
        return Err(ServerError::InvalidRequest(
            "File must be a markdown file (.md, .markdown, or .txt)".to_string(),
        ));
    }

    let template_path = resolve_template(&state.config.templates_dir, &template_id)?;

    let markdown = String::from_utf8(content.to_vec()).map_err(|_| {
        ServerError::InvalidRequest(
            "Could not decode file. Please ensure it's UTF-8 encoded.".to_string(),
        )
    })?;

    info!(
        "Converting '{}' ({} bytes) with template '{}'",
        filename,
        markdown.len(),
        template_id
    );

    let docx = convert_markdown_to_docx(&markdown, &template_path, &state.config)
        .await
        .map_err(|e| {
            warn!("Conversion of '{}' failed: {}", filename, e);
            ServerError::from(e)
        })?;

    let disposition = content_disposition(&output_filename(&filename))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_MIME_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        docx,
    )
        .into_response())
}

/// `attachment` disposition for `filename`, with an RFC 5987 `filename*`
/// parameter when the name is not plain ASCII
pub fn content_disposition(filename: &str) -> Result<HeaderValue, ServerError> {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let value = if fallback == filename {
        format!("attachment; filename=\"{}\"", filename)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    };

    HeaderValue::from_str(&value).map_err(|e| ServerError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_disposition() {
        let value = content_disposition("notes.docx").unwrap();
        assert_eq!(value.to_str().unwrap(), "attachment; filename=\"notes.docx\"");
    }

    #[test]
    fn test_hebrew_disposition_has_encoded_name() {
        let value = content_disposition("סיכום.docx").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"_____.docx\"; \
             filename*=UTF-8''%D7%A1%D7%99%D7%9B%D7%95%D7%9D.docx"
        );
    }

    #[test]
    fn test_quotes_are_not_passed_through() {
        let value = content_disposition("a\"b.docx").unwrap();
        assert!(value.to_str().unwrap().starts_with("attachment; filename=\"a_b.docx\""));
    }

    proptest::proptest! {
        #[test]
        fn disposition_is_always_a_valid_header(name in "\\PC{0,40}") {
            let value = content_disposition(&name).unwrap();
            let text = value.to_str().unwrap();
            proptest::prop_assert!(text.starts_with("attachment; filename=\""));
        }
    }
}
