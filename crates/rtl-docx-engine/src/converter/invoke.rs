//! Pandoc invocation
//!
//! Each conversion gets its own scratch directory and its own pandoc process.
//! The scratch directory is a [`tempfile::TempDir`], so it is removed when the
//! call returns on any path, and the child is spawned with `kill_on_drop` so a
//! timed-out run does not outlive its request.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::errors::ConvertError;
use super::output::default_output_path;
use super::preprocess::preprocess;
use crate::config::ConverterConfig;

/// Pandoc reader with the list extensions the RTL templates rely on
pub const INPUT_FORMAT: &str = "markdown+lists_without_preceding_blankline+task_lists";

/// Pandoc writer
pub const OUTPUT_FORMAT: &str = "docx";

/// Syntax highlighting theme for fenced code
pub const HIGHLIGHT_STYLE: &str = "tango";

const INPUT_FILE: &str = "input.md";
const OUTPUT_FILE: &str = "output.docx";

/// Build the pandoc argument list for one run
pub fn pandoc_args(template: &Path, filter: &Path, input: &Path, output: &Path) -> Vec<OsString> {
    let mut reference_doc = OsString::from("--reference-doc=");
    reference_doc.push(template);
    let mut lua_filter = OsString::from("--lua-filter=");
    lua_filter.push(filter);

    vec![
        reference_doc,
        lua_filter,
        "-f".into(),
        INPUT_FORMAT.into(),
        "-t".into(),
        OUTPUT_FORMAT.into(),
        format!("--highlight-style={}", HIGHLIGHT_STYLE).into(),
        input.into(),
        "-o".into(),
        output.into(),
    ]
}

/// Convert Markdown to a Word document using `template_path` as the pandoc
/// reference document.
///
/// The template must exist; otherwise the call fails with
/// [`ConvertError::TemplateNotFound`] before pandoc is started.
pub async fn convert_markdown_to_docx(
    markdown: &str,
    template_path: &Path,
    config: &ConverterConfig,
) -> Result<Vec<u8>, ConvertError> {
    // 1. Template must be present before anything is spawned
    if !template_path.is_file() {
        return Err(ConvertError::template_not_found(
            template_path.display().to_string(),
        ));
    }

    // 2. Preprocess and persist into a fresh scratch directory
    let content = preprocess(markdown);
    let workdir = tempfile::Builder::new().prefix("rtl-docx-").tempdir()?;
    let input_path = workdir.path().join(INPUT_FILE);
    let output_path = workdir.path().join(OUTPUT_FILE);
    tokio::fs::write(&input_path, content.as_bytes()).await?;

    debug!(
        "Converting {} bytes of markdown in {}",
        content.len(),
        workdir.path().display()
    );

    // 3. Run pandoc
    let args = pandoc_args(template_path, &config.filter_path, &input_path, &output_path);
    let child = Command::new(&config.pandoc_path)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            ConvertError::ConversionError(format!(
                "failed to launch {}: {}",
                config.pandoc_path.display(),
                e
            ))
        })?;

    // 4. Wait with timeout; dropping the future kills the child
    let output = match tokio::time::timeout(config.timeout(), child.wait_with_output()).await {
        Ok(result) => result?,
        Err(_elapsed) => {
            warn!("Pandoc timed out after {}ms", config.timeout_ms);
            return Err(ConvertError::Timeout(config.timeout_ms));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        warn!("Pandoc exited with {}: {}", output.status, stderr.trim());
        return Err(ConvertError::ConversionError(stderr));
    }

    // 5. Read the produced document back
    let bytes = tokio::fs::read(&output_path).await.map_err(|e| {
        ConvertError::ConversionError(format!("pandoc produced no output document: {}", e))
    })?;

    info!(
        "Converted markdown with template {} ({} bytes)",
        template_path.display(),
        bytes.len()
    );

    Ok(bytes)
}

/// Convert Markdown and write the document to `output_path`, creating parent
/// directories as needed
pub async fn convert_to_file(
    markdown: &str,
    template_path: &Path,
    output_path: &Path,
    config: &ConverterConfig,
) -> Result<PathBuf, ConvertError> {
    let bytes = convert_markdown_to_docx(markdown, template_path, config).await?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output_path, &bytes).await?;

    Ok(output_path.to_path_buf())
}

/// Check that `input_path` exists and carries a `.md` extension (any case)
pub fn check_markdown_input(input_path: &Path) -> Result<(), ConvertError> {
    if !input_path.exists() {
        return Err(ConvertError::MissingInputFile(input_path.to_path_buf()));
    }

    let is_md = input_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"));
    if !is_md {
        return Err(ConvertError::InvalidInput(format!(
            "Input file must be a .md file, got: '{}'",
            input_path.display()
        )));
    }

    Ok(())
}

/// Convert a `.md` file on disk. Without an explicit `output_path` the
/// document is written next to the input with a `.docx` extension.
pub async fn convert_file(
    input_path: &Path,
    output_path: Option<&Path>,
    template_path: &Path,
    config: &ConverterConfig,
) -> Result<PathBuf, ConvertError> {
    check_markdown_input(input_path)?;

    let raw = tokio::fs::read(input_path).await?;
    let markdown = String::from_utf8(raw).map_err(|_| {
        ConvertError::InvalidInput(format!(
            "Could not decode '{}'. Please ensure it's UTF-8 encoded.",
            input_path.display()
        ))
    })?;

    let output_path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input_path));

    convert_to_file(&markdown, template_path, &output_path, config).await
}
