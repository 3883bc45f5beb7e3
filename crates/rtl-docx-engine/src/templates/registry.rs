//! Template registry backed by a directory of reference `.docx` files
//!
//! Nothing is cached: every call reads the directory as it is right now.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConverterConfig;
use crate::converter::errors::ConvertError;
use crate::converter::output::DOCX_EXTENSION;

/// Filename prefixes stripped when deriving a display name
pub const TEMPLATE_PREFIXES: [&str; 2] = ["TEMPLAE-", "TEMPLATE-"];

/// A reference document that supplies styling for conversions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Filename stem; what callers pass as a template id
    pub id: String,
    /// Display name: the stem without a known prefix
    pub name: String,
    /// File name including extension
    pub filename: String,
}

impl Template {
    /// Build template metadata from a file name such as `TEMPLATE-BLUE.docx`
    pub fn from_filename(filename: &str) -> Option<Self> {
        let path = Path::new(filename);
        let is_docx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == DOCX_EXTENSION);
        if !is_docx {
            return None;
        }

        let id = path.file_stem()?.to_str()?.to_string();
        Some(Self {
            name: display_name(&id).to_string(),
            filename: filename.to_string(),
            id,
        })
    }
}

/// Strip one known prefix from a template stem, if present
pub fn display_name(stem: &str) -> &str {
    TEMPLATE_PREFIXES
        .iter()
        .find_map(|prefix| stem.strip_prefix(prefix))
        .unwrap_or(stem)
}

/// List the templates in `dir`, sorted by display name.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_templates(dir: &Path) -> Vec<Template> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Template directory {} not readable: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut templates: Vec<Template> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().to_str().and_then(Template::from_filename))
        .collect();

    templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    templates
}

/// Ids of every template in `dir`, in listing order
pub fn template_ids(dir: &Path) -> Vec<String> {
    list_templates(dir).into_iter().map(|t| t.id).collect()
}

/// Look up a template by id
pub fn find_template(dir: &Path, id: &str) -> Option<Template> {
    list_templates(dir).into_iter().find(|t| t.id == id)
}

/// Resolve a template id (with or without `.docx`) to an existing file in `dir`
pub fn resolve_template(dir: &Path, id: &str) -> Result<PathBuf, ConvertError> {
    validate_template_id(id)?;

    let filename = if id.ends_with(&format!(".{}", DOCX_EXTENSION)) {
        id.to_string()
    } else {
        format!("{}.{}", id, DOCX_EXTENSION)
    };

    let path = dir.join(&filename);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConvertError::TemplateNotFound {
            id: id.to_string(),
            available: template_ids(dir),
        })
    }
}

/// Resolve an optional template id, falling back to the configured default
pub fn resolve_template_or_default(
    config: &ConverterConfig,
    id: Option<&str>,
) -> Result<PathBuf, ConvertError> {
    let id = id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&config.default_template);
    resolve_template(&config.templates_dir, id)
}

/// Human-readable summary of one template
pub fn describe_template(dir: &Path, id: &str) -> Result<String, ConvertError> {
    let template = find_template(dir, id).ok_or_else(|| ConvertError::TemplateNotFound {
        id: id.to_string(),
        available: template_ids(dir),
    })?;

    let path = dir.join(&template.filename);
    let size_kb = fs::metadata(&path)?.len() as f64 / 1024.0;
    let shown_path = path.canonicalize().unwrap_or(path);

    Ok(format!(
        "Template: {}\nName: {}\nFilename: {}\nSize: {:.1} KB\nPath: {}",
        template.id,
        template.name,
        template.filename,
        size_kb,
        shown_path.display()
    ))
}

/// Template ids are plain file stems; anything that could leave the
/// templates directory is refused
fn validate_template_id(id: &str) -> Result<(), ConvertError> {
    if id.trim().is_empty() {
        return Err(ConvertError::InvalidArgument(
            "template id must not be empty".to_string(),
        ));
    }
    if id.contains('/') || id.contains('\\') || id.contains("..") || id.contains('\0') {
        return Err(ConvertError::PathSecurityViolation(format!(
            "template id '{}' must be a plain file name",
            id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn dir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in files {
            fs::write(dir.path().join(name), b"docx").unwrap();
        }
        dir
    }

    #[test]
    fn test_display_name_strips_prefixes() {
        assert_eq!(display_name("TEMPLATE-MACCABI"), "MACCABI");
        assert_eq!(display_name("TEMPLAE-MACCABI"), "MACCABI");
        assert_eq!(display_name("style-clear"), "style-clear");
        assert_eq!(display_name("template-lower"), "template-lower");
    }

    #[test]
    fn test_from_filename() {
        let t = Template::from_filename("TEMPLATE-BLUE.docx").unwrap();
        assert_eq!(t.id, "TEMPLATE-BLUE");
        assert_eq!(t.name, "BLUE");
        assert_eq!(t.filename, "TEMPLATE-BLUE.docx");

        assert!(Template::from_filename("notes.md").is_none());
        assert!(Template::from_filename("UPPER.DOCX").is_none());
        assert!(Template::from_filename("no_extension").is_none());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list_templates(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_empty_directory_is_empty() {
        let dir = dir_with(&[]);
        assert!(list_templates(dir.path()).is_empty());
    }

    #[test]
    fn test_sorted_by_display_name() {
        let dir = dir_with(&["TEMPLATE-B.docx", "TEMPLAE-A.docx"]);
        let names: Vec<String> = list_templates(dir.path())
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_ignores_other_files_and_directories() {
        let dir = dir_with(&["style-clear.docx", "README.md", "~lock.docx.tmp"]);
        fs::create_dir(dir.path().join("archive.docx")).unwrap();

        let templates = list_templates(dir.path());
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, "style-clear");
    }

    #[test]
    fn test_resolve_with_and_without_extension() {
        let dir = dir_with(&["style-blue.docx"]);
        let expected = dir.path().join("style-blue.docx");

        assert_eq!(resolve_template(dir.path(), "style-blue").unwrap(), expected);
        assert_eq!(
            resolve_template(dir.path(), "style-blue.docx").unwrap(),
            expected
        );
    }

    #[test]
    fn test_resolve_unknown_lists_available() {
        let dir = dir_with(&["style-blue.docx", "style-clear.docx"]);
        let err = resolve_template(dir.path(), "style-red").unwrap_err();
        match err {
            ConvertError::TemplateNotFound { id, available } => {
                assert_eq!(id, "style-red");
                assert_eq!(available, vec!["style-blue", "style-clear"]);
            }
            other => panic!("expected TemplateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = dir_with(&["style-blue.docx"]);
        for id in ["../secret", "a/b", "..\\x", "/etc/passwd"] {
            let err = resolve_template(dir.path(), id).unwrap_err();
            assert!(
                matches!(err, ConvertError::PathSecurityViolation(_)),
                "{} should be refused",
                id
            );
        }
    }

    #[test]
    fn test_resolve_default() {
        let dir = dir_with(&["style-clear.docx", "style-black.docx"]);
        let config = ConverterConfig::new(dir.path());

        assert_eq!(
            resolve_template_or_default(&config, None).unwrap(),
            dir.path().join("style-clear.docx")
        );
        assert_eq!(
            resolve_template_or_default(&config, Some("style-black")).unwrap(),
            dir.path().join("style-black.docx")
        );
        assert_eq!(
            resolve_template_or_default(&config, Some("  ")).unwrap(),
            dir.path().join("style-clear.docx")
        );
    }

    #[test]
    fn test_describe_template() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("TEMPLATE-BLUE.docx"), vec![0u8; 2048]).unwrap();

        let text = describe_template(dir.path(), "TEMPLATE-BLUE").unwrap();
        assert!(text.starts_with("Template: TEMPLATE-BLUE\nName: BLUE\n"));
        assert!(text.contains("Filename: TEMPLATE-BLUE.docx"));
        assert!(text.contains("Size: 2.0 KB"));
    }

    #[test]
    fn test_describe_unknown_template() {
        let dir = dir_with(&["style-clear.docx"]);
        let err = describe_template(dir.path(), "style-red").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Template 'style-red' not found. Available templates: style-clear"
        );
    }
}
