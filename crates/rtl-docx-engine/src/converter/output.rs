//! Output naming and content type for produced Word documents

use std::path::{Path, PathBuf};

/// MIME type of a `.docx` file
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Extension of produced documents and of reference templates
pub const DOCX_EXTENSION: &str = "docx";

/// Upload extensions accepted as Markdown by the HTTP API
pub const MARKDOWN_UPLOAD_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Attachment name for a converted upload: `notes.md` -> `notes.docx`
pub fn output_filename(input_name: &str) -> String {
    let stem = Path::new(input_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    format!("{}.{}", stem, DOCX_EXTENSION)
}

/// Default output location for a converted file: same path, `.docx` extension
pub fn default_output_path(input_path: &Path) -> PathBuf {
    input_path.with_extension(DOCX_EXTENSION)
}

/// Whether an uploaded file name carries one of the accepted extensions
pub fn is_markdown_upload(filename: &str) -> bool {
    MARKDOWN_UPLOAD_EXTENSIONS
        .iter()
        .any(|ext| filename.ends_with(&format!(".{}", ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_filename() {
        assert_eq!(output_filename("notes.md"), "notes.docx");
        assert_eq!(output_filename("סיכום פגישה.markdown"), "סיכום פגישה.docx");
        assert_eq!(output_filename("dir/report.txt"), "report.docx");
        assert_eq!(output_filename(""), "document.docx");
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/in/notes.md")),
            PathBuf::from("/tmp/in/notes.docx")
        );
    }

    #[test]
    fn test_markdown_upload_extensions() {
        assert!(is_markdown_upload("a.md"));
        assert!(is_markdown_upload("a.markdown"));
        assert!(is_markdown_upload("a.txt"));
        assert!(!is_markdown_upload("a.docx"));
        assert!(!is_markdown_upload("a.MD"));
        assert!(!is_markdown_upload("md"));
    }
}
