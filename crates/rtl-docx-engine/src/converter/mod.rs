//! Markdown to DOCX conversion: preprocessing, pandoc invocation, output naming

pub mod errors;
pub mod invoke;
pub mod output;
pub mod preprocess;

pub use errors::ConvertError;
pub use invoke::{
    check_markdown_input, convert_file, convert_markdown_to_docx, convert_to_file, pandoc_args,
};
pub use output::{output_filename, DOCX_MIME_TYPE};
pub use preprocess::{preprocess, RTL_FRONT_MATTER};
