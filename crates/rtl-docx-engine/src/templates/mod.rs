//! Template discovery and resolution

pub mod registry;

pub use registry::{
    describe_template, find_template, list_templates, resolve_template,
    resolve_template_or_default, template_ids, Template,
};
