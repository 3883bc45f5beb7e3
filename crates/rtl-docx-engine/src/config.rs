//! Converter configuration
//!
//! Every conversion takes an explicit [`ConverterConfig`] instead of reading
//! process-wide state, so transports resolve it once at startup and tests can
//! point it at scratch directories and fake converters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Template used when a caller does not name one
pub const DEFAULT_TEMPLATE_ID: &str = "style-clear";

/// Directory scanned for reference documents when nothing else is configured
pub const DEFAULT_TEMPLATES_DIR: &str = "word-template";

/// Pandoc binary name, looked up on `PATH`
pub const DEFAULT_PANDOC: &str = "pandoc";

/// Upper bound on a single pandoc run
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Settings shared by every conversion in a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Directory holding the reference `.docx` templates
    pub templates_dir: PathBuf,
    /// Pandoc executable (bare name or path)
    pub pandoc_path: PathBuf,
    /// Lua filter passed to every pandoc run
    pub filter_path: PathBuf,
    /// Template id used when a request does not specify one
    pub default_template: String,
    /// Pandoc run timeout in milliseconds
    pub timeout_ms: u64,
}

impl ConverterConfig {
    /// Create a config for the given templates directory, other fields default
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            ..Self::default()
        }
    }

    /// Use a different pandoc executable
    pub fn with_pandoc(mut self, pandoc_path: impl Into<PathBuf>) -> Self {
        self.pandoc_path = pandoc_path.into();
        self
    }

    /// Use a different Lua filter
    pub fn with_filter(mut self, filter_path: impl Into<PathBuf>) -> Self {
        self.filter_path = filter_path.into();
        self
    }

    /// Set the default template id
    pub fn with_default_template(mut self, template_id: impl Into<String>) -> Self {
        self.default_template = template_id.into();
        self
    }

    /// Set the pandoc timeout
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Pandoc timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The Lua filter shipped alongside this crate
    pub fn bundled_filter_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("filters")
            .join("rtl.lua")
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            pandoc_path: PathBuf::from(DEFAULT_PANDOC),
            filter_path: Self::bundled_filter_path(),
            default_template: DEFAULT_TEMPLATE_ID.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
