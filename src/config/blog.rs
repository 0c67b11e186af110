//! Blog configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What the loader does when a single document fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failing document
    #[default]
    Abort,
    /// Leave the document out, record the error and keep going
    Skip,
}

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Directory
    pub source_dir: String,
    pub exclude: Vec<String>,
    pub extensions: Vec<String>,
    pub follow_links: bool,

    // Loading
    pub on_error: ErrorPolicy,
    pub include_drafts: bool,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            source_dir: "src/content/blog".to_string(),
            exclude: vec!["**/_*".to_string()],
            extensions: vec!["md".to_string(), "markdown".to_string(), "mdx".to_string()],
            follow_links: true,

            on_error: ErrorPolicy::Abort,
            include_drafts: false,
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: BlogConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Whether `extension` names a post document
    pub fn is_post_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}
