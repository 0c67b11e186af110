//! postdex: loads a directory of blog posts into a validated, ordered index
//!
//! Each post is a document with a front-matter block (YAML or JSON) followed
//! by an opaque body. Posts are validated, given a slug from their location,
//! and returned newest first for a downstream renderer.

pub mod config;
pub mod content;
pub mod error;

pub use config::{BlogConfig, ErrorPolicy};
pub use content::{LoadReport, Post, PostImage, PostIndex, PostLoader};
pub use error::{FieldError, LoadError, ValidationError};

use anyhow::Result;
use std::path::Path;

/// A blog rooted at a base directory
#[derive(Clone)]
pub struct Blog {
    /// Blog configuration
    pub config: BlogConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Post source directory
    pub source_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            BlogConfig::load(&config_path)?
        } else {
            BlogConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
        })
    }

    /// Load all posts according to the configured error policy
    pub fn load_posts(&self) -> std::result::Result<LoadReport, LoadError> {
        PostLoader::new(self.config.clone())?.load_all(&self.source_dir)
    }

    /// Load all posts and build an index; any failure is an error
    pub fn index(&self) -> std::result::Result<PostIndex, LoadError> {
        let posts = self.load_posts()?.into_posts()?;
        Ok(PostIndex::new(posts))
    }
}

/// Load every post below `source` with the default configuration,
/// aborting on the first invalid document.
pub fn load_all<P: AsRef<Path>>(source: P) -> std::result::Result<Vec<Post>, LoadError> {
    PostLoader::new(BlogConfig::default())?
        .load_all(source)?
        .into_posts()
}
