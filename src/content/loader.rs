//! Content loader - loads posts from a source directory

use glob::{MatchOptions, Pattern};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::slug::slug_from_path;
use super::{FrontMatter, Post};
use crate::config::{BlogConfig, ErrorPolicy};
use crate::error::{FieldError, LoadError};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Outcome of a load: the valid posts plus any per-document failures
/// collected under [`ErrorPolicy::Skip`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Posts sorted by publication date (newest first), then slug
    pub posts: Vec<Post>,
    pub errors: Vec<LoadError>,
}

impl LoadReport {
    /// True when no document failed
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// The posts, or the first recorded failure
    pub fn into_posts(self) -> Result<Vec<Post>, LoadError> {
        let LoadReport { posts, errors } = self;
        match errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(posts),
        }
    }
}

/// Loads posts from a directory of front-matter documents
pub struct PostLoader {
    config: BlogConfig,
    exclude: Vec<Pattern>,
}

impl PostLoader {
    /// Create a new loader, compiling the exclude patterns
    pub fn new(config: BlogConfig) -> Result<Self, LoadError> {
        let exclude = config
            .exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { config, exclude })
    }

    /// Load every post below `source`
    pub fn load_all<P: AsRef<Path>>(&self, source: P) -> Result<LoadReport, LoadError> {
        let source = source.as_ref();
        if !source.is_dir() {
            return Err(LoadError::NotFound {
                path: source.to_path_buf(),
            });
        }

        let mut report = LoadReport::default();
        // slug -> document that claimed it first
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();

        let walker = WalkDir::new(source)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(source, e.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Only a broken post document counts as a failure
                    let is_post = e
                        .path()
                        .map(|p| self.is_post_file(source, p))
                        .unwrap_or(false);
                    if is_post {
                        self.fail(&mut report, e.into())?;
                    } else {
                        tracing::debug!("Ignoring walk error on a non-post entry: {}", e);
                    }
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !self.has_post_extension(path) {
                continue;
            }

            let post = match self.load_post(source, path) {
                Ok(Some(post)) => post,
                Ok(None) => continue,
                Err(e) => {
                    self.fail(&mut report, e)?;
                    continue;
                }
            };

            if let Some(first) = claimed.get(&post.slug) {
                let err = LoadError::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: first.clone(),
                    second: post.full_source.clone(),
                };
                self.fail(&mut report, err)?;
                continue;
            }

            claimed.insert(post.slug.clone(), post.full_source.clone());
            report.posts.push(post);
        }

        sort_posts(&mut report.posts);

        tracing::info!(
            "Loaded {} posts from {:?} ({} failed)",
            report.posts.len(),
            source,
            report.errors.len()
        );

        Ok(report)
    }

    /// Apply the error policy to a failed document
    fn fail(&self, report: &mut LoadReport, err: LoadError) -> Result<(), LoadError> {
        match self.config.on_error {
            ErrorPolicy::Abort => Err(err),
            ErrorPolicy::Skip => {
                tracing::warn!("Skipping document: {}", err);
                report.errors.push(err);
                Ok(())
            }
        }
    }

    fn has_post_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.config.is_post_extension(e))
            .unwrap_or(false)
    }

    /// An excluded directory excludes everything below it
    fn is_excluded(&self, source: &Path, path: &Path) -> bool {
        let relative = path.strip_prefix(source).unwrap_or(path);
        let excluded = relative
            .ancestors()
            .filter(|a| !a.as_os_str().is_empty())
            .any(|a| {
                self.exclude
                    .iter()
                    .any(|p| p.matches_path_with(a, MATCH_OPTIONS))
            });
        if excluded {
            tracing::debug!("Excluded {:?}", relative);
        }
        excluded
    }

    fn is_post_file(&self, source: &Path, path: &Path) -> bool {
        self.has_post_extension(path) && !self.is_excluded(source, path)
    }

    /// Load a single post; `None` for drafts that are not included
    fn load_post(&self, source: &Path, path: &Path) -> Result<Option<Post>, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (fm, body) = FrontMatter::parse(&content).map_err(|e| e.at(path))?;
        let meta = fm.validate().map_err(|e| e.at(path))?;

        if meta.draft && !self.config.include_drafts {
            tracing::debug!("Skipping draft {:?}", path);
            return Ok(None);
        }

        let relative = path.strip_prefix(source).unwrap_or(path);
        let slug = slug_from_path(relative);
        if slug.is_empty() && meta.slug.is_none() {
            return Err(FieldError::new("slug", "file name does not yield a slug")
                .at(path)
                .into());
        }

        let post = Post::new(
            slug,
            meta,
            body,
            relative.to_string_lossy().to_string(),
            path.to_path_buf(),
        );
        tracing::debug!("Loaded post {:?} from {:?}", post.slug, relative);

        Ok(Some(post))
    }
}

/// Sort by date descending (newest first), ties by slug ascending
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.pub_date
            .cmp(&a.pub_date)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}
