//! Post model

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::frontmatter::Metadata;

/// Cover image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImage {
    pub url: String,
    /// Alt text, possibly empty
    pub alt: String,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier, derived from the source location
    pub slug: String,

    /// Publication date
    pub pub_date: NaiveDate,

    /// Last updated date
    pub updated_date: Option<NaiveDate>,

    pub author: String,

    pub title: String,

    pub description: String,

    pub image: PostImage,

    /// Post tags
    pub tags: BTreeSet<String>,

    /// Whether the post is marked as a draft
    pub draft: bool,

    /// Raw body after the front-matter
    pub body: String,

    /// Source file path (relative to the collection root)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Custom front-matter fields
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Post {
    /// Build a post from validated metadata.
    ///
    /// An explicit slug in the metadata wins over `derived_slug`.
    pub fn new(
        derived_slug: String,
        meta: Metadata,
        body: &str,
        source: String,
        full_source: PathBuf,
    ) -> Self {
        Self {
            slug: meta.slug.unwrap_or(derived_slug),
            pub_date: meta.pub_date,
            updated_date: meta.updated_date,
            author: meta.author,
            title: meta.title,
            description: meta.description,
            image: meta.image,
            tags: meta.tags,
            draft: meta.draft,
            body: body.to_string(),
            source,
            full_source,
            extra: meta.extra,
        }
    }

    /// Whether the post carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
