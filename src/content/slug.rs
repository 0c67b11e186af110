//! Slug derivation from a post's location

use std::path::{Component, Path};

use crate::error::FieldError;

/// Derive a slug from a path relative to the collection root.
///
/// `solid/Open Closed.md` becomes `solid/open-closed`, and `roadmap/index.md`
/// becomes `roadmap`. A root-level `index.md` is `index`.
pub fn slug_from_path(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .filter_map(|c| match c {
            Component::Normal(s) => Some(::slug::slugify(s.to_string_lossy())),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    let stem = relative
        .file_stem()
        .map(|s| ::slug::slugify(s.to_string_lossy()))
        .unwrap_or_default();

    // A stem with nothing sluggable does not identify the file
    if stem.is_empty() {
        return String::new();
    }

    if stem != "index" || segments.is_empty() {
        segments.push(stem);
    }

    segments.join("/")
}

/// Check an explicit slug: lowercase kebab-case segments joined by `/`
pub fn validate_slug(slug: &str) -> Result<(), FieldError> {
    let is_valid = !slug.is_empty()
        && slug.split('/').all(|segment| {
            !segment.is_empty()
                && !segment.starts_with('-')
                && !segment.ends_with('-')
                && !segment.contains("--")
                && segment
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        });

    if is_valid {
        Ok(())
    } else {
        Err(FieldError::new(
            "slug",
            format!("`{}` is not lowercase kebab-case", slug),
        ))
    }
}
