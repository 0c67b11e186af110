//! Front-matter parsing and validation

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

use super::post::PostImage;
use super::slug::validate_slug;
use crate::error::FieldError;

/// Field name reported when the block itself is absent or malformed
pub const FRONT_MATTER: &str = "front-matter";

/// Deserialize a scalar (string, number or bool) as text; null becomes `None`
fn opt_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

/// A single list element; null elements are dropped
struct Scalar(Option<String>);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        opt_scalar(deserializer).map(Scalar)
    }
}

/// Handles both a single string and a list of strings; null becomes `None`
fn opt_string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Option<Vec<String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(vec![value.to_string()]))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(vec![value]))
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(Scalar(item)) = seq.next_element::<Scalar>()? {
                vec.extend(item);
            }
            Ok(Some(vec))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// The `image` key: either a `{url, alt}` mapping or a bare URL
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Ref {
        #[serde(default, deserialize_with = "opt_scalar")]
        url: Option<String>,
        #[serde(default, deserialize_with = "opt_scalar")]
        alt: Option<String>,
    },
}

/// Front-matter data as written in a post, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(rename = "pubDate", deserialize_with = "opt_scalar")]
    pub pub_date: Option<String>,
    #[serde(rename = "updatedDate", deserialize_with = "opt_scalar")]
    pub updated_date: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub author: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub title: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub description: Option<String>,
    pub image: Option<ImageRef>,
    #[serde(deserialize_with = "opt_string_or_vec")]
    pub tags: Option<Vec<String>>,
    pub draft: bool,
    /// Explicit slug, overriding the one derived from the file location
    #[serde(deserialize_with = "opt_scalar")]
    pub slug: Option<String>,

    /// Additional custom fields, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Validated metadata of a single post
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub pub_date: NaiveDate,
    pub updated_date: Option<NaiveDate>,
    pub author: String,
    pub title: String,
    pub description: String,
    pub image: PostImage,
    pub tags: BTreeSet<String>,
    pub draft: bool,
    pub slug: Option<String>,
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FieldError> {
        let content = content.trim_start_matches('\u{feff}');

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Err(FieldError::new(
            FRONT_MATTER,
            "document does not start with a front-matter block",
        ))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str), FieldError> {
        let (yaml_content, remaining) = split_fenced(content, "---").ok_or_else(|| {
            FieldError::new(FRONT_MATTER, "YAML block has no closing `---` line")
        })?;

        // serde_yaml rejects an empty document; treat it as an empty mapping
        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)
            .map_err(|e| FieldError::new(FRONT_MATTER, format!("malformed YAML: {}", e)))?;

        Ok((fm, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FieldError> {
        if content.starts_with(";;;") {
            let (json_content, remaining) = split_fenced(content, ";;;").ok_or_else(|| {
                FieldError::new(FRONT_MATTER, "JSON block has no closing `;;;` line")
            })?;

            let fm = serde_json::from_str::<FrontMatter>(json_content)
                .map_err(|e| FieldError::new(FRONT_MATTER, format!("malformed JSON: {}", e)))?;

            return Ok((fm, remaining));
        }

        // A bare object at the start; the stream tells us where it ends
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<FrontMatter>();
        match stream.next() {
            Some(Ok(fm)) => {
                let remaining = content[stream.byte_offset()..].trim_start_matches(['\n', '\r']);
                Ok((fm, remaining))
            }
            Some(Err(e)) => Err(FieldError::new(
                FRONT_MATTER,
                format!("malformed JSON: {}", e),
            )),
            None => Err(FieldError::new(FRONT_MATTER, "empty JSON front-matter")),
        }
    }

    /// Check required fields and convert into typed metadata.
    ///
    /// Fields are checked in a fixed order and the first failure is returned.
    pub fn validate(self) -> Result<Metadata, FieldError> {
        let raw_date = self.pub_date.ok_or_else(|| FieldError::missing("pubDate"))?;
        let pub_date = parse_date_string(&raw_date).ok_or_else(|| {
            FieldError::new("pubDate", format!("unparseable date `{}`", raw_date))
        })?;

        let author = self.author.ok_or_else(|| FieldError::missing("author"))?;
        let title = self.title.ok_or_else(|| FieldError::missing("title"))?;
        let description = self
            .description
            .ok_or_else(|| FieldError::missing("description"))?;

        let (url, alt) = match self.image.ok_or_else(|| FieldError::missing("image"))? {
            ImageRef::Url(url) => (Some(url), None),
            ImageRef::Ref { url, alt } => (url, alt),
        };
        let url = url.ok_or_else(|| FieldError::missing("image.url"))?;
        if url.trim().is_empty() {
            return Err(FieldError::new("image.url", "must not be empty"));
        }
        // Empty alt text is allowed, an absent one is not
        let alt = alt.ok_or_else(|| FieldError::missing("image.alt"))?;

        let tags = self
            .tags
            .ok_or_else(|| FieldError::missing("tags"))?
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let updated_date = match self.updated_date {
            Some(raw) => {
                let updated = parse_date_string(&raw).ok_or_else(|| {
                    FieldError::new("updatedDate", format!("unparseable date `{}`", raw))
                })?;
                if updated < pub_date {
                    return Err(FieldError::new(
                        "updatedDate",
                        format!("{} is earlier than pubDate {}", updated, pub_date),
                    ));
                }
                Some(updated)
            }
            None => None,
        };

        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }

        Ok(Metadata {
            pub_date,
            updated_date,
            author,
            title,
            description,
            image: PostImage { url, alt },
            tags,
            draft: self.draft,
            slug: self.slug,
            extra: self.extra,
        })
    }
}

/// Split `fence`-delimited block from the rest of the document.
/// Both fences must sit on their own line.
fn split_fenced<'a>(content: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let rest = content.strip_prefix(fence)?;
    let line_end = rest.find('\n')? + 1;
    if !rest[..line_end].trim().is_empty() {
        return None;
    }

    let block = &rest[line_end..];
    let mut offset = 0;
    for line in block.split_inclusive('\n') {
        if line.trim_end() == fence {
            let remaining = &block[offset + line.len()..];
            return Some((&block[..offset], remaining.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }

    None
}

/// Parse a date string in various formats, keeping only the calendar date
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // RFC 3339 / ISO 8601 with offset: keep the date as written
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}
