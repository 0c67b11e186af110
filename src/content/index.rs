//! Read-only lookups over a loaded post collection

use chrono::Datelike;
use std::collections::{BTreeMap, HashMap};

use super::Post;

/// An ordered post collection with slug, tag, year and author lookups
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
    posts: Vec<Post>,
    by_slug: HashMap<String, usize>,
}

impl PostIndex {
    /// Wrap posts that are already in collection order
    pub fn new(posts: Vec<Post>) -> Self {
        let by_slug = posts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.slug.clone(), i))
            .collect();
        Self { posts, by_slug }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.by_slug.get(slug).map(|&i| &self.posts[i])
    }

    /// The post published just after this one
    pub fn newer(&self, slug: &str) -> Option<&Post> {
        let pos = *self.by_slug.get(slug)?;
        if pos > 0 {
            Some(&self.posts[pos - 1])
        } else {
            None
        }
    }

    /// The post published just before this one
    pub fn older(&self, slug: &str) -> Option<&Post> {
        let pos = *self.by_slug.get(slug)?;
        self.posts.get(pos + 1)
    }

    /// Tags with their post counts, most used first
    pub fn tags(&self) -> Vec<(&str, usize)> {
        let mut tags: HashMap<&str, usize> = HashMap::new();
        for post in &self.posts {
            for tag in &post.tags {
                *tags.entry(tag.as_str()).or_insert(0) += 1;
            }
        }
        let mut tags: Vec<_> = tags.into_iter().collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        tags
    }

    /// Posts carrying `tag`, in collection order
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts.iter().filter(move |p| p.has_tag(tag))
    }

    /// Posts grouped by publication year, newest year first
    pub fn by_year(&self) -> Vec<(i32, Vec<&Post>)> {
        let mut years: BTreeMap<i32, Vec<&Post>> = BTreeMap::new();
        for post in &self.posts {
            years.entry(post.pub_date.year()).or_default().push(post);
        }
        years.into_iter().rev().collect()
    }

    /// Distinct authors with their post counts, sorted by name
    pub fn authors(&self) -> Vec<(&str, usize)> {
        let mut authors: BTreeMap<&str, usize> = BTreeMap::new();
        for post in &self.posts {
            *authors.entry(post.author.as_str()).or_insert(0) += 1;
        }
        authors.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::frontmatter::Metadata;
    use crate::content::loader::sort_posts;
    use crate::content::PostImage;
    use chrono::NaiveDate;
    use indexmap::IndexMap;
    use std::path::PathBuf;

    fn post(slug: &str, date: (i32, u32, u32), author: &str, tags: &[&str]) -> Post {
        let meta = Metadata {
            pub_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            updated_date: None,
            author: author.to_string(),
            title: slug.to_string(),
            description: String::new(),
            image: PostImage {
                url: "/cover.png".to_string(),
                alt: String::new(),
            },
            tags: tags.iter().map(|t| t.to_string()).collect(),
            draft: false,
            slug: None,
            extra: IndexMap::new(),
        };
        let source = format!("{}.md", slug);
        Post::new(
            slug.to_string(),
            meta,
            "",
            source.clone(),
            PathBuf::from(source),
        )
    }

    fn index() -> PostIndex {
        let mut posts = vec![
            post("srp", (2025, 11, 30), "Jane", &["solid", "oop"]),
            post("ocp", (2025, 11, 30), "Jane", &["solid"]),
            post("roadmap", (2024, 6, 1), "Sam", &["career"]),
            post("plantuml", (2026, 1, 19), "Jane", &["uml", "oop"]),
        ];
        sort_posts(&mut posts);
        PostIndex::new(posts)
    }

    #[test]
    fn test_lookup_and_neighbours() {
        let index = index();
        assert_eq!(index.len(), 4);
        assert_eq!(index.get("ocp").unwrap().title, "ocp");
        assert!(index.get("missing").is_none());

        assert_eq!(index.newer("ocp").unwrap().slug, "plantuml");
        assert_eq!(index.older("ocp").unwrap().slug, "srp");
        assert!(index.newer("plantuml").is_none());
        assert!(index.older("roadmap").is_none());
        assert!(index.older("missing").is_none());
    }

    #[test]
    fn test_tags() {
        let index = index();
        assert_eq!(
            index.tags(),
            vec![("oop", 2), ("solid", 2), ("career", 1), ("uml", 1)]
        );
        let tagged: Vec<_> = index.tagged("oop").map(|p| p.slug.as_str()).collect();
        assert_eq!(tagged, vec!["plantuml", "srp"]);
        assert_eq!(index.tagged("nothing").count(), 0);
    }

    #[test]
    fn test_by_year() {
        let index = index();
        let years: Vec<_> = index
            .by_year()
            .into_iter()
            .map(|(year, posts)| (year, posts.len()))
            .collect();
        assert_eq!(years, vec![(2026, 1), (2025, 2), (2024, 1)]);
    }

    #[test]
    fn test_authors() {
        assert_eq!(index().authors(), vec![("Jane", 3), ("Sam", 1)]);
    }

    #[test]
    fn test_empty_index() {
        let index = PostIndex::default();
        assert!(index.is_empty());
        assert!(index.tags().is_empty());
        assert!(index.by_year().is_empty());
    }
}
