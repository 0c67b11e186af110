//! Content module - front-matter parsing, post loading and indexing

pub mod frontmatter;
mod index;
pub mod loader;
mod post;
pub mod slug;

pub use frontmatter::FrontMatter;
pub use index::PostIndex;
pub use loader::{LoadReport, PostLoader};
pub use post::{Post, PostImage};
