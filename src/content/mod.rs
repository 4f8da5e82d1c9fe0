//! Content module - articles, front-matter, loading and queries

mod article;
mod error;
mod frontmatter;
pub mod loader;
mod store;

pub use article::{Article, ArticleSummary};
pub use error::ContentError;
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use loader::ContentLoader;
pub use store::{CategoryCount, ContentStore};
