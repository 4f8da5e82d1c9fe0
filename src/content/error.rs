//! Authoring errors raised while loading content

use std::path::PathBuf;

use super::frontmatter::FrontMatterError;

/// An authoring error in the content set; aborts the build
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("{path:?}: missing required front-matter field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("{path:?}: unrecognized publishedAt value `{value}`")]
    InvalidDate { path: PathBuf, value: String },

    #[error("{path:?}: cannot derive a slug from the file name")]
    InvalidSlug { path: PathBuf },

    #[error("{path:?}: category `{category}` has no URL-safe characters")]
    InvalidCategory { path: PathBuf, category: String },

    #[error("duplicate slug `{slug}` in {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}
