//! Content loader - reads every article from the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::ContentError;
use super::{Article, ContentStore};

/// Loads articles from a content directory
pub struct ContentLoader {
    content_dir: PathBuf,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
        }
    }

    /// Load and validate every article
    ///
    /// The first authoring error aborts the load. A missing content
    /// directory yields an empty store.
    pub fn load(&self) -> Result<ContentStore, ContentError> {
        if !self.content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", self.content_dir);
            return Ok(ContentStore::default());
        }

        let mut articles = Vec::new();

        for entry in WalkDir::new(&self.content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = entry.map_err(|e| ContentError::Io {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.content_dir.clone()),
                source: e.into(),
            })?;
            let path = entry.path();
            if path.is_file() && is_content_file(path) {
                articles.push(self.load_article(path)?);
            }
        }

        tracing::debug!(
            "Loaded {} articles from {:?}",
            articles.len(),
            self.content_dir
        );

        ContentStore::from_articles(articles)
    }

    /// Load a single article from a file
    fn load_article(&self, path: &Path) -> Result<Article, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Article::from_source(path, &content)
    }
}

/// Check if a file is an article source
pub(crate) fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "mdx" | "markdown"))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') && n.len() > 1 && n != "..")
        .unwrap_or(false)
}
