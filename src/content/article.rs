//! Article model

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::error::ContentError;
use super::FrontMatter;

/// A blog article, one per content file
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    /// URL-safe identifier, from the `slug` override or the file stem
    pub slug: String,

    /// Display heading
    pub title: String,

    /// Category name as authored
    pub category: String,

    /// Publication date, the listing sort key
    pub published_at: NaiveDateTime,

    /// Gates visibility in public listings
    pub is_published: bool,

    /// Promotes the article into featured sections
    pub popular: bool,

    /// Cover image path or URI
    pub image: Option<String>,

    /// Short text shown in listings
    pub excerpt: String,

    /// Raw body source (Markdown with inline directives), rendered on demand
    pub body: String,

    /// Source file path
    pub source: PathBuf,

    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// The listing surface of an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub category: String,
    pub category_slug: String,
    pub published_at: NaiveDateTime,
}

impl Article {
    /// Build an article from a content file's text
    ///
    /// Fails when the front-matter cannot be parsed or a required key
    /// (`title`, `category`, `publishedAt`, `isPublished`, `excerpt`) is absent.
    pub fn from_source(path: &Path, content: &str) -> Result<Self, ContentError> {
        let (fm, body) = FrontMatter::parse(content).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

        let missing = |field: &'static str| ContentError::MissingField {
            path: path.to_path_buf(),
            field,
        };

        let title = required_text(fm.title.as_deref()).ok_or_else(|| missing("title"))?;
        let category = required_text(fm.category.as_deref()).ok_or_else(|| missing("category"))?;
        if slug::slugify(&category).is_empty() {
            return Err(ContentError::InvalidCategory {
                path: path.to_path_buf(),
                category,
            });
        }
        let excerpt = required_text(fm.excerpt.as_deref()).ok_or_else(|| missing("excerpt"))?;
        let is_published = fm.is_published.ok_or_else(|| missing("isPublished"))?;

        let raw_date = fm.published_at.as_deref().ok_or_else(|| missing("publishedAt"))?;
        let published_at = fm
            .parse_published_at()
            .ok_or_else(|| ContentError::InvalidDate {
                path: path.to_path_buf(),
                value: raw_date.to_string(),
            })?;

        let slug_source = match fm.slug.as_deref() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
        };
        let slug = slug::slugify(&slug_source);
        if slug.is_empty() {
            return Err(ContentError::InvalidSlug {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            slug,
            title,
            category,
            published_at,
            is_published,
            popular: fm.popular.unwrap_or(false),
            image: fm.image.filter(|i| !i.trim().is_empty()),
            excerpt,
            body: body.to_string(),
            source: path.to_path_buf(),
            extra: fm.extra,
        })
    }

    /// URL-safe form of the category
    pub fn category_slug(&self) -> String {
        slug::slugify(&self.category)
    }

    /// Listing surface of this article
    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            image: self.image.clone(),
            category: self.category.clone(),
            category_slug: self.category_slug(),
            published_at: self.published_at,
        }
    }

    /// Estimated reading time in whole minutes (at least one)
    pub fn reading_time(&self, words_per_minute: usize) -> usize {
        let words = self.body.split_whitespace().count();
        let wpm = words_per_minute.max(1);
        words.div_ceil(wpm).max(1)
    }
}

fn required_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
