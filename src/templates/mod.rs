//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping is off; templates
//! escape author-supplied text explicitly with the `esc` filter and emit
//! pre-rendered fragments (article bodies, the author card) verbatim.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Article, CategoryCount};
use crate::helpers::{date_xml, format_date, html_escape, truncate};

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        register_filters(&mut tera);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("article.html", include_str!("site/article.html")),
            ("category.html", include_str!("site/category.html")),
            ("about.html", include_str!("site/about.html")),
            (
                "partials/macros.html",
                include_str!("site/partials/macros.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Turn autoescaping off and register the site filters
pub(crate) fn register_filters(tera: &mut Tera) {
    tera.autoescape_on(vec![]);
    tera.register_filter("esc", esc_filter);
    tera.register_filter("truncate_chars", truncate_chars_filter);
    tera.register_filter("date_format", date_format_filter);
}

/// Tera filter: escape HTML special characters (slashes left intact)
fn esc_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    match value {
        tera::Value::Null => Ok(tera::Value::String(String::new())),
        tera::Value::String(s) => Ok(tera::Value::String(html_escape(s))),
        other => Ok(tera::Value::String(html_escape(&other.to_string()))),
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(tera::Value::String(truncate(&s, length, &omission)))
}

/// Tera filter: format an ISO date-time string with a Moment.js-style format
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    match chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S") {
        Ok(date) => Ok(tera::Value::String(format_date(&date, &format))),
        // Not one of ours; leave it as written
        Err(_) => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

impl ConfigData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.url_for(""),
        }
    }
}

/// An article as listings and detail pages see it
#[derive(Debug, Clone, Serialize)]
pub struct ArticleData {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub category: String,
    pub category_url: String,
    pub url: String,
    /// `%Y-%m-%dT%H:%M:%S`, consumed by the `date_format` filter
    pub date: String,
    /// RFC 3339, for `<time datetime>`
    pub datetime: String,
    pub popular: bool,
}

impl ArticleData {
    pub fn from_article(article: &Article, config: &SiteConfig) -> Self {
        let summary = article.summary();
        Self {
            url: config.url_for(&config.article_path(&summary.slug)),
            category_url: config.url_for(&config.category_path(&summary.category_slug)),
            date: summary.published_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            datetime: date_xml(&summary.published_at),
            slug: summary.slug,
            title: summary.title,
            excerpt: summary.excerpt,
            image: summary.image,
            category: summary.category,
            popular: article.popular,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub slug: String,
    pub url: String,
    pub count: usize,
}

impl CategoryData {
    pub fn from_count(category: &CategoryCount, config: &SiteConfig) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            url: config.url_for(&config.category_path(&category.slug)),
            count: category.count,
        }
    }
}
