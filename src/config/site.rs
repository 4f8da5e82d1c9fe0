//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::author::AuthorProfile;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,
    pub public_dir: String,
    pub blog_dir: String,
    pub category_dir: String,

    // Writing
    pub render_drafts: bool,
    pub words_per_minute: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Widgets
    #[serde(default)]
    pub newsletter: NewsletterConfig,

    // Feed
    pub feed_limit: usize,

    // Author card
    #[serde(default)]
    pub author: AuthorProfile,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Penfolio".to_string(),
            description: String::new(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),
            category_dir: "category".to_string(),

            render_drafts: false,
            words_per_minute: 200,
            highlight: HighlightConfig::default(),

            newsletter: NewsletterConfig::default(),

            feed_limit: 20,

            author: AuthorProfile::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Site-relative URL for a path, honoring `root`
    pub fn url_for(&self, path: &str) -> String {
        let root = if self.root.ends_with('/') {
            self.root.clone()
        } else {
            format!("{}/", self.root)
        };
        format!("{}{}", root, path.trim_start_matches('/'))
    }

    /// Absolute URL for a path
    pub fn full_url_for(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.url_for(path))
    }

    /// Detail page path of an article
    pub fn article_path(&self, slug: &str) -> String {
        format!("{}/{}/", self.blog_dir.trim_matches('/'), slug)
    }

    /// Listing path of a category
    pub fn category_path(&self, category_slug: &str) -> String {
        format!("{}/{}/", self.category_dir.trim_matches('/'), category_slug)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Inline newsletter signup widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub enable: bool,
    pub action: String,
    pub heading: String,
    pub description: String,
    pub placeholder: String,
    pub button: String,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            enable: true,
            action: "/subscribe".to_string(),
            heading: "Subscribe to the newsletter".to_string(),
            description: "Get new articles delivered to your inbox.".to_string(),
            placeholder: "you@example.com".to_string(),
            button: "Subscribe".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Penfolio");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.feed_limit, 20);
        assert!(!config.render_drafts);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
url: https://blog.example.org/
render_drafts: true
newsletter:
  action: https://buttondown.email/api/emails/embed-subscribe/me
author:
  name: Sam Writer
  portrait: /images/sam.png
  bio: Writes about testing.
  links:
    - platform: GitHub
      url: https://github.com/sam
analytics_id: UA-123
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert!(config.render_drafts);
        assert_eq!(
            config.newsletter.action,
            "https://buttondown.email/api/emails/embed-subscribe/me"
        );
        assert_eq!(config.newsletter.button, "Subscribe");
        assert_eq!(config.author.name, "Sam Writer");
        assert_eq!(config.author.links.len(), 1);
        assert!(config.extra.contains_key("analytics_id"));
    }

    #[test]
    fn test_urls() {
        let config = SiteConfig {
            url: "https://blog.example.org/".to_string(),
            root: "/site".to_string(),
            ..Default::default()
        };
        assert_eq!(config.url_for("/blog/a/"), "/site/blog/a/");
        assert_eq!(
            config.full_url_for(&config.article_path("a")),
            "https://blog.example.org/site/blog/a/"
        );
        assert_eq!(config.category_path("testing"), "category/testing/");
    }
}
