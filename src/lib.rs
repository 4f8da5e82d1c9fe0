//! penfolio: a static renderer for a personal blog and portfolio
//!
//! Articles are authored as front-matter + Markdown files with inline
//! component directives (`<Newsletter />`) and fenced code samples. The
//! crate loads them into a read-only [`content::ContentStore`], renders
//! bodies with [`render::BodyRenderer`], renders the fixed author card with
//! [`author::AuthorCard`] and writes the site with [`generator::Generator`].

pub mod author;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod render;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The configuration file read from the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// A site rooted at a directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Article sources
    pub content_dir: PathBuf,
    /// Static assets copied verbatim
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            static_dir,
            public_dir,
        }
    }

    /// Load and validate every article
    pub fn load_content(&self) -> Result<content::ContentStore> {
        Ok(content::ContentStore::load(&self.content_dir)?)
    }

    /// Build the static site
    pub fn build(&self) -> Result<generator::BuildReport> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
