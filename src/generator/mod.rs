//! Generator module - writes the static site using the built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::author::AuthorCard;
use crate::content::{Article, ContentStore};
use crate::helpers::{absolutize_urls, date_xml, escape_xml, strip_html, strip_invalid_xml_chars};
use crate::render::{BodyRenderer, RenderedBody};
use crate::templates::{ArticleData, CategoryData, ConfigData, TemplateRenderer};
use crate::Site;

/// A directive that rendered nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedDirective {
    pub article: String,
    pub directive: String,
}

/// What a build wrote
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Articles with a detail page
    pub articles: usize,
    pub drafts_skipped: usize,
    /// HTML pages, the feed and the search index
    pub pages_written: usize,
    pub assets_copied: usize,
    pub unresolved_directives: Vec<UnresolvedDirective>,
}

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    body_renderer: BodyRenderer,
    author_card: String,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let body_renderer = BodyRenderer::from_config(&site.config);
        let author_card = AuthorCard::new(&site.config.author)?.render()?;

        Ok(Self {
            site: site.clone(),
            renderer,
            body_renderer,
            author_card,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, store: &ContentStore) -> Result<BuildReport> {
        let mut report = BuildReport::default();

        fs::create_dir_all(&self.site.public_dir)?;

        report.assets_copied = self.copy_static_assets()?;

        // Drafts get a detail page only when asked for
        let detail: Vec<&Article> = if self.site.config.render_drafts {
            store.iter().collect()
        } else {
            report.drafts_skipped = store.list_drafts().len();
            store.list_published()
        };

        let bodies: HashMap<&str, RenderedBody> = detail
            .iter()
            .map(|a| (a.slug.as_str(), self.body_renderer.render(&a.body)))
            .collect();

        for article in &detail {
            if let Some(body) = bodies.get(article.slug.as_str()) {
                for name in &body.unresolved {
                    report.unresolved_directives.push(UnresolvedDirective {
                        article: article.slug.clone(),
                        directive: name.clone(),
                    });
                }
            }
        }

        self.generate_index(store)?;
        report.pages_written += 1;

        for article in &detail {
            let body = bodies
                .get(article.slug.as_str())
                .cloned()
                .unwrap_or_default();
            self.generate_article(article, &body)?;
            report.pages_written += 1;
            report.articles += 1;
        }

        report.pages_written += self.generate_categories(store)?;

        self.generate_about()?;
        report.pages_written += 1;

        self.generate_atom_feed(store, &bodies)?;
        report.pages_written += 1;

        self.generate_search_index(store, &bodies)?;
        report.pages_written += 1;

        tracing::info!(
            "Wrote {} pages ({} articles, {} drafts skipped, {} assets)",
            report.pages_written,
            report.articles,
            report.drafts_skipped,
            report.assets_copied
        );

        Ok(report)
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let config = &self.site.config;
        let mut context = Context::new();
        context.insert("config", &ConfigData::from_config(config));
        context.insert("page_title", &"");
        context.insert("page_description", &config.description);
        context.insert("page_image", &Option::<String>::None);
        context.insert("author_card", &self.author_card);
        context.insert("author_name", &config.author.name);
        context.insert("year", &chrono::Local::now().year());
        context
    }

    fn article_data(&self, articles: &[&Article]) -> Vec<ArticleData> {
        articles
            .iter()
            .map(|a| ArticleData::from_article(a, &self.site.config))
            .collect()
    }

    /// Generate the home page
    fn generate_index(&self, store: &ContentStore) -> Result<()> {
        let categories: Vec<CategoryData> = store
            .categories()
            .iter()
            .map(|c| CategoryData::from_count(c, &self.site.config))
            .collect();

        let mut context = self.create_base_context();
        context.insert("popular", &self.article_data(&store.list_popular()));
        context.insert("articles", &self.article_data(&store.list_published()));
        context.insert("categories", &categories);

        let html = self.renderer.render("index.html", &context)?;
        self.write_output("index.html", &html)
    }

    /// Generate one article detail page
    fn generate_article(&self, article: &Article, body: &RenderedBody) -> Result<()> {
        let config = &self.site.config;

        let mut context = self.create_base_context();
        context.insert("page_title", &article.title);
        context.insert("page_description", &article.excerpt);
        context.insert("page_image", &article.image);
        context.insert("article", &ArticleData::from_article(article, config));
        context.insert("reading_time", &article.reading_time(config.words_per_minute));
        context.insert("toc", &body.toc);
        context.insert("body", &body.html);

        let html = self
            .renderer
            .render("article.html", &context)
            .with_context(|| format!("Failed to render article {:?}", article.source))?;

        let path = format!("{}index.html", config.article_path(&article.slug));
        self.write_output(&path, &html)
    }

    /// Generate one listing per category with published articles
    fn generate_categories(&self, store: &ContentStore) -> Result<usize> {
        let config = &self.site.config;
        let mut written = 0;

        for category in store.categories() {
            let articles = store.list_by_category(&category.slug);

            let mut context = self.create_base_context();
            context.insert("page_title", &category.name);
            context.insert("category", &CategoryData::from_count(&category, config));
            context.insert("articles", &self.article_data(&articles));

            let html = self.renderer.render("category.html", &context)?;
            let path = format!("{}index.html", config.category_path(&category.slug));
            self.write_output(&path, &html)?;
            written += 1;
        }

        Ok(written)
    }

    /// Generate the about page
    fn generate_about(&self) -> Result<()> {
        let mut context = self.create_base_context();
        context.insert("page_title", &"About");
        context.insert("page_description", &self.site.config.author.bio);
        context.insert("page_image", &Some(&self.site.config.author.portrait));

        let html = self.renderer.render("about.html", &context)?;
        self.write_output("about/index.html", &html)
    }

    /// Generate the Atom feed of the newest published articles
    fn generate_atom_feed(
        &self,
        store: &ContentStore,
        bodies: &HashMap<&str, RenderedBody>,
    ) -> Result<()> {
        let config = &self.site.config;
        let base_url = config.url.trim_end_matches('/');
        let published = store.list_published();

        let updated = published
            .first()
            .map(|a| date_xml(&a.published_at))
            .unwrap_or_else(|| date_xml(&chrono::Utc::now().naive_utc()));

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            config.full_url_for("atom.xml")
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", config.full_url_for("")));
        feed.push_str(&format!("  <updated>{}</updated>\n", updated));
        feed.push_str(&format!("  <id>{}</id>\n", config.full_url_for("")));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author.name)
        ));

        for article in published.iter().take(config.feed_limit) {
            let link = config.full_url_for(&config.article_path(&article.slug));
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&article.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                date_xml(&article.published_at)
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                date_xml(&article.published_at)
            ));
            feed.push_str(&format!(
                "    <category term=\"{}\"/>\n",
                escape_xml(&article.category)
            ));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&article.excerpt)
            ));
            if let Some(body) = bodies.get(article.slug.as_str()) {
                let content = strip_invalid_xml_chars(&absolutize_urls(&body.html, base_url));
                // A literal terminator would close the section early
                let content = content.replace("]]>", "]]]]><![CDATA[>");
                feed.push_str(&format!(
                    "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                    content
                ));
            }
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        self.write_output("atom.xml", &feed)
    }

    /// Generate the client-side search index
    fn generate_search_index(
        &self,
        store: &ContentStore,
        bodies: &HashMap<&str, RenderedBody>,
    ) -> Result<()> {
        let config = &self.site.config;
        let search_data: Vec<serde_json::Value> = store
            .list_published()
            .iter()
            .map(|a| {
                serde_json::json!({
                    "title": a.title,
                    "url": config.url_for(&config.article_path(&a.slug)),
                    "excerpt": a.excerpt,
                    "category": a.category,
                    "date": a.published_at.format("%Y-%m-%d").to_string(),
                    "content": bodies
                        .get(a.slug.as_str())
                        .map(|b| strip_html(&b.html))
                        .unwrap_or_default(),
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&search_data)?;
        self.write_output("search.json", &json)
    }

    /// Copy static assets verbatim to the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = entry
                .with_context(|| format!("Failed to walk static assets in {:?}", static_dir))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
            copied += 1;
        }

        Ok(copied)
    }

    /// Write a file below the public directory
    fn write_output(&self, relative: &str, contents: &str) -> Result<()> {
        let output_path = self.site.public_dir.join(relative.trim_start_matches('/'));
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, contents)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
