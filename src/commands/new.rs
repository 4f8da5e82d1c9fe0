//! Create a new article

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create `content/<slug>.mdx` with front-matter pre-filled
pub fn create_article(
    site: &Site,
    title: &str,
    category: Option<&str>,
    draft: bool,
) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&site.content_dir)?;
    let file_path = site.content_dir.join(format!("{}.mdx", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let content = format!(
        "---\ntitle: {}\ncategory: {}\npublishedAt: {}\nisPublished: {}\npopular: false\nexcerpt: {}\n---\n\n",
        yaml_string(title),
        yaml_string(category.unwrap_or("Uncategorized")),
        now.format("%Y-%m-%d"),
        !draft,
        yaml_string(title),
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a scalar so titles like `Testing: a primer` stay valid YAML
fn yaml_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Article;
    use tempfile::TempDir;

    #[test]
    fn test_create_article_is_loadable() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();

        let path = create_article(&site, "Testing: \"a\" primer", Some("Testing"), false).unwrap();
        assert_eq!(path, site.content_dir.join("testing-a-primer.mdx"));

        let content = fs::read_to_string(&path).unwrap();
        let article = Article::from_source(&path, &content).unwrap();
        assert_eq!(article.title, "Testing: \"a\" primer");
        assert_eq!(article.category, "Testing");
        assert!(article.is_published);
    }

    #[test]
    fn test_create_draft() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();

        let path = create_article(&site, "Work in progress", None, true).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let article = Article::from_source(&path, &content).unwrap();
        assert!(!article.is_published);
        assert_eq!(article.category, "Uncategorized");
    }

    #[test]
    fn test_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();

        create_article(&site, "Hello", None, false).unwrap();
        assert!(create_article(&site, "Hello", None, false).is_err());
        assert!(create_article(&site, "!!!", None, false).is_err());
    }
}
