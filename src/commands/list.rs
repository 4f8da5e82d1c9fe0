//! List site content

use anyhow::Result;

use crate::content::{Article, ContentStore};
use crate::Site;

/// Print a listing of the given kind
pub fn run(site: &Site, kind: &str) -> Result<()> {
    let store = site.load_content()?;
    print!("{}", render(&store, kind)?);
    Ok(())
}

/// Format a listing of the given kind
pub fn render(store: &ContentStore, kind: &str) -> Result<String> {
    let mut out = String::new();

    match kind {
        "post" | "posts" => articles(&mut out, "Published", &store.list_published()),
        "draft" | "drafts" => articles(&mut out, "Drafts", &store.list_drafts()),
        "popular" => articles(&mut out, "Popular", &store.list_popular()),
        "category" | "categories" => {
            let categories = store.categories();
            out.push_str(&format!("Categories ({}):\n", categories.len()));
            for category in categories {
                out.push_str(&format!(
                    "  {} [{}] ({})\n",
                    category.name, category.slug, category.count
                ));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, draft, popular, category",
                kind
            );
        }
    }

    Ok(out)
}

fn articles(out: &mut String, heading: &str, articles: &[&Article]) {
    out.push_str(&format!("{} ({}):\n", heading, articles.len()));
    for article in articles {
        out.push_str(&format!(
            "  {} - {} [{}]\n",
            article.published_at.format("%Y-%m-%d"),
            article.title,
            article.slug
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn store() -> ContentStore {
        let a = Article::from_source(
            Path::new("a.mdx"),
            "---\ntitle: A\ncategory: Testing\npublishedAt: 2021-01-01\nisPublished: true\npopular: true\nexcerpt: a\n---\n",
        )
        .unwrap();
        let b = Article::from_source(
            Path::new("b.mdx"),
            "---\ntitle: B\ncategory: Testing\npublishedAt: 2021-02-01\nisPublished: false\nexcerpt: b\n---\n",
        )
        .unwrap();
        ContentStore::from_articles(vec![a, b]).unwrap()
    }

    #[test]
    fn test_listings() {
        let store = store();
        assert_eq!(
            render(&store, "post").unwrap(),
            "Published (1):\n  2021-01-01 - A [a]\n"
        );
        assert_eq!(
            render(&store, "draft").unwrap(),
            "Drafts (1):\n  2021-02-01 - B [b]\n"
        );
        assert_eq!(
            render(&store, "category").unwrap(),
            "Categories (1):\n  Testing [testing] (1)\n"
        );
        assert!(render(&store, "tag").is_err());
    }
}
