//! Read-only query surface over the loaded article set

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::error::ContentError;
use super::loader::ContentLoader;
use super::Article;

/// A category and the number of published articles in it
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// The fixed set of articles, ordered newest first
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    articles: Vec<Article>,
    by_slug: HashMap<String, usize>,
}

impl ContentStore {
    /// Build a store, rejecting two articles that share a slug
    pub fn from_articles(mut articles: Vec<Article>) -> Result<Self, ContentError> {
        // Newest first; slug breaks ties so listings are stable
        articles.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        let mut by_slug = HashMap::with_capacity(articles.len());
        for (idx, article) in articles.iter().enumerate() {
            if let Some(prev) = by_slug.insert(article.slug.clone(), idx) {
                let (first, second) = if articles[prev].source <= article.source {
                    (&articles[prev], article)
                } else {
                    (article, &articles[prev])
                };
                return Err(ContentError::DuplicateSlug {
                    slug: article.slug.clone(),
                    first: first.source.clone(),
                    second: second.source.clone(),
                });
            }
        }

        Ok(Self { articles, by_slug })
    }

    /// Load every article below a content directory
    pub fn load<P: AsRef<Path>>(content_dir: P) -> Result<Self, ContentError> {
        ContentLoader::new(content_dir).load()
    }

    /// Published articles, newest first
    pub fn list_published(&self) -> Vec<&Article> {
        self.articles.iter().filter(|a| a.is_published).collect()
    }

    /// Published articles in a category, newest first
    ///
    /// Matches on the category slug, so `"Testing"` and `"testing"` agree.
    pub fn list_by_category(&self, category: &str) -> Vec<&Article> {
        let wanted = slug::slugify(category);
        self.articles
            .iter()
            .filter(|a| a.is_published && a.category_slug() == wanted)
            .collect()
    }

    /// Published articles flagged popular, newest first
    pub fn list_popular(&self) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|a| a.is_published && a.popular)
            .collect()
    }

    /// Unpublished articles, newest first
    pub fn list_drafts(&self) -> Vec<&Article> {
        self.articles.iter().filter(|a| !a.is_published).collect()
    }

    /// Categories that have at least one published article, by name
    pub fn categories(&self) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<String, CategoryCount> = BTreeMap::new();
        for article in self.list_published() {
            let slug = article.category_slug();
            counts
                .entry(slug.clone())
                .or_insert_with(|| CategoryCount {
                    name: article.category.clone(),
                    slug,
                    count: 0,
                })
                .count += 1;
        }

        let mut categories: Vec<_> = counts.into_values().collect();
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        categories
    }

    /// Look up an article by slug, published or not
    pub fn get_by_slug(&self, slug: &str) -> Option<&Article> {
        self.by_slug.get(slug).map(|&idx| &self.articles[idx])
    }

    /// All articles, newest first
    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.articles.iter()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn make(slug: &str, category: &str, date: &str, published: bool, popular: bool) -> Article {
        let content = format!(
            "---\ntitle: {slug}\ncategory: {category}\npublishedAt: {date}\nisPublished: {published}\npopular: {popular}\nexcerpt: e\n---\nbody\n"
        );
        Article::from_source(Path::new(&format!("{slug}.mdx")), &content).unwrap()
    }

    fn sample() -> ContentStore {
        ContentStore::from_articles(vec![
            make("a", "Testing", "2021-06-28", true, false),
            make("b", "Testing", "2021-07-01", false, true),
            make("c", "React", "2021-05-02", true, true),
            make("d", "testing", "2021-08-15", true, false),
            make("e", "React", "2021-05-02", true, false),
        ])
        .unwrap()
    }

    fn slugs(articles: &[&Article]) -> Vec<String> {
        articles.iter().map(|a| a.slug.clone()).collect()
    }

    #[test]
    fn test_published_only_example() {
        let store = ContentStore::from_articles(vec![
            make("a", "Testing", "2021-06-28", true, false),
            make("b", "Testing", "2021-07-01", false, false),
        ])
        .unwrap();
        assert_eq!(slugs(&store.list_published()), vec!["a"]);
    }

    #[test]
    fn test_list_published_sorted_desc() {
        let store = sample();
        let published = store.list_published();
        assert!(published.iter().all(|a| a.is_published));
        assert!(published
            .windows(2)
            .all(|w| w[0].published_at >= w[1].published_at));
        // Same date breaks ties by slug
        assert_eq!(slugs(&published), vec!["d", "a", "c", "e"]);
    }

    #[test]
    fn test_list_by_category() {
        let store = sample();
        assert_eq!(slugs(&store.list_by_category("Testing")), vec!["d", "a"]);
        assert_eq!(slugs(&store.list_by_category("testing")), vec!["d", "a"]);
        assert_eq!(slugs(&store.list_by_category("react")), vec!["c", "e"]);
        assert!(store.list_by_category("Rust").is_empty());
    }

    #[test]
    fn test_list_popular_excludes_drafts() {
        let store = sample();
        assert_eq!(slugs(&store.list_popular()), vec!["c"]);
        assert_eq!(slugs(&store.list_drafts()), vec!["b"]);
    }

    #[test]
    fn test_categories() {
        let store = sample();
        let categories = store.categories();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].slug, "react");
        assert_eq!(categories[0].count, 2);
        assert_eq!(categories[1].slug, "testing");
        assert_eq!(categories[1].count, 2);
    }

    #[test]
    fn test_get_by_slug() {
        let store = sample();
        let article = store.get_by_slug("b").unwrap();
        assert_eq!(article.slug, "b");
        assert!(!article.is_published);
        assert!(store.get_by_slug("missing").is_none());
    }

    #[test]
    fn test_duplicate_slug() {
        let err = ContentStore::from_articles(vec![
            make("a", "Testing", "2021-06-28", true, false),
            make("a", "React", "2021-06-29", true, false),
        ])
        .unwrap_err();
        assert!(matches!(err, ContentError::DuplicateSlug { .. }));
    }
}
