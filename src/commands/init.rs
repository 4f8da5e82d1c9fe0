//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Penfolio configuration

# Site
title: My Blog
description: Notes on testing, web development and tooling
language: en

# URL
url: http://example.com
root: /

# Directory
content_dir: content
static_dir: static
public_dir: public
blog_dir: blog
category_dir: category

# Writing
render_drafts: false
words_per_minute: 200
highlight:
  theme: base16-ocean.dark
  line_number: false

# Feed
feed_limit: 20

# Newsletter widget (<Newsletter />, <NewsletterSignup />, <SubscribeForm />)
newsletter:
  enable: true
  action: /subscribe
  button: Subscribe

# Author card
author:
  name: Jane Doe
  portrait: /images/portrait.png
  bio: Software engineer writing about testing, web development and the tools in between.
  links:
    - platform: GitHub
      url: https://github.com/
    - platform: Twitter
      url: https://twitter.com/
"#;

const STYLESHEET: &str = r#"body { max-width: 46rem; margin: 0 auto; padding: 0 1rem; font-family: system-ui, sans-serif; line-height: 1.6; }
.site-header { display: flex; justify-content: space-between; align-items: center; }
.author { display: flex; gap: 1rem; align-items: center; }
.author img { width: 96px; height: 96px; border-radius: 50%; }
.author ul { display: flex; gap: .75rem; list-style: none; padding: 0; }
.highlight pre, pre { padding: 1rem; overflow-x: auto; }
.newsletter { padding: 1rem; border: 1px solid #ddd; border-radius: .5rem; }
.meta { color: #666; font-size: .9rem; }
"#;

/// Scaffold a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir.join("content"))?;
    fs::create_dir_all(target_dir.join("static/css"))?;
    fs::create_dir_all(target_dir.join("static/images"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;
    fs::write(target_dir.join("static/css/style.css"), STYLESHEET)?;

    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_article = format!(
        r#"---
title: Hello World
category: Meta
publishedAt: {today}
isPublished: true
popular: true
excerpt: The first article on this site.
---

Welcome! Articles live in `content/` as front-matter + Markdown files.

## Writing

Code samples are highlighted, never executed:

```jsx
import {{ render, screen }} from '@testing-library/react'

render(<Newsletter />)
```

## Components

Place a component on its own line to embed it:

<Newsletter />
"#
    );

    fs::write(target_dir.join("content/hello-world.mdx"), sample_article)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Site;
    use tempfile::TempDir;

    #[test]
    fn test_init_scaffold_loads() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();

        let site = Site::new(tmp.path()).unwrap();
        assert_eq!(site.config.title, "My Blog");
        assert_eq!(site.config.author.links.len(), 2);

        let store = site.load_content().unwrap();
        assert_eq!(store.list_published().len(), 1);
        assert!(store.get_by_slug("hello-world").is_some());
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();
        assert!(init_site(tmp.path()).is_err());
    }
}
