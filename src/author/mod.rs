//! Author card - portrait, biography and outbound social links

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::templates::register_filters;

const AUTHOR_TEMPLATE: &str = include_str!("../templates/site/partials/author.html");

/// A single outbound social link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// The site author, fixed at build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorProfile {
    pub name: String,
    /// Portrait image path or URI
    pub portrait: String,
    pub bio: String,
    /// Rendered in the order given
    pub links: Vec<SocialLink>,
}

impl Default for AuthorProfile {
    fn default() -> Self {
        Self {
            name: "Jane Doe".to_string(),
            portrait: "/images/portrait.png".to_string(),
            bio: "Software engineer writing about testing, web development and the tools in between."
                .to_string(),
            links: vec![
                SocialLink {
                    platform: "GitHub".to_string(),
                    url: "https://github.com/".to_string(),
                },
                SocialLink {
                    platform: "Twitter".to_string(),
                    url: "https://twitter.com/".to_string(),
                },
                SocialLink {
                    platform: "LinkedIn".to_string(),
                    url: "https://www.linkedin.com/".to_string(),
                },
            ],
        }
    }
}

/// Presentational unit for an [`AuthorProfile`]
pub struct AuthorCard {
    tera: Tera,
    profile: AuthorProfile,
}

impl AuthorCard {
    /// Create a card for a fixed profile
    pub fn new(profile: &AuthorProfile) -> Result<Self> {
        let mut tera = Tera::default();
        register_filters(&mut tera);
        tera.add_raw_template("author.html", AUTHOR_TEMPLATE)?;
        Ok(Self {
            tera,
            profile: profile.clone(),
        })
    }

    /// Render the card as an HTML fragment
    pub fn render(&self) -> Result<String> {
        let mut context = Context::new();
        context.insert("author", &self.profile);
        Ok(self.tera.render("author.html", &context)?)
    }

    pub fn profile(&self) -> &AuthorProfile {
        &self.profile
    }
}
