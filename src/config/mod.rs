//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::NewsletterConfig;
pub use site::SiteConfig;
