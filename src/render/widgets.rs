//! Presentational widgets that directives resolve to

use std::collections::HashMap;
use std::sync::Arc;

use super::directive::Directive;
use crate::config::NewsletterConfig;
use crate::helpers::html_escape;

/// Errors resolving a directive to markup
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error("unknown directive <{0} />")]
    Unknown(String),

    #[error("<{widget} /> requires the `{attribute}` attribute")]
    MissingAttribute { widget: String, attribute: String },
}

/// A widget renders one directive into an HTML fragment
pub trait Widget: Send + Sync {
    fn render(&self, directive: &Directive) -> Result<String, DirectiveError>;
}

/// Maps component names to widgets
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    widgets: HashMap<String, Arc<dyn Widget>>,
}

impl WidgetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in widgets
    pub fn with_builtins(newsletter: &NewsletterConfig) -> Self {
        let mut registry = Self::new();
        let signup: Arc<dyn Widget> = Arc::new(NewsletterWidget::new(newsletter.clone()));
        for name in ["Newsletter", "NewsletterSignup", "SubscribeForm"] {
            registry.register_shared(name, signup.clone());
        }
        registry
    }

    /// Register a widget under a component name
    pub fn register<W: Widget + 'static>(&mut self, name: &str, widget: W) {
        self.register_shared(name, Arc::new(widget));
    }

    fn register_shared(&mut self, name: &str, widget: Arc<dyn Widget>) {
        self.widgets.insert(name.to_string(), widget);
    }

    /// Whether a component name is known
    pub fn contains(&self, name: &str) -> bool {
        self.widgets.contains_key(name)
    }

    /// Resolve a directive to markup
    pub fn resolve(&self, directive: &Directive) -> Result<String, DirectiveError> {
        let widget = self
            .widgets
            .get(&directive.name)
            .ok_or_else(|| DirectiveError::Unknown(directive.name.clone()))?;
        widget.render(directive)
    }
}

/// Inline newsletter signup form
pub struct NewsletterWidget {
    config: NewsletterConfig,
}

impl NewsletterWidget {
    pub fn new(config: NewsletterConfig) -> Self {
        Self { config }
    }
}

impl Widget for NewsletterWidget {
    fn render(&self, directive: &Directive) -> Result<String, DirectiveError> {
        if !self.config.enable {
            return Ok(String::new());
        }
        if self.config.action.trim().is_empty() {
            return Err(DirectiveError::MissingAttribute {
                widget: directive.name.clone(),
                attribute: "newsletter.action".to_string(),
            });
        }

        let heading = directive.attr("title").unwrap_or(self.config.heading.as_str());
        let description = directive
            .attr("description")
            .unwrap_or(self.config.description.as_str());

        let mut html = String::new();
        html.push_str(r#"<section class="newsletter">"#);
        html.push_str(&format!("<h3>{}</h3>", html_escape(heading)));
        if !description.is_empty() {
            html.push_str(&format!("<p>{}</p>", html_escape(description)));
        }
        html.push_str(&format!(
            r#"<form class="newsletter-form" action="{}" method="post">"#,
            html_escape(&self.config.action)
        ));
        html.push_str(&format!(
            r#"<input type="email" name="email" placeholder="{}" required>"#,
            html_escape(&self.config.placeholder)
        ));
        html.push_str(&format!(
            r#"<button type="submit">{}</button>"#,
            html_escape(&self.config.button)
        ));
        html.push_str("</form></section>");
        Ok(html)
    }
}
