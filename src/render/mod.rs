//! Body rendering: Markdown with inline directives and highlighted code samples

pub mod directive;
mod highlight;
mod widgets;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use std::collections::HashMap;

use crate::config::SiteConfig;
use crate::helpers::{count_words, html_escape};

pub use directive::Directive;
pub use highlight::Highlighter;
pub use widgets::{DirectiveError, NewsletterWidget, Widget, WidgetRegistry};

/// A table of contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub title: String,
    pub id: String,
    pub level: u8,
}

/// Display structure of an article body
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedBody {
    pub html: String,
    pub toc: Vec<TocEntry>,
    /// Prose words, code samples excluded
    pub word_count: usize,
    pub code_blocks: usize,
    /// Directive names that rendered nothing because they could not be resolved
    pub unresolved: Vec<String>,
}

/// Renders article bodies; pure, holds no per-render state
pub struct BodyRenderer {
    highlighter: Highlighter,
    widgets: WidgetRegistry,
}

impl BodyRenderer {
    /// Create a renderer with an explicit widget registry
    pub fn new(highlighter: Highlighter, widgets: WidgetRegistry) -> Self {
        Self {
            highlighter,
            widgets,
        }
    }

    /// Renderer with the built-in widgets configured from the site
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            Highlighter::new(&config.highlight),
            WidgetRegistry::with_builtins(&config.newsletter),
        )
    }

    /// Render a body to HTML
    ///
    /// Never fails: a directive that cannot be resolved is logged, recorded
    /// in [`RenderedBody::unresolved`] and omitted from the output.
    pub fn render(&self, body: &str) -> RenderedBody {
        let options = markdown_options();
        let extracted = directive::extract(body, options);

        let mut unresolved = Vec::new();
        let resolved: Vec<String> = extracted
            .directives
            .iter()
            .map(|d| self.resolve(d, &mut unresolved))
            .collect();

        let parser = Parser::new_ext(&extracted.source, options);

        let mut events: Vec<Event> = Vec::new();
        let mut toc = Vec::new();
        let mut used_ids: HashMap<String, usize> = HashMap::new();
        let mut word_count = 0;
        let mut code_blocks = 0;

        let mut code_block: Option<(Option<String>, String)> = None;
        let mut heading: Option<(u8, Option<String>, Vec<String>, Vec<Event>)> = None;

        for event in parser {
            // Code samples are collected verbatim
            if let Some((lang, buf)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => buf.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let html = self.highlighter.highlight(buf, lang.as_deref());
                        events.push(Event::Html(CowStr::from(html)));
                        code_blocks += 1;
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            let event = match event {
                Event::Html(raw) | Event::InlineHtml(raw) if extracted.has_placeholder(&raw) => {
                    let html = extracted.replace_placeholders(&raw, |i| {
                        resolved.get(i).cloned().unwrap_or_default()
                    });
                    Event::Html(CowStr::from(html))
                }
                // Directives behind a container marker, e.g. `> <Newsletter />`
                Event::Html(raw) => match Directive::parse(&raw) {
                    Some(d) => Event::Html(CowStr::from(self.resolve(&d, &mut unresolved))),
                    None => Event::Html(raw),
                },
                Event::InlineHtml(raw) => match Directive::parse(&raw) {
                    Some(d) => Event::InlineHtml(CowStr::from(self.resolve(&d, &mut unresolved))),
                    None => Event::InlineHtml(raw),
                },
                other => other,
            };

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                            Some(info.to_string())
                        }
                        _ => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(Tag::Heading {
                    level, id, classes, ..
                }) => {
                    heading = Some((
                        level as u8,
                        id.map(|i| i.to_string()),
                        classes.iter().map(|c| c.to_string()).collect(),
                        Vec::new(),
                    ));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, explicit_id, classes, inner)) = heading.take() {
                        let title = heading_text(&inner);
                        word_count += count_words(&title);

                        let base = explicit_id.unwrap_or_else(|| slug::slugify(&title));
                        let id = unique_id(&mut used_ids, base);

                        let mut inner_html = String::new();
                        html::push_html(&mut inner_html, inner.into_iter());

                        let class_attr = if classes.is_empty() {
                            String::new()
                        } else {
                            format!(r#" class="{}""#, html_escape(&classes.join(" ")))
                        };
                        events.push(Event::Html(CowStr::from(format!(
                            "<h{level} id=\"{}\"{class_attr}>{inner_html}</h{level}>\n",
                            html_escape(&id)
                        ))));
                        toc.push(TocEntry { title, id, level });
                    }
                }
                other => {
                    if let Event::Text(text) | Event::Code(text) = &other {
                        if heading.is_none() {
                            word_count += count_words(text);
                        }
                    }
                    match heading.as_mut() {
                        Some((_, _, _, inner)) => inner.push(other),
                        None => events.push(other),
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        RenderedBody {
            html: html_output,
            toc,
            word_count,
            code_blocks,
            unresolved,
        }
    }

    fn resolve(&self, directive: &Directive, unresolved: &mut Vec<String>) -> String {
        match self.widgets.resolve(directive) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Skipping directive: {}", e);
                unresolved.push(directive.name.clone());
                String::new()
            }
        }
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

/// Plain text of a heading's inline events
fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Suffix repeated heading ids with `-1`, `-2`, ...
fn unique_id(used: &mut HashMap<String, usize>, base: String) -> String {
    let base = if base.is_empty() {
        "section".to_string()
    } else {
        base
    };
    let count = used.entry(base.clone()).or_insert(0);
    let id = if *count == 0 {
        base
    } else {
        format!("{}-{}", base, count)
    };
    *count += 1;
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> BodyRenderer {
        BodyRenderer::from_config(&SiteConfig::default())
    }

    #[test]
    fn renders_basic_markdown() {
        let body = renderer().render("# Hello World\n\nThis is a test.");
        assert!(body.html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(body.html.contains("<p>This is a test.</p>"));
        assert_eq!(body.toc.len(), 1);
        assert_eq!(body.toc[0].level, 1);
        assert_eq!(body.word_count, 6);
    }

    #[test]
    fn resolves_newsletter_directive() {
        let body = renderer().render("Before.\n\n<Newsletter />\n\nAfter.\n");
        assert!(body.html.contains(r#"<section class="newsletter">"#));
        assert!(body.html.contains("<p>Before.</p>"));
        assert!(body.html.contains("<p>After.</p>"));
        assert!(body.unresolved.is_empty());
    }

    #[test]
    fn directive_interrupting_a_paragraph() {
        let body = renderer().render("Before.\n<NewsletterSignup title={'Join'} />\nAfter.\n");
        assert!(body.html.contains("<h3>Join</h3>"));
        assert!(body.html.contains("After."));
    }

    #[test]
    fn unknown_directive_is_omitted() {
        let body = renderer().render("# Title\n\nIntro.\n\n<YouTube id=\"abc\" />\n\n## Next\n\nOutro.\n");
        assert!(!body.html.contains("YouTube"));
        assert!(!body.html.contains("penfolio:directive"));
        assert!(body.html.contains("<p>Intro.</p>"));
        assert!(body.html.contains("<p>Outro.</p>"));
        assert_eq!(body.toc.len(), 2);
        assert_eq!(body.unresolved, vec!["YouTube".to_string()]);
    }

    #[test]
    fn inline_directive() {
        let body = renderer().render("Sign up: <Newsletter /> today.");
        assert!(body.html.contains(r#"<section class="newsletter">"#));
        assert!(body.html.contains("today."));

        let body = renderer().render("Watch <Video /> now.");
        assert!(body.html.contains("<p>Watch  now.</p>"));
        assert_eq!(body.unresolved, vec!["Video".to_string()]);
    }

    #[test]
    fn code_samples_are_verbatim() {
        let source = "```jsx\nimport { render } from '@testing-library/react'\n<Newsletter />\n```\n\nUse `<Newsletter />` inline.\n";
        let body = renderer().render(source);
        assert_eq!(body.code_blocks, 1);
        assert!(body.html.contains("highlight jsx"));
        assert!(!body.html.contains(r#"<section class="newsletter">"#));
        assert!(body.html.contains("<code>&lt;Newsletter /&gt;</code>"));
        assert!(body.unresolved.is_empty());
    }

    #[test]
    fn code_in_containers_is_verbatim() {
        for source in [
            "- ```jsx\n  <Newsletter />\n  ```\n\nAfter the list.\n",
            "> ```jsx\n> <Newsletter />\n> ```\n\nAfter the quote.\n",
            "Para\n\n\t<Newsletter />\n",
        ] {
            let body = renderer().render(source);
            assert_eq!(body.code_blocks, 1, "{:?}", source);
            assert!(body.html.contains("&lt;"), "{:?}", source);
            assert!(!body.html.contains("<Newsletter"), "{:?}", source);
            assert!(!body.html.contains(r#"<section class="newsletter">"#), "{:?}", source);
            assert!(body.unresolved.is_empty());
        }

        let body = renderer().render("- ```jsx\n  <Newsletter />\n  ```\n\nAfter the list.\n");
        assert!(body.html.ends_with("<p>After the list.</p>\n"));
    }

    #[test]
    fn directive_inside_list_item_keeps_the_list() {
        let body = renderer().render("- Step one\n\n  <Newsletter />\n\n  Still step one.\n- Step two\n");
        assert_eq!(body.html.matches("<ul>").count(), 1);
        let form = body.html.find(r#"<section class="newsletter">"#).unwrap();
        let still = body.html.find("Still step one.").unwrap();
        let close = body.html.find("</ul>").unwrap();
        assert!(form < still && still < close);
        assert!(body.html.contains("Step two"));
    }

    #[test]
    fn directive_in_blockquote() {
        let body = renderer().render("> <Newsletter />\n");
        assert!(body.html.contains("<blockquote>"));
        assert!(body.html.contains(r#"<section class="newsletter">"#));
    }

    #[test]
    fn literal_marker_text_is_left_alone() {
        let body = renderer().render("<!-- penfolio:directive:0 -->\n\n<Tweet id=\"1\" />\n");
        assert!(body.html.contains("<!-- penfolio:directive:0 -->"));
        assert!(!body.html.contains(r#"<section class="newsletter">"#));
        assert_eq!(body.unresolved, vec!["Tweet".to_string()]);
    }

    #[test]
    fn plain_html_passes_through() {
        let body = renderer().render("<div class=\"note\">\n\nhi\n\n</div>\n");
        assert!(body.html.contains(r#"<div class="note">"#));
        assert!(body.unresolved.is_empty());
    }

    #[test]
    fn heading_ids_are_unique_and_overridable() {
        let body = renderer().render("## Setup\n\n## Setup\n\n## Mocking `fetch` {#mock-fetch}\n");
        let ids: Vec<_> = body.toc.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1", "mock-fetch"]);
        assert_eq!(body.toc[2].title, "Mocking fetch");
        assert!(body.html.contains(r#"<h2 id="mock-fetch">Mocking <code>fetch</code></h2>"#));
    }

    #[test]
    fn rendering_is_pure() {
        let r = renderer();
        let source = "# A\n\n<Newsletter />\n\n```rust\nfn main() {}\n```\n";
        assert_eq!(r.render(source).html, r.render(source).html);
    }
}
