//! Inline component directives such as `<Newsletter />`
//!
//! A directive is a self-closing tag whose name starts with an uppercase
//! letter. Lowercase tags are ordinary HTML and are left alone. Directives
//! that occupy a whole line are swapped for numbered placeholders before the
//! Markdown pass, so JSX-style `{...}` attribute values survive. Code samples
//! are located with the Markdown parser itself and are never touched.

use lazy_static::lazy_static;
use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Range;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(
        r#"^<([A-Z][A-Za-z0-9_.]*)((?:\s+[A-Za-z_][\w:.-]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{[^}]*\}))?)*)\s*/>$"#
    )
    .expect("Invalid directive tag regex");
    static ref ATTR_RE: Regex = Regex::new(
        r#"([A-Za-z_][\w:.-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|\{([^}]*)\}))?"#
    )
    .expect("Invalid directive attribute regex");
}

const MARKER: &str = "penfolio:directive";

/// A parsed directive: component name plus string attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

impl Directive {
    /// Parse a single tag like `<Newsletter title="Hi" />`
    pub fn parse(tag: &str) -> Option<Self> {
        let caps = TAG_RE.captures(tag.trim())?;
        let name = caps.get(1)?.as_str().to_string();

        let mut attributes = BTreeMap::new();
        if let Some(attrs) = caps.get(2) {
            for attr in ATTR_RE.captures_iter(attrs.as_str()) {
                let key = attr[1].to_string();
                let value = if let Some(v) = attr.get(2).or_else(|| attr.get(3)) {
                    v.as_str().to_string()
                } else if let Some(expr) = attr.get(4) {
                    expression_value(expr.as_str())
                } else {
                    // Bare attribute, JSX shorthand for `={true}`
                    "true".to_string()
                };
                attributes.insert(key, value);
            }
        }

        Some(Self { name, attributes })
    }

    /// Attribute value, if present
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Reduce a JSX expression to a plain string when it is a literal
fn expression_value(expr: &str) -> String {
    let expr = expr.trim();
    for quote in ['"', '\'', '`'] {
        if expr.len() >= 2 && expr.starts_with(quote) && expr.ends_with(quote) {
            return expr[1..expr.len() - 1].to_string();
        }
    }
    expr.to_string()
}

/// A body with its whole-line directives swapped for placeholders
#[derive(Debug, Clone)]
pub struct Extracted {
    /// Body source with placeholders in place of directive lines
    pub source: String,
    /// Directives in placeholder order
    pub directives: Vec<Directive>,
    marker: String,
}

impl Extracted {
    /// HTML comment that stands in for directive `index`
    pub fn placeholder(&self, index: usize) -> String {
        format!("<!-- {}:{} -->", self.marker, index)
    }

    /// Whether `html` contains any of this body's placeholders
    pub fn has_placeholder(&self, html: &str) -> bool {
        html.contains(&format!("<!-- {}:", self.marker))
    }

    /// Replace every placeholder in `html` using `resolve`
    pub fn replace_placeholders<F>(&self, html: &str, mut resolve: F) -> String
    where
        F: FnMut(usize) -> String,
    {
        let mut output = html.to_string();
        for index in 0..self.directives.len() {
            let placeholder = self.placeholder(index);
            if output.contains(&placeholder) {
                output = output.replace(&placeholder, &resolve(index));
            }
        }
        output
    }
}

/// Replace whole-line directives outside code with placeholders
///
/// The line keeps its leading whitespace so the placeholder stays inside
/// whatever list item or block the directive was written in.
pub fn extract(body: &str, options: Options) -> Extracted {
    let code = code_ranges(body, options);
    let marker = unused_marker(body);

    let mut extracted = Extracted {
        source: String::with_capacity(body.len()),
        directives: Vec::new(),
        marker,
    };

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let content = line.trim_end_matches(['\n', '\r']);
        let newline = &line[content.len()..];
        let indent = content.len() - content.trim_start_matches([' ', '\t']).len();
        let tag_start = line_start + indent;

        let directive = if code.iter().any(|r| r.contains(&tag_start)) {
            None
        } else {
            Directive::parse(content)
        };

        match directive {
            Some(directive) => {
                let placeholder = extracted.placeholder(extracted.directives.len());
                extracted.source.push_str(&content[..indent]);
                extracted.source.push_str(&placeholder);
                extracted
                    .source
                    .push_str(if newline.is_empty() { "\n" } else { newline });
                extracted.directives.push(directive);
            }
            None => extracted.source.push_str(line),
        }
    }

    extracted
}

/// Byte ranges of code blocks and code spans, as the Markdown parser sees them
fn code_ranges(body: &str, options: Options) -> Vec<Range<usize>> {
    Parser::new_ext(body, options)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect()
}

/// Placeholder marker that does not already occur in `body`
fn unused_marker(body: &str) -> String {
    let mut marker = MARKER.to_string();
    let mut n = 0;
    while body.contains(&marker) {
        n += 1;
        marker = format!("{}-{}", MARKER, n);
    }
    marker
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_self_closing_component() {
        let d = Directive::parse("<Newsletter />").unwrap();
        assert_eq!(d.name, "Newsletter");
        assert!(d.attributes.is_empty());
    }

    #[test]
    fn parses_attributes() {
        let d = Directive::parse(
            r#"<NewsletterSignup title="Join" note='weekly' compact tag={"testing"} count={3}/>"#,
        )
        .unwrap();
        assert_eq!(d.name, "NewsletterSignup");
        assert_eq!(d.attr("title"), Some("Join"));
        assert_eq!(d.attr("note"), Some("weekly"));
        assert_eq!(d.attr("compact"), Some("true"));
        assert_eq!(d.attr("tag"), Some("testing"));
        assert_eq!(d.attr("count"), Some("3"));
    }

    #[test]
    fn ignores_plain_html() {
        assert!(Directive::parse("<br />").is_none());
        assert!(Directive::parse("<img src=\"a.png\" />").is_none());
        assert!(Directive::parse("<Newsletter>").is_none());
        assert!(Directive::parse("text <Newsletter />").is_none());
    }

    fn extract_default(body: &str) -> Extracted {
        extract(body, Options::empty())
    }

    #[test]
    fn extracts_whole_line_directives() {
        let body = "Intro paragraph.\n<Newsletter />\n\nMore text.\n";
        let extracted = extract_default(body);
        assert_eq!(extracted.directives.len(), 1);
        assert_eq!(
            extracted.source,
            "Intro paragraph.\n<!-- penfolio:directive:0 -->\n\nMore text.\n"
        );
    }

    #[test]
    fn leaves_fenced_code_alone() {
        let body = "```jsx\n<Newsletter />\n```\n\n~~~~\n<Newsletter />\n~~~\n~~~~\n<Newsletter />";
        let extracted = extract_default(body);
        assert_eq!(extracted.directives.len(), 1);
        assert!(extracted.source.starts_with("```jsx\n<Newsletter />\n```\n"));
        assert!(extracted.source.contains("~~~~\n<Newsletter />\n~~~\n~~~~\n"));
        assert!(extracted.source.ends_with("<!-- penfolio:directive:0 -->\n"));
    }

    #[test]
    fn leaves_indented_code_alone() {
        let body = "Para\n\n    <Newsletter />\n";
        let extracted = extract_default(body);
        assert!(extracted.directives.is_empty());
        assert_eq!(extracted.source, body);
    }

    #[test]
    fn leaves_tab_indented_code_alone() {
        let body = "Para\n\n\t<Newsletter />\n";
        let extracted = extract_default(body);
        assert!(extracted.directives.is_empty());
        assert_eq!(extracted.source, body);
    }

    #[test]
    fn leaves_fences_in_containers_alone() {
        for body in [
            "- ```jsx\n  <Newsletter />\n  ```\n",
            "1. Step\n\n   ```jsx\n   <Newsletter />\n   ```\n",
            "> ```jsx\n> <Newsletter />\n> ```\n",
        ] {
            let extracted = extract_default(body);
            assert!(extracted.directives.is_empty(), "extracted from {:?}", body);
            assert_eq!(extracted.source, body);
        }
    }

    #[test]
    fn keeps_indentation_of_nested_directives() {
        let body = "- Step one\n\n  <Newsletter />\n\n  Still step one.\n";
        let extracted = extract_default(body);
        assert_eq!(extracted.directives.len(), 1);
        assert_eq!(
            extracted.source,
            "- Step one\n\n  <!-- penfolio:directive:0 -->\n\n  Still step one.\n"
        );
    }

    #[test]
    fn marker_avoids_text_already_in_body() {
        let body = "See <!-- penfolio:directive:0 --> here.\n\n<Newsletter />\n";
        let extracted = extract_default(body);
        assert_eq!(extracted.directives.len(), 1);
        assert_eq!(extracted.placeholder(0), "<!-- penfolio:directive-1:0 -->");
        assert!(extracted.source.starts_with("See <!-- penfolio:directive:0 --> here."));
        assert!(!extracted.has_placeholder("<!-- penfolio:directive:0 -->"));
    }

    #[test]
    fn replaces_placeholders() {
        let extracted = extract_default("<Newsletter />\n<Tweet id=\"1\" />\n");
        let html = format!(
            "<p>a</p>\n{}\n{}",
            extracted.placeholder(0),
            extracted.placeholder(1)
        );
        let out = extracted.replace_placeholders(&html, |i| {
            if i == 0 {
                "<form/>".into()
            } else {
                String::new()
            }
        });
        assert_eq!(out, "<p>a</p>\n<form/>\n");
        assert!(extracted.has_placeholder(&html));
        assert!(!extracted.has_placeholder(&out));
    }
}
