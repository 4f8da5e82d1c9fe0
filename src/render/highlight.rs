//! Syntax highlighting for code samples

use lazy_static::lazy_static;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::config::HighlightConfig;
use crate::helpers::html_escape;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

/// Highlights fenced code samples; the code itself is never executed
pub struct Highlighter {
    theme_name: String,
    line_numbers: bool,
}

impl Highlighter {
    pub fn new(config: &HighlightConfig) -> Self {
        Self {
            theme_name: config.theme.clone(),
            line_numbers: config.line_number,
        }
    }

    /// Highlight a code block into an HTML fragment
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.map(normalize_lang).unwrap_or("text");
        let class = html_escape(lang);

        let highlighted = self.theme().and_then(|theme| {
            highlighted_html_for_string(code, &SYNTAX_SET, find_syntax(lang), theme).ok()
        });

        match highlighted {
            Some(html) if self.line_numbers => {
                self.add_line_numbers(&html, code.lines().count(), &class)
            }
            Some(html) => format!(r#"<figure class="highlight {}">{}</figure>"#, class, html),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                class,
                html_escape(code)
            ),
        }
    }

    fn theme(&self) -> Option<&'static Theme> {
        THEME_SET
            .themes
            .get(&self.theme_name)
            .or_else(|| THEME_SET.themes.get("base16-ocean.dark"))
    }

    /// Add a line-number gutter to highlighted code
    fn add_line_numbers(&self, html: &str, line_count: usize, class: &str) -> String {
        let gutter = (1..=line_count)
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            class, gutter, html
        )
    }
}

/// First token of a fence info string, e.g. `jsx title="App.jsx"` -> `jsx`
fn normalize_lang(info: &str) -> &str {
    let token = info.split_whitespace().next().unwrap_or("");
    let token = token.split('{').next().unwrap_or(token);
    if token.is_empty() {
        "text"
    } else {
        token
    }
}

fn find_syntax(lang: &str) -> &'static SyntaxReference {
    let alias = match lang.to_ascii_lowercase().as_str() {
        "jsx" | "tsx" | "ts" | "typescript" | "javascript" | "mjs" => "js",
        "shell" | "bash" | "zsh" | "console" => "sh",
        "yml" => "yaml",
        _ => "",
    };
    let token = if alias.is_empty() { lang } else { alias };

    SYNTAX_SET
        .find_syntax_by_token(token)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(token))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}
