//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Errors raised while splitting and decoding a front-matter block
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("missing front-matter block - file must start with ---")]
    Missing,

    #[error("unclosed front-matter block - missing closing ---")]
    Unclosed,

    #[error("invalid YAML in front-matter: {0}")]
    InvalidYaml(String),
}

/// Front-matter data from an article
///
/// Every field is optional at this level; required keys are enforced when the
/// front-matter is turned into an [`Article`](super::Article).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub category: Option<String>,
    pub published_at: Option<String>,
    pub is_published: Option<bool>,
    pub popular: Option<bool>,
    pub image: Option<String>,
    pub excerpt: Option<String>,
    /// Overrides the file-stem slug
    pub slug: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some(rest) = content.strip_prefix("---") else {
            return Err(FrontMatterError::Missing);
        };
        let rest = rest.trim_start_matches([' ', '\t']);
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);

        let (yaml_content, remaining) = if let Some(after) = rest.strip_prefix("---") {
            // Empty block: `---` immediately followed by `---`
            ("", after)
        } else {
            let Some(end_pos) = find_closing_fence(rest) else {
                return Err(FrontMatterError::Unclosed);
            };
            (&rest[..end_pos], &rest[end_pos + 4..])
        };

        // Drop the remainder of the closing fence line
        let remaining = match remaining.find('\n') {
            Some(pos) if remaining[..pos].trim().is_empty() => &remaining[pos + 1..],
            None if remaining.trim().is_empty() => "",
            _ => remaining,
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)
            .map_err(|e| FrontMatterError::InvalidYaml(e.to_string()))?;

        Ok((fm, remaining))
    }

    /// Parse the publication date string
    pub fn parse_published_at(&self) -> Option<NaiveDateTime> {
        self.published_at.as_deref().and_then(parse_date_string)
    }
}

/// Byte offset of the `\n---` that closes the block, if any
fn find_closing_fence(rest: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(pos) = rest[search_from..].find("\n---") {
        let start = search_from + pos;
        let after = &rest[start + 4..];
        let line_end = after.find('\n').unwrap_or(after.len());
        if after[..line_end].trim().is_empty() {
            return Some(start);
        }
        search_from = start + 4;
    }
    None
}

/// Parse a date string in various formats
pub(crate) fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches(['"', '\'']);

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, normalized to UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    None
}
