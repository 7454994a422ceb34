//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors produced while splitting and decoding a front-matter block
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),
    #[error("front-matter block is not terminated")]
    Unterminated,
}

/// Tags given as one value or a list. Numbers and booleans are kept as
/// text; nulls, maps and nested lists are dropped.
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        Some(serde_yaml::Value::Sequence(values)) => {
            values.into_iter().filter_map(scalar_to_string).collect()
        }
        Some(value) => scalar_to_string(value).into_iter().collect(),
        None => Vec::new(),
    })
}

fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Keeps only the string items of a list; numbers, maps and nulls are dropped
fn strings_only<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_yaml::Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            serde_yaml::Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// Front-matter of a changelog entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub version: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    /// Media file names, resolved against the product's images directory
    #[serde(deserialize_with = "strings_only")]
    pub images: Vec<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start();

        if let Some(rest) = content.strip_prefix("---") {
            return Self::parse_yaml(rest);
        }

        if let Some(rest) = content.strip_prefix(";;;") {
            return Self::parse_json_fenced(rest);
        }

        if content.starts_with('{') {
            return Self::parse_json_object(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(rest: &str) -> Result<(Self, &str), FrontMatterError> {
        let rest = rest.trim_start_matches(['\n', '\r']);
        let end = if rest.starts_with("---") {
            0
        } else {
            rest.find("\n---").ok_or(FrontMatterError::Unterminated)? + 1
        };

        let yaml = &rest[..end];
        let body = rest[end + 3..].trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        Ok((serde_yaml::from_str(yaml)?, body))
    }

    fn parse_json_fenced(rest: &str) -> Result<(Self, &str), FrontMatterError> {
        let end = rest.find(";;;").ok_or(FrontMatterError::Unterminated)?;
        let json = rest[..end].trim();
        let body = rest[end + 3..].trim_start_matches(['\n', '\r']);

        // Fenced JSON may omit the outer braces
        let fm = if json.starts_with('{') {
            serde_json::from_str(json)?
        } else {
            serde_json::from_str(&format!("{{{}}}", json))?
        };
        Ok((fm, body))
    }

    fn parse_json_object(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let fm = serde_json::from_str(&content[..=i])?;
                        let body = content[i + 1..].trim_start_matches(['\n', '\r']);
                        return Ok((fm, body));
                    }
                }
                _ => {}
            }
        }

        Err(FrontMatterError::Unterminated)
    }
}

/// Parse a date string in various formats.
///
/// Values without an offset are read as wall-clock time in `tz`.
pub fn parse_date(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let naive_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    let naive = naive_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            ["%Y-%m-%d", "%Y/%m/%d"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Dark mode
description: Finally.
date: 2024-03-01
version: 1.4
tags:
  - ui
  - themes
images:
  - dark.png
  - demo.mp4
---

The whole app now follows the system theme.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Dark mode"));
        assert_eq!(fm.description.as_deref(), Some("Finally."));
        assert_eq!(fm.date.as_deref(), Some("2024-03-01"));
        assert_eq!(fm.version.as_deref(), Some("1.4"));
        assert_eq!(fm.tags, vec!["ui", "themes"]);
        assert_eq!(fm.images, vec!["dark.png", "demo.mp4"]);
        assert!(body.starts_with("The whole app"));
    }

    #[test]
    fn test_single_string_tag() {
        let content = "---\ntitle: Fix\ndate: 2024-01-01\ntags: bugfix\n---\nBody";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["bugfix"]);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_scalar_tags_are_kept_as_text() {
        let content = "---\ntitle: X\ntags: [v1, 2024, true, ~, { a: 1 }]\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("X"));
        assert_eq!(fm.tags, vec!["v1", "2024", "true"]);

        let (fm, _) = FrontMatter::parse("---\ntags: 7\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["7"]);
    }

    #[test]
    fn test_json_tags_with_numbers() {
        let (fm, _) = FrontMatter::parse(r#"{"title": "J", "tags": ["api", 2]}"#).unwrap();
        assert_eq!(fm.tags, vec!["api", "2"]);
    }

    #[test]
    fn test_non_string_images_are_dropped() {
        let content = "---\ntitle: Mixed\nimages:\n  - a.png\n  - 42\n  - ~\n  - { x: 1 }\n  - b.webm\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.images, vec!["a.png", "b.webm"]);
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Braces } in strings", "date": "2024-02-02", "images": ["x.png"]}

Body here.
"#;
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Braces } in strings"));
        assert_eq!(fm.images, vec!["x.png"]);
        assert!(body.starts_with("Body here."));
    }

    #[test]
    fn test_parse_fenced_json_frontmatter() {
        let content = ";;;\n\"title\": \"Fenced\",\n\"tags\": [\"a\"]\n;;;\nBody";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Fenced"));
        assert_eq!(fm.tags, vec!["a"]);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = FrontMatter::parse("# Just markdown").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "# Just markdown");
    }

    #[test]
    fn test_unterminated_yaml_is_an_error() {
        let err = FrontMatter::parse("---\ntitle: Oops\n\nno closing fence").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_parse_date_only_in_timezone() {
        let dt = parse_date("2024-03-01", chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-02-29T15:00:00+00:00");
    }

    #[test]
    fn test_parse_date_with_offset_ignores_timezone() {
        let dt = parse_date("2024-01-15T10:30:00+02:00", chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T08:30:00+00:00");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("next tuesday", Tz::UTC).is_none());
        assert!(parse_date("", Tz::UTC).is_none());
        assert!(parse_date("2024-13-40", Tz::UTC).is_none());
    }
}
