//! Site configuration (_config.yml)

use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    /// Link behind the header logo
    pub home_url: Option<String>,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    /// Per-product metadata file name inside each product directory
    pub meta_file: String,

    // Date / Time
    pub date_format: String,
    pub timezone: String,
    pub invalid_dates: DatePolicy,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Changelog".to_string(),
            description: String::new(),
            home_url: None,

            url: "http://localhost:3000".to_string(),
            root: "/".to_string(),

            content_dir: "changelog".to_string(),
            public_dir: "public".to_string(),
            meta_file: "_meta.json".to_string(),

            date_format: "MMMM DD, YYYY".to_string(),
            timezone: "UTC".to_string(),
            invalid_dates: DatePolicy::default(),

            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Timezone used for dates written without an offset.
    /// Unknown names fall back to UTC.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
                Tz::UTC
            }
        }
    }
}

/// What to do with an entry whose `date` cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Abort the whole load
    Fail,
    /// Drop the entry
    Exclude,
    /// Keep the entry after every dated one
    #[default]
    SortLast,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Changelog");
        assert_eq!(config.content_dir, "changelog");
        assert_eq!(config.meta_file, "_meta.json");
        assert_eq!(config.invalid_dates, DatePolicy::SortLast);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Acme Changelog
home_url: https://acme.example
timezone: Europe/Berlin
invalid_dates: fail
highlight:
  line_number: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Acme Changelog");
        assert_eq!(config.home_url.as_deref(), Some("https://acme.example"));
        assert_eq!(config.invalid_dates, DatePolicy::Fail);
        assert_eq!(config.tz(), chrono_tz::Europe::Berlin);
        assert!(config.highlight.line_number);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert_eq!(config.public_dir, "public");
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert_eq!(config.tz(), Tz::UTC);
    }
}
