//! changelog-rs: a product changelog site served from Markdown files
//!
//! Entries live under `changelog/<product>/*.md`, each product directory may
//! carry a `_meta.json` with its display name, order and description. The
//! site renders them as a filterable timeline with media galleries.

pub mod changelog;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod filter;
pub mod gallery;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

use changelog::{ChangelogAggregator, FsMetaSource};
use content::{FsContentSource, MarkdownRenderer};

/// Site configuration file, relative to the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// Aggregator reading from the site's content directory
pub type SiteAggregator = ChangelogAggregator<FsContentSource, FsMetaSource>;

/// The main changelog application
#[derive(Clone)]
pub struct Changelog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Changelog content directory
    pub content_dir: std::path::PathBuf,
    /// Static files (media) directory
    pub public_dir: std::path::PathBuf,
}

impl Changelog {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Aggregator over the content directory, configured from the site config
    pub fn aggregator(&self) -> SiteAggregator {
        let renderer = MarkdownRenderer::with_options(
            &self.config.highlight.theme,
            self.config.highlight.line_number,
        );
        ChangelogAggregator::new(
            FsContentSource::new(&self.content_dir, renderer),
            FsMetaSource::new(&self.content_dir, &self.config.meta_file),
        )
        .with_timezone(self.config.tz())
        .with_date_policy(self.config.invalid_dates)
    }

    /// Render the timeline page for a raw query string
    pub fn render_index(&self, query: Option<&str>) -> Result<String> {
        commands::render::run(self, query)
    }
}
