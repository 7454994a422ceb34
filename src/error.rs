//! Error types for the content and rendering layers

use std::path::PathBuf;

/// Errors surfaced by loading, aggregating and rendering changelog content
#[derive(Debug, thiserror::Error)]
pub enum ChangelogError {
    /// Reading a content file or directory failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Walking the content directory failed
    #[error("Failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A content file has front-matter that could not be parsed
    #[error("Invalid front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    /// An entry's `date` could not be parsed and the site is configured to fail
    #[error("Invalid date {value:?} in {path}")]
    InvalidDate { path: String, value: String },

    /// Template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}
