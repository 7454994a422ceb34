//! Content loader - reads changelog files from the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ChangelogData, ContentPage, FrontMatter, MarkdownRenderer};
use crate::error::ChangelogError;

/// Anything that can hand out the current set of changelog pages.
///
/// Implementations must re-read their backing store on every call.
pub trait ContentSource {
    fn pages(&self) -> Result<Vec<ContentPage>, ChangelogError>;
}

/// In-memory pages, mostly useful for tests and previews
impl ContentSource for Vec<ContentPage> {
    fn pages(&self) -> Result<Vec<ContentPage>, ChangelogError> {
        Ok(self.clone())
    }
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    fn pages(&self) -> Result<Vec<ContentPage>, ChangelogError> {
        (**self).pages()
    }
}

/// Loads changelog pages from Markdown files on disk
pub struct FsContentSource {
    content_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl FsContentSource {
    /// Create a new loader rooted at `content_dir`
    pub fn new<P: Into<PathBuf>>(content_dir: P, renderer: MarkdownRenderer) -> Self {
        Self {
            content_dir: content_dir.into(),
            renderer,
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Load a single page from a file
    fn load_page(&self, path: &Path, relative: String) -> Result<ContentPage, ChangelogError> {
        let content = fs::read_to_string(path)?;
        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| ChangelogError::FrontMatter {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let data = ChangelogData {
            title,
            description: fm.description,
            date: fm.date.unwrap_or_default(),
            version: fm.version,
            tags: fm.tags,
            images: fm.images,
            body: self.renderer.render(body),
        };

        Ok(ContentPage::new(relative, data))
    }
}

impl ContentSource for FsContentSource {
    /// Walks the content directory in file-name order so equal-date entries
    /// come out in a stable order between calls
    fn pages(&self) -> Result<Vec<ContentPage>, ChangelogError> {
        if !self.content_dir.exists() {
            tracing::debug!("Content directory {:?} does not exist", self.content_dir);
            return Ok(Vec::new());
        }

        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let Some(relative) = relative_path(&self.content_dir, path) else {
                continue;
            };

            match self.load_page(path, relative) {
                Ok(page) => pages.push(page),
                Err(e) => tracing::warn!("Failed to load changelog {:?}: {}", path, e),
            }
        }

        tracing::debug!("Loaded {} changelog pages", pages.len());
        Ok(pages)
    }
}

/// `/`-joined path below `root`; `None` for hidden or `_`-prefixed components
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str()?;
        if part.starts_with('_') || part.starts_with('.') {
            return None;
        }
        parts.push(part);
    }
    Some(parts.join("/"))
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "markdown" | "mdx"))
        .unwrap_or(false)
}
