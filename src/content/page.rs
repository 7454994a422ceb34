//! Content page model

use serde::{Deserialize, Serialize};

/// One changelog file as produced by a content source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPage {
    /// Stable URL derived from the file path
    pub url: String,
    /// Path segments without extension (`index` dropped)
    pub slugs: Vec<String>,
    /// Path relative to the content root, `/`-separated
    pub path: String,
    pub data: ChangelogData,
}

/// Front-matter fields plus rendered body of a changelog file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangelogData {
    pub title: String,
    pub description: Option<String>,
    /// Raw `date` value; parsed by the aggregator
    pub date: String,
    pub version: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    /// Rendered HTML body
    pub body: String,
}

impl ContentPage {
    /// Build a page from its content-relative path, deriving `slugs` and `url`
    pub fn new(path: impl Into<String>, data: ChangelogData) -> Self {
        let path = path.into();
        let slugs = slugs_for(&path);
        let url = format!("/{}", slugs.join("/"));
        Self {
            url,
            slugs,
            path,
            data,
        }
    }
}

fn slugs_for(path: &str) -> Vec<String> {
    let without_ext = match path.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem,
        _ => path,
    };

    let mut slugs: Vec<String> = without_ext
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if slugs.last().map(String::as_str) == Some("index") {
        slugs.pop();
    }
    slugs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs_and_url() {
        let page = ContentPage::new("mobile-app/2024-03-01-dark-mode.mdx", ChangelogData::default());
        assert_eq!(page.slugs, vec!["mobile-app", "2024-03-01-dark-mode"]);
        assert_eq!(page.url, "/mobile-app/2024-03-01-dark-mode");
    }

    #[test]
    fn test_index_file_uses_directory() {
        let page = ContentPage::new("web/index.md", ChangelogData::default());
        assert_eq!(page.slugs, vec!["web"]);
        assert_eq!(page.url, "/web");
    }

    #[test]
    fn test_dot_in_directory_name() {
        let page = ContentPage::new("v1.2/notes", ChangelogData::default());
        assert_eq!(page.slugs, vec!["v1.2", "notes"]);
    }
}
