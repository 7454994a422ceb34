//! Create a new changelog entry

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Changelog;

/// Options for a new entry
#[derive(Debug, Default)]
pub struct NewEntry<'a> {
    pub title: &'a str,
    pub product: &'a str,
    pub version: Option<&'a str>,
    pub tags: &'a [String],
}

/// Write `<content_dir>/<product>/<YYYY-MM-DD>-<slug>.md` and return its path
pub fn create_entry(app: &Changelog, entry: &NewEntry<'_>) -> Result<PathBuf> {
    let product = slug::slugify(entry.product);
    if product.is_empty() {
        anyhow::bail!("Invalid product name: {:?}", entry.product);
    }

    let now = chrono::Utc::now().with_timezone(&app.config.tz());
    let target_dir = app.content_dir.join(&product);
    fs::create_dir_all(&target_dir)?;

    let filename = format!("{}-{}.md", now.format("%Y-%m-%d"), slug::slugify(entry.title));
    let file_path = target_dir.join(filename);

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, scaffold(entry, &now.format("%Y-%m-%d").to_string()))?;
    tracing::debug!("Created: {:?}", file_path);

    Ok(file_path)
}

fn scaffold(entry: &NewEntry<'_>, date: &str) -> String {
    let mut content = String::from("---\n");
    content.push_str(&format!("title: {}\n", yaml_string(entry.title)));
    content.push_str(&format!("date: {}\n", date));
    if let Some(version) = entry.version {
        content.push_str(&format!("version: {}\n", yaml_string(version)));
    }
    if !entry.tags.is_empty() {
        content.push_str("tags:\n");
        for tag in entry.tags {
            content.push_str(&format!("  - {}\n", yaml_string(tag)));
        }
    }
    content.push_str("images: []\n---\n");
    content
}

/// Double-quoted YAML scalar
fn yaml_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}
