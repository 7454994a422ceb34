//! Product registry: display names, ordering and descriptions per product slug

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;

use super::ChangelogEntry;

/// Order assigned to products without an explicit `order`
pub const DEFAULT_ORDER: f64 = 999.0;

/// Optional per-product metadata (`_meta.json`). Unknown fields are ignored;
/// a field may be left out but not set to `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    #[serde(default, deserialize_with = "non_null")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub order: Option<f64>,
    #[serde(default, deserialize_with = "non_null")]
    pub description: Option<String>,
}

/// Present fields must hold a value of the field's type
fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ProductMeta {
    /// Decode raw metadata. Anything that does not validate counts as absent.
    pub fn from_slice(raw: &[u8]) -> Option<Self> {
        match serde_json::from_slice(raw) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!("Ignoring invalid product metadata: {}", e);
                None
            }
        }
    }
}

/// A product as shown in the tab bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub slug: String,
    pub display_name: String,
    pub order: f64,
    pub description: Option<String>,
}

impl Product {
    /// Resolve a product from its slug and optional raw metadata bytes
    pub fn resolve(slug: &str, raw_meta: Option<&[u8]>) -> Self {
        let meta = raw_meta.and_then(ProductMeta::from_slice).unwrap_or_default();

        let display_name = meta
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| slug_to_display_name(slug));

        Self {
            slug: slug.to_string(),
            display_name,
            order: meta.order.unwrap_or(DEFAULT_ORDER),
            description: meta.description,
        }
    }

    /// Ascending by order, then by display name
    pub fn cmp_display(&self, other: &Self) -> Ordering {
        self.order
            .total_cmp(&other.order)
            .then_with(|| {
                self.display_name
                    .to_lowercase()
                    .cmp(&other.display_name.to_lowercase())
            })
            .then_with(|| self.display_name.cmp(&other.display_name))
    }
}

/// `mobile-app` -> `Mobile App`
pub fn slug_to_display_name(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Source of raw per-product metadata
pub trait MetaSource {
    /// Raw bytes of the metadata record for `slug`, or `None` when absent
    fn read_meta(&self, slug: &str) -> Option<Vec<u8>>;
}

impl<F> MetaSource for F
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    fn read_meta(&self, slug: &str) -> Option<Vec<u8>> {
        self(slug)
    }
}

/// Reads `<content_dir>/<slug>/<file_name>`
#[derive(Debug, Clone)]
pub struct FsMetaSource {
    content_dir: PathBuf,
    file_name: String,
}

impl FsMetaSource {
    pub fn new<P: Into<PathBuf>>(content_dir: P, file_name: &str) -> Self {
        Self {
            content_dir: content_dir.into(),
            file_name: file_name.to_string(),
        }
    }
}

impl MetaSource for FsMetaSource {
    fn read_meta(&self, slug: &str) -> Option<Vec<u8>> {
        let path = self.content_dir.join(slug).join(&self.file_name);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!("Cannot read product metadata {:?}: {}", path, e);
                None
            }
        }
    }
}

/// Products present among `entries`, sorted for display
pub fn discover<M: MetaSource + ?Sized>(entries: &[ChangelogEntry], meta: &M) -> Vec<Product> {
    let slugs: IndexSet<&str> = entries
        .iter()
        .map(|entry| entry.product.as_str())
        .filter(|slug| !slug.is_empty())
        .collect();

    let mut products: Vec<Product> = slugs
        .into_iter()
        .map(|slug| Product::resolve(slug, meta.read_meta(slug).as_deref()))
        .collect();

    products.sort_by(Product::cmp_display);
    products
}
