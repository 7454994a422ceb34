//! Data structures for template context

use serde::Serialize;
use std::collections::HashSet;

use crate::changelog::{ChangelogEntry, Product};
use crate::config::SiteConfig;
use crate::filter::ProductFilter;
use crate::gallery::{Gallery, MediaItem, Viewport};
use crate::helpers::{date_xml, format_date, full_url_for, url_for};

#[derive(Debug, Clone, Serialize)]
pub struct IndexData {
    pub site: SiteData,
    /// Empty when there is at most one product
    pub tabs: Vec<TabData>,
    pub product_description: Option<String>,
    pub entries: Vec<EntryData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub home_url: Option<String>,
    pub root: String,
    /// Absolute URL of the current view
    pub canonical_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabData {
    pub label: String,
    pub href: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryData {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub datetime: String,
    pub version: Option<String>,
    pub tags: Vec<String>,
    pub product_badge: Option<String>,
    pub body: String,
    pub gallery: Option<GalleryData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaData {
    pub src: String,
    pub alt: String,
    pub file_name: String,
    pub is_video: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThumbnailData {
    pub index: usize,
    pub media: MediaData,
    pub active: bool,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GalleryData {
    pub id: String,
    pub active: MediaData,
    pub active_index: usize,
    pub has_multiple: bool,
    pub lightbox_open: bool,
    pub counter: Option<String>,
    pub thumbnails: Vec<ThumbnailData>,
    /// Items as JSON for the client-side script
    pub items_json: String,
}

impl MediaData {
    fn new(config: &SiteConfig, item: &MediaItem) -> Self {
        Self {
            src: url_for(config, &item.src),
            alt: item.alt.clone(),
            file_name: item.file_name.clone(),
            is_video: item.is_video(),
        }
    }
}

impl GalleryData {
    /// Snapshot of a gallery's current state
    pub fn from_gallery(config: &SiteConfig, id: &str, gallery: &Gallery) -> Self {
        let items: Vec<MediaData> = gallery
            .items()
            .iter()
            .map(|item| MediaData::new(config, item))
            .collect();

        let thumbnails = gallery
            .thumbnails()
            .into_iter()
            .map(|thumb| ThumbnailData {
                index: thumb.index,
                media: items[thumb.index].clone(),
                active: thumb.active,
                label: thumb.label,
            })
            .collect();

        let items_json = serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string());

        Self {
            id: id.to_string(),
            active: items[gallery.active_index()].clone(),
            active_index: gallery.active_index(),
            has_multiple: gallery.has_multiple(),
            lightbox_open: gallery.is_lightbox_open(),
            counter: gallery.counter(),
            thumbnails,
            items_json,
        }
    }
}

impl IndexData {
    /// Assemble the timeline page for the current filter
    pub fn build(
        config: &SiteConfig,
        products: &[Product],
        entries: &[ChangelogEntry],
        filter: &ProductFilter,
    ) -> Self {
        let current = filter.current_product();

        let tabs = if products.len() > 1 {
            std::iter::once(TabData {
                label: "All".to_string(),
                href: url_for(config, &filter.with_product(None).href()),
                selected: current.is_none(),
            })
            .chain(products.iter().map(|product| TabData {
                label: product.display_name.clone(),
                href: url_for(config, &filter.with_product(Some(&product.slug)).href()),
                selected: current == Some(product.slug.as_str()),
            }))
            .collect()
        } else {
            Vec::new()
        };

        let product_description = current
            .and_then(|slug| products.iter().find(|p| p.slug == slug))
            .and_then(|p| p.description.clone());

        let show_badge = current.is_none() && products.len() > 1;
        let tz = config.tz();
        // Galleries are rendered in their initial state; the page never starts locked
        let viewport = Viewport::new();
        let mut used_ids = HashSet::new();

        let entries = entries
            .iter()
            .map(|entry| {
                let data = &entry.page.data;
                let id = unique_id(&mut used_ids, entry.page.slugs.join("-"));

                let (date, datetime) = match entry.date {
                    Some(date) => {
                        let local = date.with_timezone(&tz);
                        (format_date(&local, &config.date_format), date_xml(&local))
                    }
                    None => (data.date.clone(), String::new()),
                };

                let product_badge = if show_badge {
                    products
                        .iter()
                        .find(|p| p.slug == entry.product)
                        .map(|p| p.display_name.clone())
                } else {
                    None
                };

                let gallery =
                    Gallery::for_entry(&data.title, &entry.product, &data.images, viewport.clone())
                        .map(|gallery| GalleryData::from_gallery(config, &id, &gallery));

                EntryData {
                    id,
                    title: data.title.clone(),
                    description: data.description.clone(),
                    date,
                    datetime,
                    version: data.version.clone(),
                    tags: data.tags.clone(),
                    product_badge,
                    body: data.body.clone(),
                    gallery,
                }
            })
            .collect();

        Self {
            site: SiteData {
                title: config.title.clone(),
                description: config.description.clone(),
                home_url: config.home_url.clone(),
                root: config.root.clone(),
                canonical_url: full_url_for(config, &filter.href()),
            },
            tabs,
            product_description,
            entries,
        }
    }
}

/// `base`, or `base-2`, `base-3`, ... when already taken on this page
fn unique_id(used: &mut HashSet<String>, base: String) -> String {
    let mut id = base.clone();
    let mut n = 2;
    while used.contains(&id) {
        id = format!("{}-{}", base, n);
        n += 1;
    }
    used.insert(id.clone());
    id
}
