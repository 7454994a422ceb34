//! Changelog aggregation - tags pages with their product, filters and orders them

pub mod products;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::cmp::Ordering;

pub use products::{
    slug_to_display_name, FsMetaSource, MetaSource, Product, ProductMeta, DEFAULT_ORDER,
};

use crate::config::DatePolicy;
use crate::content::{parse_date, ContentPage, ContentSource};
use crate::error::ChangelogError;

/// Product assigned to files stored directly in the content root
pub const DEFAULT_PRODUCT: &str = "default";

/// A content page annotated with its owning product and parsed date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangelogEntry {
    pub page: ContentPage,
    pub product: String,
    /// `None` when the raw date did not parse
    pub date: Option<DateTime<Utc>>,
}

/// First path segment, or [`DEFAULT_PRODUCT`] for files without a directory
pub fn product_from_path(path: &str) -> &str {
    match path.split_once('/') {
        Some((first, _)) => first,
        None => DEFAULT_PRODUCT,
    }
}

/// Newest first. Undated entries go last; ties keep their incoming order.
pub fn sort_newest_first(entries: &mut [ChangelogEntry]) {
    entries.sort_by(|a, b| match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Keep the entries of `product` (all of them for `None` or an empty slug),
/// newest first
pub fn select(entries: Vec<ChangelogEntry>, product: Option<&str>) -> Vec<ChangelogEntry> {
    let mut selected: Vec<_> = match product.filter(|p| !p.is_empty()) {
        Some(product) => entries.into_iter().filter(|e| e.product == product).collect(),
        None => entries,
    };
    sort_newest_first(&mut selected);
    selected
}

/// Reads pages from a [`ContentSource`] and product metadata from a
/// [`MetaSource`]. Nothing is cached: every query goes back to the source.
pub struct ChangelogAggregator<S, M> {
    source: S,
    meta: M,
    tz: Tz,
    date_policy: DatePolicy,
}

impl<S: ContentSource, M: MetaSource> ChangelogAggregator<S, M> {
    pub fn new(source: S, meta: M) -> Self {
        Self {
            source,
            meta,
            tz: Tz::UTC,
            date_policy: DatePolicy::default(),
        }
    }

    /// Timezone for dates written without an offset
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    pub fn meta(&self) -> &M {
        &self.meta
    }

    /// Every page, annotated with its product, in source order
    pub fn load_all(&self) -> Result<Vec<ChangelogEntry>, ChangelogError> {
        let mut entries = Vec::new();

        for page in self.source.pages()? {
            let date = parse_date(&page.data.date, self.tz);
            if date.is_none() {
                match self.date_policy {
                    DatePolicy::Fail => {
                        return Err(ChangelogError::InvalidDate {
                            path: page.path,
                            value: page.data.date,
                        });
                    }
                    DatePolicy::Exclude => {
                        tracing::warn!(
                            "Skipping {}: invalid date {:?}",
                            page.path,
                            page.data.date
                        );
                        continue;
                    }
                    DatePolicy::SortLast => {
                        tracing::warn!(
                            "{} has invalid date {:?}, listing it last",
                            page.path,
                            page.data.date
                        );
                    }
                }
            }

            let product = product_from_path(&page.path).to_string();
            entries.push(ChangelogEntry {
                page,
                product,
                date,
            });
        }

        Ok(entries)
    }

    /// Entries of one product (or all), newest first
    pub fn query_by_product(
        &self,
        product: Option<&str>,
    ) -> Result<Vec<ChangelogEntry>, ChangelogError> {
        Ok(select(self.load_all()?, product))
    }

    /// Distinct products among the current entries, in display order
    pub fn discover_products(&self) -> Result<Vec<Product>, ChangelogError> {
        Ok(products::discover(&self.load_all()?, &self.meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ChangelogData;

    fn page(path: &str, date: &str) -> ContentPage {
        ContentPage::new(
            path,
            ChangelogData {
                title: path.to_string(),
                date: date.to_string(),
                ..Default::default()
            },
        )
    }

    fn no_meta(_: &str) -> Option<Vec<u8>> {
        None
    }

    fn titles(entries: &[ChangelogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.page.data.title.as_str()).collect()
    }

    fn sample() -> Vec<ContentPage> {
        vec![
            page("web/jan.md", "2024-01-01"),
            page("mobile-app/feb.md", "2024-02-01"),
            page("web/mar.md", "2024-03-01"),
            page("loose.md", "2023-12-01"),
        ]
    }

    #[test]
    fn test_product_from_path() {
        assert_eq!(product_from_path("mobile-app/2024-01-01.mdx"), "mobile-app");
        assert_eq!(product_from_path("web/nested/entry.md"), "web");
        assert_eq!(product_from_path("entry.md"), DEFAULT_PRODUCT);
        assert_eq!(product_from_path(""), DEFAULT_PRODUCT);
    }

    #[test]
    fn test_load_all_annotates_without_reordering() {
        let aggregator = ChangelogAggregator::new(sample(), no_meta);
        let entries = aggregator.load_all().unwrap();
        let products: Vec<_> = entries.iter().map(|e| e.product.as_str()).collect();
        assert_eq!(products, vec!["web", "mobile-app", "web", "default"]);
        assert!(entries.iter().all(|e| e.date.is_some()));
    }

    #[test]
    fn test_query_all_sorted_newest_first() {
        let aggregator = ChangelogAggregator::new(sample(), no_meta);
        let entries = aggregator.query_by_product(None).unwrap();
        assert_eq!(
            titles(&entries),
            vec!["web/mar.md", "mobile-app/feb.md", "web/jan.md", "loose.md"]
        );
    }

    #[test]
    fn test_query_filters_by_product() {
        let aggregator = ChangelogAggregator::new(sample(), no_meta);
        let entries = aggregator.query_by_product(Some("web")).unwrap();
        assert_eq!(titles(&entries), vec!["web/mar.md", "web/jan.md"]);
        assert!(entries.iter().all(|e| e.product == "web"));

        assert!(aggregator.query_by_product(Some("nope")).unwrap().is_empty());
        assert_eq!(aggregator.query_by_product(Some("")).unwrap().len(), 4);
    }

    #[test]
    fn test_query_does_not_touch_source() {
        let pages = sample();
        let aggregator = ChangelogAggregator::new(&pages, no_meta);
        aggregator.query_by_product(Some("web")).unwrap();
        assert_eq!(pages, sample());
    }

    #[test]
    fn test_equal_dates_keep_source_order() {
        let pages = vec![
            page("web/a.md", "2024-01-01"),
            page("web/b.md", "2024-01-01"),
            page("web/c.md", "2024-01-01"),
        ];
        let aggregator = ChangelogAggregator::new(pages, no_meta);
        let entries = aggregator.query_by_product(None).unwrap();
        assert_eq!(titles(&entries), vec!["web/a.md", "web/b.md", "web/c.md"]);
    }

    #[test]
    fn test_invalid_date_sorted_last_by_default() {
        let pages = vec![page("web/bad.md", "someday"), page("web/ok.md", "2020-01-01")];
        let aggregator = ChangelogAggregator::new(pages, no_meta);
        let entries = aggregator.query_by_product(None).unwrap();
        assert_eq!(titles(&entries), vec!["web/ok.md", "web/bad.md"]);
        assert_eq!(entries[1].date, None);
    }

    #[test]
    fn test_invalid_date_excluded() {
        let pages = vec![page("web/bad.md", ""), page("web/ok.md", "2020-01-01")];
        let aggregator =
            ChangelogAggregator::new(pages, no_meta).with_date_policy(DatePolicy::Exclude);
        let entries = aggregator.load_all().unwrap();
        assert_eq!(titles(&entries), vec!["web/ok.md"]);
    }

    #[test]
    fn test_invalid_date_fails_load() {
        let pages = vec![page("web/ok.md", "2020-01-01"), page("web/bad.md", "soon")];
        let aggregator =
            ChangelogAggregator::new(pages, no_meta).with_date_policy(DatePolicy::Fail);
        match aggregator.load_all() {
            Err(ChangelogError::InvalidDate { path, value }) => {
                assert_eq!(path, "web/bad.md");
                assert_eq!(value, "soon");
            }
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_timezone_affects_ordering_of_same_day_entries() {
        let pages = vec![
            page("web/local.md", "2024-01-01"),
            page("web/utc.md", "2024-01-01T02:00:00Z"),
        ];
        // Midnight in New York is 05:00 UTC, after the explicit 02:00 UTC entry
        let aggregator = ChangelogAggregator::new(pages, no_meta)
            .with_timezone(chrono_tz::America::New_York);
        let entries = aggregator.query_by_product(None).unwrap();
        assert_eq!(titles(&entries), vec!["web/local.md", "web/utc.md"]);
    }

    #[test]
    fn test_discover_products_matches_content() {
        let meta = |slug: &str| match slug {
            "mobile-app" => Some(br#"{"order": 1}"#.to_vec()),
            "web" => Some(br#"{"displayName": "Website", "description": "The site"}"#.to_vec()),
            _ => None,
        };
        let aggregator = ChangelogAggregator::new(sample(), meta);
        let products = aggregator.discover_products().unwrap();

        let slugs: Vec<_> = products.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["mobile-app", "default", "web"]);
        assert_eq!(products[0].display_name, "Mobile App");
        assert_eq!(products[1].display_name, "Default");
        assert_eq!(products[2].display_name, "Website");
        assert_eq!(products[2].description.as_deref(), Some("The site"));
    }

    #[test]
    fn test_discover_orders_by_order_then_name() {
        let pages = vec![
            page("zeta/a.md", "2024-01-01"),
            page("alpha/a.md", "2024-01-01"),
            page("beta/a.md", "2024-01-01"),
            page("gamma/a.md", "2024-01-01"),
        ];
        let meta = |slug: &str| match slug {
            "zeta" => Some(br#"{"order": 1}"#.to_vec()),
            "gamma" => Some(br#"{"order": 1, "displayName": "Apex"}"#.to_vec()),
            _ => None,
        };
        let products = ChangelogAggregator::new(pages, meta)
            .discover_products()
            .unwrap();
        let names: Vec<_> = products.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, vec!["Apex", "Zeta", "Alpha", "Beta"]);
    }

    #[test]
    fn test_no_products_without_entries() {
        let aggregator = ChangelogAggregator::new(Vec::new(), no_meta);
        assert!(aggregator.discover_products().unwrap().is_empty());
        assert!(aggregator.query_by_product(None).unwrap().is_empty());
    }
}
