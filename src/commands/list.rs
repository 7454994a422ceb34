//! List products and entries

use anyhow::Result;

use crate::changelog::{products, select};
use crate::Changelog;

/// List site content by type
pub fn run(app: &Changelog, content_type: &str, product: Option<&str>) -> Result<()> {
    let aggregator = app.aggregator();

    match content_type {
        "product" | "products" => {
            let entries = aggregator.load_all()?;
            let products = products::discover(&entries, aggregator.meta());
            println!("Products ({}):", products.len());
            for product in products {
                let count = entries.iter().filter(|e| e.product == product.slug).count();
                println!(
                    "  {} [{}] order={} ({} entries)",
                    product.display_name, product.slug, product.order, count
                );
            }
        }
        "entry" | "entries" => {
            let entries = select(aggregator.load_all()?, product);
            println!("Entries ({}):", entries.len());
            for entry in entries {
                let date = entry
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| format!("invalid date {:?}", entry.page.data.date));
                let version = entry
                    .page
                    .data
                    .version
                    .as_deref()
                    .map(|v| format!(" v{}", v))
                    .unwrap_or_default();
                println!(
                    "  {} - {}{} [{}] ({})",
                    date, entry.page.data.title, version, entry.product, entry.page.path
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: products, entries",
                content_type
            );
        }
    }

    Ok(())
}
