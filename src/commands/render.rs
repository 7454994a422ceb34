//! Render the timeline page

use anyhow::Result;

use crate::changelog::{products, select};
use crate::filter::ProductFilter;
use crate::templates::{IndexData, TemplateRenderer};
use crate::{Changelog, SiteAggregator};

/// Render the page for a raw query string with an existing aggregator and
/// template set. Content is re-read on every call.
pub fn render_page(
    app: &Changelog,
    aggregator: &SiteAggregator,
    templates: &TemplateRenderer,
    query: Option<&str>,
) -> Result<String> {
    let entries = aggregator.load_all()?;
    let products = products::discover(&entries, aggregator.meta());

    let filter = ProductFilter::from_request("/", query);
    let entries = select(entries, filter.current_product());
    tracing::debug!(
        "Rendering {} entries for product {:?}",
        entries.len(),
        filter.current_product()
    );

    let data = IndexData::build(&app.config, &products, &entries, &filter);
    Ok(templates.render_index(&data)?)
}

/// One-off render, building the aggregator and templates
pub fn run(app: &Changelog, query: Option<&str>) -> Result<String> {
    let templates = TemplateRenderer::new()?;
    render_page(app, &app.aggregator(), &templates, query)
}
