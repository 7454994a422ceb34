//! Built-in changelog theme using the Tera template engine
//!
//! Templates are embedded in the binary; there is no theme directory to load.

mod data;

use std::collections::HashMap;
use tera::{Context, Tera};

use crate::error::ChangelogError;
use crate::helpers::escape_html;

pub use data::{
    EntryData, GalleryData, IndexData, MediaData, SiteData, TabData, ThumbnailData,
};

/// Template renderer with the embedded changelog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self, ChangelogError> {
        let mut tera = Tera::default();

        // Escaping is explicit through the `esc` filter; rendered Markdown bodies
        // go in as-is and URLs must keep their slashes
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            ("partials/tabs.html", include_str!("site/partials/tabs.html")),
            (
                "partials/entry.html",
                include_str!("site/partials/entry.html"),
            ),
            (
                "partials/gallery.html",
                include_str!("site/partials/gallery.html"),
            ),
            (
                "partials/scripts.html",
                include_str!("site/partials/scripts.html"),
            ),
        ])?;

        tera.register_filter("esc", esc_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, ChangelogError> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the timeline page
    pub fn render_index(&self, data: &IndexData) -> Result<String, ChangelogError> {
        let context = Context::from_serialize(data)?;
        self.render("index.html", &context)
    }
}

/// Tera filter: escape text for HTML content and attribute values
fn esc_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("esc", "value", String, value);
    Ok(tera::Value::String(escape_html(&s)))
}
