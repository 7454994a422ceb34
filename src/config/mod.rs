//! Configuration module

mod site;

pub use site::DatePolicy;
pub use site::HighlightConfig;
pub use site::SiteConfig;
