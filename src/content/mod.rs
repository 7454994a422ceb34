//! Content module - changelog files, front-matter and Markdown rendering

mod frontmatter;
pub mod loader;
mod markdown;
mod page;

pub use frontmatter::{parse_date, FrontMatter, FrontMatterError};
pub use loader::{ContentSource, FsContentSource};
pub use markdown::MarkdownRenderer;
pub use page::{ChangelogData, ContentPage};
