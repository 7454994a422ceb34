//! Media items derived from an entry's `images` list

use serde::Serialize;

/// URL prefix media files are served under
pub const MEDIA_PREFIX: &str = "/changelog";

/// How a media file is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// `.mp4` and `.webm` (any case) are videos, everything else is an image
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".mp4") || lower.ends_with(".webm") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

/// A display-ready media file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub src: String,
    pub media_type: MediaType,
    pub file_name: String,
    pub alt: String,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }
}

/// Build media items for one changelog entry.
///
/// Blank names are dropped before numbering, so alt text counts 1, 2, 3...
/// over the kept names only.
pub fn build_media_items<S: AsRef<str>>(
    title: &str,
    product: &str,
    file_names: &[S],
) -> Vec<MediaItem> {
    file_names
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|name| !name.trim().is_empty())
        .enumerate()
        .map(|(index, file_name)| MediaItem {
            src: format!("{}/{}/images/{}", MEDIA_PREFIX, product, file_name),
            media_type: MediaType::from_file_name(file_name),
            file_name: file_name.to_string(),
            alt: format!("{} - Media {}", title, index + 1),
        })
        .collect()
}
