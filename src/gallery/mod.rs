//! Media gallery: an inline slideshow with thumbnails and a lightbox overlay
//!
//! A [`Gallery`] only exists for a non-empty media list; an entry whose
//! `images` are all blank gets no gallery at all. Opening the lightbox holds a
//! [`ScrollLock`] on the page [`Viewport`], so background scrolling comes back
//! however the lightbox goes away: closing it, pressing Escape, or dropping
//! the gallery.

mod media;
mod viewport;

pub use media::{build_media_items, MediaItem, MediaType, MEDIA_PREFIX};
pub use viewport::{ScrollLock, Viewport};

/// A key press delivered to the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Whether the gallery consumed a key (and its default action should be suppressed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

/// A thumbnail button in the strip below the slideshow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail<'a> {
    pub index: usize,
    pub item: &'a MediaItem,
    pub active: bool,
    pub label: String,
}

/// Slideshow and lightbox state for one changelog entry
#[derive(Debug)]
pub struct Gallery {
    items: Vec<MediaItem>,
    active_index: usize,
    viewport: Viewport,
    lightbox: Option<ScrollLock>,
}

impl Gallery {
    /// `None` when there is nothing to show
    pub fn new(items: Vec<MediaItem>, viewport: Viewport) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            active_index: 0,
            viewport,
            lightbox: None,
        })
    }

    /// Build the items for an entry and wrap them in a gallery
    pub fn for_entry<S: AsRef<str>>(
        title: &str,
        product: &str,
        file_names: &[S],
        viewport: Viewport,
    ) -> Option<Self> {
        Self::new(build_media_items(title, product, file_names), viewport)
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; an empty gallery is never constructed
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_item(&self) -> &MediaItem {
        &self.items[self.active_index]
    }

    /// Prev/next controls, thumbnails and the counter only exist with more than one item
    pub fn has_multiple(&self) -> bool {
        self.items.len() > 1
    }

    pub fn go_prev(&mut self) {
        if self.has_multiple() {
            let len = self.items.len();
            self.active_index = (self.active_index + len - 1) % len;
        }
    }

    pub fn go_next(&mut self) {
        if self.has_multiple() {
            self.active_index = (self.active_index + 1) % self.items.len();
        }
    }

    /// Jump to a thumbnail. Returns false (and changes nothing) for an index
    /// that has no thumbnail.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.active_index = index;
            true
        } else {
            false
        }
    }

    pub fn is_lightbox_open(&self) -> bool {
        self.lightbox.is_some()
    }

    pub fn open_lightbox(&mut self) {
        if self.lightbox.is_none() {
            self.lightbox = Some(self.viewport.lock_scroll());
        }
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox = None;
    }

    /// Keyboard handling; keys only reach the gallery while the lightbox is open
    pub fn handle_key(&mut self, key: &Key) -> KeyOutcome {
        if !self.is_lightbox_open() {
            return KeyOutcome::Ignored;
        }

        match key {
            Key::Escape => {
                self.close_lightbox();
                KeyOutcome::Handled
            }
            Key::ArrowLeft if self.has_multiple() => {
                self.go_prev();
                KeyOutcome::Handled
            }
            Key::ArrowRight if self.has_multiple() => {
                self.go_next();
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Thumbnail strip; empty for single-item galleries
    pub fn thumbnails(&self) -> Vec<Thumbnail<'_>> {
        if !self.has_multiple() {
            return Vec::new();
        }
        let len = self.items.len();
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| Thumbnail {
                index,
                item,
                active: index == self.active_index,
                label: format!("View media {} of {}", index + 1, len),
            })
            .collect()
    }

    /// `2 / 5` style position, only for multi-item galleries
    pub fn counter(&self) -> Option<String> {
        self.has_multiple()
            .then(|| format!("{} / {}", self.active_index + 1, self.items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(names: &[&str], viewport: &Viewport) -> Gallery {
        Gallery::for_entry("Release", "web", names, viewport.clone()).unwrap()
    }

    #[test]
    fn test_empty_gallery_does_not_exist() {
        let viewport = Viewport::new();
        assert!(Gallery::new(Vec::new(), viewport.clone()).is_none());
        assert!(Gallery::for_entry("T", "web", &["", "   "], viewport).is_none());
    }

    #[test]
    fn test_starts_at_first_item_closed() {
        let viewport = Viewport::new();
        let g = gallery(&["a.png", "b.png"], &viewport);
        assert_eq!(g.active_index(), 0);
        assert_eq!(g.active_item().file_name, "a.png");
        assert!(!g.is_lightbox_open());
    }

    #[test]
    fn test_wrap_around() {
        let viewport = Viewport::new();
        let mut g = gallery(&["a.png", "b.png", "c.png"], &viewport);
        g.go_prev();
        assert_eq!(g.active_index(), 2);
        g.go_next();
        assert_eq!(g.active_index(), 0);
        g.go_next();
        g.go_next();
        assert_eq!(g.active_index(), 2);
        g.go_next();
        assert_eq!(g.active_index(), 0);
    }

    #[test]
    fn test_single_item_has_no_navigation() {
        let viewport = Viewport::new();
        let mut g = gallery(&["only.png"], &viewport);
        assert!(!g.has_multiple());
        g.go_next();
        g.go_prev();
        assert_eq!(g.active_index(), 0);
        assert!(g.thumbnails().is_empty());
        assert_eq!(g.counter(), None);
    }

    #[test]
    fn test_select_thumbnail() {
        let viewport = Viewport::new();
        let mut g = gallery(&["a.png", "b.png", "c.png"], &viewport);
        assert!(g.select(2));
        assert_eq!(g.active_index(), 2);
        assert!(!g.select(3));
        assert_eq!(g.active_index(), 2);

        let thumbs = g.thumbnails();
        assert_eq!(thumbs.len(), 3);
        assert!(thumbs[2].active);
        assert!(!thumbs[0].active);
        assert_eq!(thumbs[0].label, "View media 1 of 3");
        assert_eq!(g.counter().as_deref(), Some("3 / 3"));
    }

    #[test]
    fn test_lightbox_restores_scroll_on_close() {
        let viewport = Viewport::with_overflow("auto");
        let mut g = gallery(&["a.png"], &viewport);

        g.open_lightbox();
        assert!(g.is_lightbox_open());
        assert_eq!(viewport.overflow(), "hidden");

        // Opening twice must not record "hidden" as the value to restore
        g.open_lightbox();
        g.close_lightbox();
        assert!(!g.is_lightbox_open());
        assert_eq!(viewport.overflow(), "auto");
    }

    #[test]
    fn test_lightbox_restores_scroll_when_gallery_goes_away() {
        let viewport = Viewport::with_overflow("scroll");
        let mut g = gallery(&["a.png", "b.png"], &viewport);
        g.open_lightbox();
        assert!(viewport.is_scroll_locked());
        drop(g);
        assert_eq!(viewport.overflow(), "scroll");
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let viewport = Viewport::new();
        let mut g = gallery(&["a.png", "b.png"], &viewport);
        assert_eq!(g.handle_key(&Key::ArrowRight), KeyOutcome::Ignored);
        assert_eq!(g.handle_key(&Key::Escape), KeyOutcome::Ignored);
        assert_eq!(g.active_index(), 0);
    }

    #[test]
    fn test_arrow_keys_navigate_in_lightbox() {
        let viewport = Viewport::new();
        let mut g = gallery(&["a.png", "b.png", "c.png"], &viewport);
        g.open_lightbox();
        assert_eq!(g.handle_key(&Key::from_name("ArrowLeft")), KeyOutcome::Handled);
        assert_eq!(g.active_index(), 2);
        assert_eq!(g.handle_key(&Key::from_name("ArrowRight")), KeyOutcome::Handled);
        assert_eq!(g.active_index(), 0);
        assert_eq!(g.handle_key(&Key::from_name("Enter")), KeyOutcome::Ignored);
        assert!(g.is_lightbox_open());
    }

    #[test]
    fn test_single_item_arrows_ignored_escape_closes() {
        let viewport = Viewport::with_overflow("auto");
        let mut g = gallery(&["a.png"], &viewport);
        g.open_lightbox();
        assert_eq!(g.handle_key(&Key::ArrowRight), KeyOutcome::Ignored);
        assert_eq!(g.handle_key(&Key::Escape), KeyOutcome::Handled);
        assert!(!g.is_lightbox_open());
        assert_eq!(viewport.overflow(), "auto");
    }

    #[test]
    fn test_galleries_are_independent() {
        let viewport = Viewport::new();
        let mut first = gallery(&["a.png", "b.png"], &viewport);
        let second = gallery(&["c.png", "d.png"], &viewport);
        first.go_next();
        assert_eq!(first.active_index(), 1);
        assert_eq!(second.active_index(), 0);
    }
}
