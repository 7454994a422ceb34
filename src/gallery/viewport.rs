//! Background scroll state shared by every gallery on a page

use std::cell::RefCell;
use std::rc::Rc;

const HIDDEN: &str = "hidden";

/// The page's `overflow` style. Clones share the same underlying value.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    overflow: Rc<RefCell<String>>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overflow(overflow: &str) -> Self {
        Self {
            overflow: Rc::new(RefCell::new(overflow.to_string())),
        }
    }

    pub fn overflow(&self) -> String {
        self.overflow.borrow().clone()
    }

    pub fn set_overflow(&self, overflow: &str) {
        *self.overflow.borrow_mut() = overflow.to_string();
    }

    pub fn is_scroll_locked(&self) -> bool {
        *self.overflow.borrow() == HIDDEN
    }

    /// Hide background scrolling until the returned guard is dropped
    pub fn lock_scroll(&self) -> ScrollLock {
        let previous = self.overflow.replace(HIDDEN.to_string());
        ScrollLock {
            viewport: self.clone(),
            previous,
        }
    }
}

/// Restores the overflow value seen at acquisition when dropped
#[derive(Debug)]
#[must_use = "scrolling is restored as soon as the lock is dropped"]
pub struct ScrollLock {
    viewport: Viewport,
    previous: String,
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        *self.viewport.overflow.borrow_mut() = previous;
    }
}
