//! Window titles that tell several worlds apart.

use std::sync::atomic::{AtomicU32, Ordering};

const BASE_TITLE: &str = "World";

static GLOBAL: TitleAllocator = TitleAllocator::new();

/// Hands out window titles in opening order: `World`, `World 2`, `World 3`, ...
#[derive(Debug, Default)]
pub struct TitleAllocator {
    opened: AtomicU32,
}

impl TitleAllocator {
    /// Creates an allocator that has not handed out any title yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            opened: AtomicU32::new(0),
        }
    }

    /// Process-wide allocator used by worlds that are not given their own.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the title for the next world to open.
    pub fn allocate(&self) -> String {
        let ordinal = self.opened.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        if ordinal > 1 {
            format!("{BASE_TITLE} {ordinal}")
        } else {
            BASE_TITLE.to_owned()
        }
    }

    /// Number of titles handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.opened.load(Ordering::Relaxed)
    }
}
