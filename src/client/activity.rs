//! Page visibility and focus sampling.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Reports whether the user is looking at the dashboard.
pub trait ActivitySampler: Send + Sync {
    fn visibility(&self) -> Visibility;

    fn has_focus(&self) -> bool;

    /// Active means visible AND focused.
    fn is_page_active(&self) -> bool {
        self.visibility() == Visibility::Visible && self.has_focus()
    }
}

/// Sampler fed by visibility-change and focus/blur events.
#[derive(Debug)]
pub struct PageActivity {
    hidden: AtomicBool,
    focused: AtomicBool,
}

impl PageActivity {
    /// A freshly loaded page: visible and focused.
    pub fn new() -> Self {
        Self {
            hidden: AtomicBool::new(false),
            focused: AtomicBool::new(true),
        }
    }

    pub fn set_visibility(&self, visibility: Visibility) {
        self.hidden
            .store(visibility == Visibility::Hidden, Ordering::Relaxed);
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::Relaxed);
    }
}

impl Default for PageActivity {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivitySampler for PageActivity {
    fn visibility(&self) -> Visibility {
        if self.hidden.load(Ordering::Relaxed) {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    fn has_focus(&self) -> bool {
        self.focused.load(Ordering::Relaxed)
    }
}
