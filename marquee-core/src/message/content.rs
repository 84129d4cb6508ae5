//! Content producers
//!
//! Every descriptor carries one of a small set of producers. The text is
//! produced again each time the descriptor is shown, so a clock keeps
//! ticking and a weather line picks up fresh readings without the owner
//! re-registering anything.

use core::cell::RefCell;
use core::fmt::Write;

use super::{text_from, Text};
use crate::traits::WallClock;

/// Lazily evaluated message content
#[derive(Debug, Clone)]
pub enum Content<'a> {
    /// Fixed text
    Static(Text),
    /// Current local time, `HH:MM:SS`
    Clock,
    /// Current local date, `DD.MM.YYYY`
    Date,
    /// Text maintained by another subsystem
    Shared(&'a SharedText),
}

impl<'a> Content<'a> {
    /// Produce the text to show right now
    ///
    /// Clock and date produce empty text while the wall clock is not
    /// synchronised; empty text makes the rotation skip the descriptor.
    pub fn produce(&self, clock: &dyn WallClock) -> Text {
        match self {
            Content::Static(text) => text.clone(),
            Content::Clock => {
                let mut text = Text::new();
                if let Some(t) = clock.local_time() {
                    let _ = write!(text, "{:02}:{:02}:{:02}", t.hour, t.minute, t.second);
                }
                text
            }
            Content::Date => {
                let mut text = Text::new();
                if let Some(t) = clock.local_time() {
                    let _ = write!(text, "{:02}.{:02}.{:04}", t.day, t.month, t.year);
                }
                text
            }
            Content::Shared(shared) => shared.get(),
        }
    }
}

/// Text slot written by a producer and read by the display
///
/// Interior mutability keeps the writer and the display task decoupled:
/// both hold a shared reference and never run at the same time.
#[derive(Debug, Default)]
pub struct SharedText {
    text: RefCell<Text>,
}

impl SharedText {
    /// Create an empty slot
    pub const fn new() -> Self {
        Self {
            text: RefCell::new(Text::new()),
        }
    }

    /// Replace the text (truncated to capacity)
    pub fn set(&self, text: &str) {
        *self.text.borrow_mut() = text_from(text);
    }

    /// Empty the slot; descriptors reading it are skipped until set again
    pub fn clear(&self) {
        self.text.borrow_mut().clear();
    }

    /// Copy of the current text
    pub fn get(&self) -> Text {
        self.text.borrow().clone()
    }

    /// Check if the slot is empty
    pub fn is_empty(&self) -> bool {
        self.text.borrow().is_empty()
    }
}
