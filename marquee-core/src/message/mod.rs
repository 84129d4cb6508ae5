//! Message descriptors and queues
//!
//! A descriptor is one unit of displayable content: a lazy content
//! producer plus the timing the display task uses to show it. Persistent
//! descriptors live in the regular rotation; transient ones go through the
//! priority queue and are shown once.

pub mod content;
pub mod queue;

pub use content::{Content, SharedText};
pub use queue::{MessageQueues, Selection, SelectionSource, MAX_REGULAR_MESSAGES, PRIORITY_QUEUE_LEN};

use heapless::String;

use crate::time::Duration;

/// Maximum characters in one message
pub const MAX_TEXT_LEN: usize = 64;

/// Text produced for display
pub type Text = String<MAX_TEXT_LEN>;

/// Copy `s` into a [`Text`], truncating at a character boundary
pub fn text_from(s: &str) -> Text {
    let mut text = Text::new();
    for c in s.chars() {
        if text.push(c).is_err() {
            break;
        }
    }
    text
}

/// Identifies the subsystem that registered a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OwnerId(pub u8);

impl OwnerId {
    /// Owner of the built-in clock and date messages and of pushed notices
    pub const DISPLAY: OwnerId = OwnerId(0);
    /// Owner of messages loaded from the device configuration
    pub const CONFIG: OwnerId = OwnerId(1);
}

/// Message queue errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Priority queue has no free slot
    PriorityQueueFull,
    /// Regular rotation has no free slot
    RegularListFull,
}

/// One unit of displayable content plus its timing
#[derive(Debug, Clone)]
pub struct MessageDescriptor<'a> {
    /// Registering subsystem, used for bulk removal
    pub owner: OwnerId,
    /// Lazily evaluated text
    pub content: Content<'a>,
    /// Hold time per refresh, or step time per scroll column
    pub period: Duration,
    /// Remaining refresh cycles (static messages only)
    pub cycles: u16,
    /// Scroll the text instead of refreshing it in place
    pub scrolling: bool,
}

impl<'a> MessageDescriptor<'a> {
    /// Create a persistent descriptor for the regular rotation
    pub fn regular(
        owner: OwnerId,
        content: Content<'a>,
        period: Duration,
        cycles: u16,
        scrolling: bool,
    ) -> Self {
        Self {
            owner,
            content,
            period,
            cycles,
            scrolling,
        }
    }

    /// Create a one-shot descriptor for the priority queue
    pub fn transient(text: &str, hold: Duration, scrolling: bool) -> Self {
        Self {
            owner: OwnerId::DISPLAY,
            content: Content::Static(text_from(text)),
            period: hold,
            cycles: 1,
            scrolling,
        }
    }

    /// Blank placeholder shown when nothing else has text
    pub fn idle() -> Self {
        Self {
            owner: OwnerId::DISPLAY,
            content: Content::Static(Text::new()),
            period: IDLE_PERIOD,
            cycles: 1,
            scrolling: false,
        }
    }
}

/// Hold time of the idle placeholder
pub const IDLE_PERIOD: Duration = Duration::from_secs(1);
