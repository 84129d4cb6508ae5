//! Priority queue and regular rotation
//!
//! The priority queue is strict FIFO and each entry is shown once. The
//! regular list is visited round-robin in insertion order, skipping entries
//! whose content is currently empty.

use heapless::{Deque, Vec};

use super::{MessageDescriptor, MessageError, OwnerId};
use crate::traits::WallClock;

/// Capacity of the priority queue
pub const PRIORITY_QUEUE_LEN: usize = 8;

/// Capacity of the regular rotation
pub const MAX_REGULAR_MESSAGES: usize = 16;

/// Where a selected descriptor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectionSource {
    /// Popped from the priority queue
    Priority,
    /// Regular rotation slot
    Regular(usize),
    /// Nothing had text; idle placeholder
    Idle,
}

/// Result of choosing the next message
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub descriptor: MessageDescriptor<'a>,
    pub source: SelectionSource,
}

/// Both message collections plus the rotation cursor
#[derive(Debug)]
pub struct MessageQueues<'a> {
    /// Transient messages, oldest first
    priority: Deque<MessageDescriptor<'a>, PRIORITY_QUEUE_LEN>,
    /// Persistent messages in rotation order
    regular: Vec<MessageDescriptor<'a>, MAX_REGULAR_MESSAGES>,
    /// Slot the rotation tries next (taken modulo the list length)
    next: usize,
}

impl<'a> Default for MessageQueues<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MessageQueues<'a> {
    /// Create empty queues
    pub const fn new() -> Self {
        Self {
            priority: Deque::new(),
            regular: Vec::new(),
            next: 0,
        }
    }

    /// Append a transient descriptor to the priority queue
    pub fn push_priority(&mut self, descriptor: MessageDescriptor<'a>) -> Result<(), MessageError> {
        self.priority
            .push_back(descriptor)
            .map_err(|_| MessageError::PriorityQueueFull)
    }

    /// Append a persistent descriptor to the regular rotation
    pub fn add_regular(&mut self, descriptor: MessageDescriptor<'a>) -> Result<(), MessageError> {
        self.regular
            .push(descriptor)
            .map_err(|_| MessageError::RegularListFull)
    }

    /// Remove every regular descriptor registered by `owner`
    ///
    /// The remaining descriptors keep their relative order. Returns the
    /// number removed.
    pub fn remove_regular(&mut self, owner: OwnerId) -> usize {
        let before = self.regular.len();
        self.regular.retain(|d| d.owner != owner);
        before - self.regular.len()
    }

    /// Restart the rotation so the next regular selection is slot 0
    pub fn rewind(&mut self) {
        self.next = 0;
    }

    /// Number of pending priority messages
    pub fn priority_len(&self) -> usize {
        self.priority.len()
    }

    /// Regular descriptors in rotation order
    pub fn regular(&self) -> &[MessageDescriptor<'a>] {
        &self.regular
    }

    /// Choose the next descriptor to show
    ///
    /// Pending priority messages win, oldest first. Otherwise the rotation
    /// advances to the next slot whose content is non-empty, wrapping at the
    /// end of the list. At most one full lap is tried; if nothing has text
    /// the idle placeholder is returned and the cursor stays put.
    pub fn select(&mut self, clock: &dyn WallClock) -> Selection<'a> {
        if let Some(descriptor) = self.priority.pop_front() {
            return Selection {
                descriptor,
                source: SelectionSource::Priority,
            };
        }

        let len = self.regular.len();
        for step in 0..len {
            let slot = (self.next + step) % len;
            let descriptor = &self.regular[slot];
            if !descriptor.content.produce(clock).is_empty() {
                self.next = slot + 1;
                return Selection {
                    descriptor: descriptor.clone(),
                    source: SelectionSource::Regular(slot),
                };
            }
        }

        log_warn!("No regular message has text, showing idle");
        Selection {
            descriptor: MessageDescriptor::idle(),
            source: SelectionSource::Idle,
        }
    }
}
