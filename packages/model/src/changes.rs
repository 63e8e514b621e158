//! # Change Notifications
//!
//! Structured events describing committed mutations.
//!
//! Mutating project methods record changes into a pending buffer. Nothing is
//! delivered until [`Project::commit`](crate::Project::commit) runs, which
//! hands the whole batch to every subscriber. Callers commit once a compound
//! edit has finished, so subscribers never observe intermediate state such as
//! two elements marked selected at once.
//!
//! Mirroring state into another process is a subscriber concern; subscribers
//! are free to batch or debounce deliveries further.

use crate::ids::{ContentId, ElementId, PageId};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    ElementAdded(ElementId),
    ElementRemoved(ElementId),
    /// Name, property values or transient flags changed
    ElementChanged(ElementId),
    /// Element was attached to or detached from a content
    ElementMoved(ElementId),
    ContentAdded(ContentId),
    ContentRemoved(ContentId),
    /// Membership, order or transient flags changed
    ContentChanged(ContentId),
    PageAdded(PageId),
    PageRemoved(PageId),
    PageChanged(PageId),
    ActivePageChanged(Option<PageId>),
    SelectionChanged(Option<ElementId>),
    HighlightChanged(Option<ElementId>),
    FocusChanged,
}

/// Handle returned by [`Project::subscribe`](crate::Project::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Change])>;

/// Pending changes plus the subscribers they are delivered to
#[derive(Default)]
pub(crate) struct ChangeQueue {
    pending: Vec<Change>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl ChangeQueue {
    pub(crate) fn record(&mut self, change: Change) {
        // Consecutive duplicates carry no extra information
        if self.pending.last() != Some(&change) {
            self.pending.push(change);
        }
    }

    pub(crate) fn pending(&self) -> &[Change] {
        &self.pending
    }

    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Deliver and clear the pending batch, returning how many changes it held
    pub(crate) fn flush(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        let batch = std::mem::take(&mut self.pending);
        for (_, listener) in &mut self.listeners {
            listener(&batch);
        }
        batch.len()
    }
}

impl fmt::Debug for ChangeQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeQueue")
            .field("pending", &self.pending)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
