//! Playback queue
//!
//! A flat ordered list of [`QueueItem`]s with a current position. The
//! current index is `None` exactly when the queue is empty; otherwise it is
//! always a valid index. Shuffling pins the sounding track to the front and
//! keeps the pre-shuffle order around for exact restoration.

use crate::shuffle::shuffle_items;
use crate::types::QueueItem;

/// Ordered playback queue with a current position
#[derive(Debug, Clone)]
pub struct Queue {
    /// Items in play order
    items: Vec<QueueItem>,

    /// Index of the current track; `None` iff the queue is empty
    current_index: Option<usize>,

    /// Whether the queue is currently shuffled
    shuffled: bool,

    /// Order before shuffle was turned on (for restoring)
    original_order: Vec<QueueItem>,

    /// Maximum queue length; enqueues trim from the tail to stay under it
    max_len: usize,
}

impl Queue {
    /// Create a new empty queue
    pub fn new(max_len: usize) -> Self {
        Self {
            items: Vec::new(),
            current_index: None,
            shuffled: false,
            original_order: Vec::new(),
            max_len,
        }
    }

    /// Replace the queue wholesale
    ///
    /// Clears any shuffle state. The caller guarantees `start_index` is in
    /// bounds and `items` is non-empty.
    pub fn replace(&mut self, items: Vec<QueueItem>, start_index: usize) {
        self.items = items;
        self.current_index = Some(start_index);
        self.shuffled = false;
        self.original_order.clear();
    }

    /// Insert items immediately after the current track
    ///
    /// When the queue is empty the items land at the front and the first one
    /// becomes current (without starting playback). If the insert would
    /// exceed the length bound, items are trimmed from the tail of the queue
    /// to make room, favouring "what plays next" over long-tail items.
    pub fn insert_after_current(&mut self, new_items: Vec<QueueItem>) {
        if new_items.is_empty() {
            return;
        }

        let pos = self.current_index.map_or(0, |i| i + 1);
        let inserted = new_items.len();

        if self.shuffled {
            self.insert_into_original(&new_items);
        }

        self.items.splice(pos..pos, new_items);

        if self.current_index.is_none() {
            self.current_index = Some(0);
        }

        // Trim old tail items first; only once the tail is entirely made of
        // freshly inserted items may those be cut too.
        while self.items.len() > self.max_len {
            let last = self.items.len() - 1;
            if last >= pos + inserted {
                self.items.pop();
            } else {
                self.items.truncate(self.max_len.max(pos));
                break;
            }
        }
    }

    /// Mirror an insert into the saved original order
    ///
    /// Places the new items right after the current track's position there,
    /// so they keep their "plays soon" spot when shuffle is turned off.
    fn insert_into_original(&mut self, new_items: &[QueueItem]) {
        let anchor = self
            .current()
            .and_then(|cur| {
                self.original_order
                    .iter()
                    .position(|item| item.track.id == cur.track.id)
            })
            .map_or(self.original_order.len(), |i| i + 1);

        self.original_order
            .splice(anchor..anchor, new_items.iter().cloned());
    }

    /// Remove the item at `index`
    ///
    /// Keeps `current_index` pointing at the same logical track when an
    /// earlier item is removed. Removing the current item makes the
    /// following track current (clamped to the new tail); removing the last
    /// item empties the queue and clears the index.
    pub fn remove(&mut self, index: usize) -> Option<QueueItem> {
        if index >= self.items.len() {
            return None;
        }

        let removed = self.items.remove(index);

        if self.shuffled {
            if let Some(pos) = self
                .original_order
                .iter()
                .position(|item| item.track.id == removed.track.id)
            {
                self.original_order.remove(pos);
            }
        }

        self.current_index = match self.current_index {
            _ if self.items.is_empty() => None,
            Some(current) if index < current => Some(current - 1),
            Some(current) if index == current => Some(current.min(self.items.len() - 1)),
            other => other,
        };

        Some(removed)
    }

    /// Turn shuffle on
    ///
    /// Saves the current order verbatim, applies a uniform permutation to
    /// everything except the current track, and rebuilds the queue with the
    /// current track pinned at index 0. The sounding track never changes.
    pub fn shuffle_on(&mut self) {
        let Some(current) = self.current_index else {
            return;
        };
        if self.shuffled {
            return;
        }

        self.original_order = self.items.clone();

        let current_item = self.items.remove(current);
        shuffle_items(&mut self.items);
        self.items.insert(0, current_item);

        self.current_index = Some(0);
        self.shuffled = true;
    }

    /// Turn shuffle off
    ///
    /// Restores the saved order verbatim and relocates the current index to
    /// wherever the sounding track sits in it, falling back to index 0 when
    /// that track is gone.
    pub fn shuffle_off(&mut self) {
        if !self.shuffled {
            return;
        }

        let playing_id = self.current().map(|item| item.track.id.clone());

        self.items = std::mem::take(&mut self.original_order);
        self.shuffled = false;

        self.current_index = if self.items.is_empty() {
            None
        } else {
            let relocated = playing_id.and_then(|id| {
                self.items.iter().position(|item| item.track.id == id)
            });
            Some(relocated.unwrap_or(0))
        };
    }

    /// Move the current position
    ///
    /// Ignored when `index` is out of bounds.
    pub fn set_current(&mut self, index: usize) {
        if index < self.items.len() {
            self.current_index = Some(index);
        }
    }

    /// The current item, if any
    pub fn current(&self) -> Option<&QueueItem> {
        self.current_index.and_then(|i| self.items.get(i))
    }

    /// Index of the current item; `None` iff the queue is empty
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&QueueItem> {
        self.items.get(index)
    }

    /// All items in play order
    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    /// Number of items in the queue
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the queue is currently shuffled
    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }
}
