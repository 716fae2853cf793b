//! Queue randomization
//!
//! Uniform random permutation (Fisher-Yates) over queue items. The caller
//! decides what is eligible for shuffling; the current track is excluded
//! before this is invoked.

use crate::types::QueueItem;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Shuffle items in place with a uniform random permutation
pub fn shuffle_items(items: &mut [QueueItem]) {
    let mut rng = thread_rng();
    items.shuffle(&mut rng);
}
