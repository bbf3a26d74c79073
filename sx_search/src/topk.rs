use std::cmp::Ordering;

use serde::Serialize;
use serde::Serializer;
use sx_types::Item;

/// Number of questions retained by a search run
pub const TOP_K: usize = 5;

/// Ranking kept by a search run
pub type TopQuestions = TopKSet<TOP_K>;

/// Bounded ranking of the `K` most viewed items seen so far
///
/// Items are ordered by `view_count` descending; items with equal view counts
/// are ordered by ascending `question_id` so the ranking is deterministic.
/// Storage is a fixed-capacity buffer, so the set can never hold more than
/// `K` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopKSet<const K: usize> {
    items: heapless::Vec<Item, K>,
}

/// Rank order: most viewed first, lower question id first on ties
#[inline]
pub fn rank_order(a: &Item, b: &Item) -> Ordering {
    b.view_count.cmp(&a.view_count).then_with(|| a.question_id.cmp(&b.question_id))
}

impl<const K: usize> TopKSet<K> {
    /// Create an empty set
    pub fn new() -> Self {
        Self { items: heapless::Vec::new() }
    }

    /// Merge newly filtered items into the ranking
    ///
    /// Candidates are the current set plus `new_items`; the best `K` of them
    /// (or all of them, if fewer) become the new set, in rank order.
    pub fn merge<I>(self, new_items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        if K == 0 {
            return self;
        }

        let mut candidates: Vec<Item> = self.items.into_iter().chain(new_items).collect();

        // Partition around the K-th best before sorting so a full page only costs O(n)
        if candidates.len() > K {
            candidates.select_nth_unstable_by(K - 1, rank_order);
            candidates.truncate(K);
        }
        candidates.sort_unstable_by(rank_order);
        debug_assert!(candidates.len() <= K);

        Self { items: candidates.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        K
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Item> {
        self.items.into_iter().collect()
    }
}

impl<const K: usize> Default for TopKSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes as a plain JSON array in rank order
impl<const K: usize> Serialize for TopKSet<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}
