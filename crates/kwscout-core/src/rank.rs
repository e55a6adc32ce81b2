//! Frequency ranking with a deterministic tie-break.
//!
//! Items with equal counts keep the order in which they were first seen,
//! so the same input always ranks the same way.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An item and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Ranked {
    /// Rendered token or n-gram.
    pub item: String,
    /// Number of occurrences (always at least 1).
    pub count: usize,
}

/// Multiset counter that remembers first appearance.
#[derive(Debug, Clone, Default)]
pub struct FrequencyRanker {
    /// Distinct items in first-appearance order.
    order: Vec<Ranked>,
    /// Item → index into `order`.
    index: HashMap<String, usize>,
    total: usize,
}

impl FrequencyRanker {
    /// Create an empty ranker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `item`.
    pub fn add(&mut self, item: impl Into<String>) {
        let item = item.into();
        self.total += 1;
        if let Some(&i) = self.index.get(&item) {
            self.order[i].count += 1;
        } else {
            self.index.insert(item.clone(), self.order.len());
            self.order.push(Ranked { item, count: 1 });
        }
    }

    /// Count every item of an iterator.
    pub fn extend<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in items {
            self.add(item);
        }
    }

    /// Occurrences of `item` so far.
    pub fn count(&self, item: &str) -> usize {
        self.index.get(item).map_or(0, |&i| self.order[i].count)
    }

    /// Total number of items added.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct items.
    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// The `k` most frequent items, most frequent first.
    ///
    /// Returns `min(k, distinct)` entries. Ties keep first-appearance order.
    pub fn top(&self, k: usize) -> Vec<Ranked> {
        let mut ranked = self.order.clone();
        // sort_by is stable, so equal counts stay in first-appearance order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(k);
        ranked
    }
}

/// Rank `items` and keep the top `k`.
pub fn rank_top_k<I, S>(items: I, k: usize) -> Vec<Ranked>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut ranker = FrequencyRanker::new();
    ranker.extend(items);
    ranker.top(k)
}
