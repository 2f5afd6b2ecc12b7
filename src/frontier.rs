//! Deduplicating set of discovered article ids.

use crate::models::ArticleId;
use std::collections::HashSet;

/// Article ids found during discovery, each kept once in first-seen order.
///
/// The frontier only grows. Once discovery is finished it is consumed with
/// [`Frontier::into_pending`], which hands the ids to the extraction phase.
#[derive(Debug, Default)]
pub struct Frontier {
    seen: HashSet<ArticleId>,
    pending: Vec<ArticleId>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` unless it was seen before. Returns `true` if it was new.
    pub fn add_if_new(&mut self, id: ArticleId) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.pending.push(id);
        true
    }

    /// Add every id, returning how many were new.
    pub fn extend<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = ArticleId>,
    {
        ids.into_iter()
            .map(|id| self.add_if_new(id))
            .filter(|added| *added)
            .count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Freeze the frontier, yielding ids in discovery order.
    pub fn into_pending(self) -> Vec<ArticleId> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_if_new_true_exactly_once() {
        let mut frontier = Frontier::new();
        assert!(frontier.add_if_new("1".into()));
        assert!(!frontier.add_if_new("1".into()));
        assert!(frontier.add_if_new("2".into()));
        assert!(!frontier.add_if_new("1".into()));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_len_counts_distinct_ids() {
        let mut frontier = Frontier::new();
        let ids = ["5", "3", "5", "9", "3", "3", "1"];
        let added = ids
            .iter()
            .filter(|id| frontier.add_if_new(ArticleId::from(**id)))
            .count();
        assert_eq!(added, 4);
        assert_eq!(frontier.len(), 4);
    }

    #[test]
    fn test_extend_reports_new_ids_and_keeps_order() {
        let mut frontier = Frontier::new();
        assert_eq!(frontier.extend(["b", "a"].map(ArticleId::from)), 2);
        assert_eq!(frontier.extend(["a", "c", "b"].map(ArticleId::from)), 1);
        assert_eq!(
            frontier.into_pending(),
            ["b", "a", "c"].map(ArticleId::from).to_vec()
        );
    }

    #[test]
    fn test_empty() {
        let frontier = Frontier::new();
        assert!(frontier.is_empty());
        assert!(frontier.into_pending().is_empty());
    }
}
