//! Candidate ordering for the next issue.

use crate::core::identifiers::IssueId;
use std::collections::HashSet;

/// Ordered issue ids returned by the tracker for the configured report.
///
/// Always an owned, reusable sequence: candidate building scans it once per
/// partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueQueue {
    ids: Vec<IssueId>,
}

impl IssueQueue {
    pub fn new(ids: Vec<IssueId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[IssueId] {
        &self.ids
    }

    pub fn contains(&self, id: IssueId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<IssueId>> for IssueQueue {
    fn from(ids: Vec<IssueId>) -> Self {
        Self::new(ids)
    }
}

impl FromIterator<IssueId> for IssueQueue {
    fn from_iter<I: IntoIterator<Item = IssueId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Order the queue for the next advance.
///
/// Ids already seen and the issue under discussion are dropped. The rest is
/// split into a primary partition (not deferred) followed by the deferred
/// tail. Tracker order is kept within each partition.
pub fn build_candidates(
    queue: &IssueQueue,
    seen: &HashSet<IssueId>,
    deferred: &HashSet<IssueId>,
    current: Option<IssueId>,
) -> Vec<IssueId> {
    let (mut primary, deferred_tail): (Vec<IssueId>, Vec<IssueId>) = queue
        .ids()
        .iter()
        .copied()
        .filter(|id| !seen.contains(id) && Some(*id) != current)
        .partition(|id| !deferred.contains(id));

    primary.extend(deferred_tail);
    primary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<IssueId> {
        raw.iter().copied().map(IssueId::new).collect()
    }

    fn set(raw: &[u64]) -> HashSet<IssueId> {
        ids(raw).into_iter().collect()
    }

    #[test]
    fn test_empty_sets_keep_tracker_order() {
        let queue = IssueQueue::new(ids(&[12, 10, 11]));
        let candidates = build_candidates(&queue, &set(&[]), &set(&[]), None);
        assert_eq!(candidates, ids(&[12, 10, 11]));
    }

    #[test]
    fn test_deferred_moved_to_tail_in_tracker_order() {
        let queue = IssueQueue::new(ids(&[1, 2, 3, 4, 5]));
        let candidates = build_candidates(&queue, &set(&[]), &set(&[4, 2]), None);
        assert_eq!(candidates, ids(&[1, 3, 5, 2, 4]));
    }

    #[test]
    fn test_seen_and_current_excluded() {
        let queue = IssueQueue::new(ids(&[1, 2, 3, 4]));
        let candidates = build_candidates(&queue, &set(&[1]), &set(&[3]), Some(IssueId::new(2)));
        assert_eq!(candidates, ids(&[4, 3]));
    }

    #[test]
    fn test_current_excluded_even_when_deferred() {
        let queue = IssueQueue::new(ids(&[10, 11]));
        let candidates =
            build_candidates(&queue, &set(&[]), &set(&[10]), Some(IssueId::new(10)));
        assert_eq!(candidates, ids(&[11]));
    }

    #[test]
    fn test_only_deferred_left() {
        let queue = IssueQueue::new(ids(&[7, 8, 9]));
        let candidates = build_candidates(&queue, &set(&[8]), &set(&[9, 7]), None);
        assert_eq!(candidates, ids(&[7, 9]));
    }

    #[test]
    fn test_everything_seen() {
        let queue = IssueQueue::new(ids(&[10, 11]));
        assert!(build_candidates(&queue, &set(&[10, 11]), &set(&[]), None).is_empty());
    }

    #[test]
    fn test_queue_contains() {
        let queue: IssueQueue = ids(&[3, 5]).into_iter().collect();
        assert!(queue.contains(IssueId::new(5)));
        assert!(!queue.contains(IssueId::new(4)));
        assert_eq!(queue.len(), 2);
    }
}
