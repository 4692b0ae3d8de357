//! In-order traversal.

use std::iter::FusedIterator;

use super::{NodeId, RbTree};

/// Restartable in-order cursor over a tree.
///
/// The cursor borrows the tree, so the tree cannot be mutated while the
/// cursor is alive.
pub struct Cursor<'a, K, P, C> {
    tree: &'a RbTree<K, P, C>,
    at: NodeId,
}

impl<'a, K, P, C> Cursor<'a, K, P, C> {
    pub(super) fn new(tree: &'a RbTree<K, P, C>) -> Self {
        let mut cursor = Self {
            tree,
            at: NodeId::NIL,
        };
        cursor.reset();
        cursor
    }

    /// Move to the smallest node (or past the end if the tree is empty).
    pub fn reset(&mut self) {
        self.at = self.tree.leftmost(self.tree.root);
    }

    /// Whether the cursor is on a node.
    #[inline]
    pub fn valid(&self) -> bool {
        self.at != NodeId::NIL
    }

    /// Step to the in-order successor. A no-op past the end.
    pub fn next(&mut self) {
        if self.valid() {
            self.at = self.tree.successor_of(self.at);
        }
    }

    /// Node under the cursor.
    pub fn node(&self) -> Option<NodeId> {
        self.tree.live(self.at)
    }

    /// Key and payload under the cursor.
    pub fn current(&self) -> Option<(&'a K, &'a P)> {
        let tree = self.tree;
        self.node().map(|id| {
            let (k, p) = tree.entry(id);
            (k, p)
        })
    }
}

/// Double-ended in-order iterator over `(key, payload)` pairs.
pub struct Iter<'a, K, P, C> {
    tree: &'a RbTree<K, P, C>,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

impl<'a, K, P, C> Iter<'a, K, P, C> {
    pub(super) fn new(tree: &'a RbTree<K, P, C>) -> Self {
        Self {
            tree,
            front: tree.leftmost(tree.root),
            back: tree.rightmost(tree.root),
            remaining: tree.count,
        }
    }
}

impl<'a, K, P, C> Iterator for Iter<'a, K, P, C> {
    type Item = (&'a K, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front;
        self.front = self.tree.successor_of(id);
        self.remaining -= 1;
        let (k, p) = self.tree.entry(id);
        Some((k, p))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, P, C> DoubleEndedIterator for Iter<'a, K, P, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back;
        self.back = self.tree.predecessor_of(id);
        self.remaining -= 1;
        let (k, p) = self.tree.entry(id);
        Some((k, p))
    }
}

impl<K, P, C> ExactSizeIterator for Iter<'_, K, P, C> {}

impl<K, P, C> FusedIterator for Iter<'_, K, P, C> {}

impl<'a, K, P, C> IntoIterator for &'a RbTree<K, P, C> {
    type Item = (&'a K, &'a P);
    type IntoIter = Iter<'a, K, P, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::rbtree::{NaturalOrder, RbTree};

    fn tree() -> RbTree<i64, char, NaturalOrder> {
        let mut t = RbTree::new(NaturalOrder);
        for (k, c) in [(3, 'c'), (1, 'a'), (2, 'b'), (5, 'e'), (4, 'd')] {
            t.insert_with(k, || c).unwrap();
        }
        t
    }

    #[test]
    fn test_cursor_walks_in_order() {
        let t = tree();
        let mut cur = t.cursor();
        let mut seen = Vec::new();
        while cur.valid() {
            let (k, c) = cur.current().unwrap();
            seen.push((*k, *c));
            cur.next();
        }
        assert_eq!(seen, vec![(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd'), (5, 'e')]);
        assert!(cur.current().is_none());
        cur.next();
        assert!(!cur.valid());
    }

    #[test]
    fn test_cursor_reset_restarts() {
        let t = tree();
        let mut cur = t.cursor();
        cur.next();
        cur.next();
        assert_eq!(cur.current().map(|(k, _)| *k), Some(3));
        cur.reset();
        assert_eq!(cur.current().map(|(k, _)| *k), Some(1));
    }

    #[test]
    fn test_cursor_on_empty_tree() {
        let t: RbTree<i64, (), NaturalOrder> = RbTree::new(NaturalOrder);
        let cur = t.cursor();
        assert!(!cur.valid());
        assert!(cur.node().is_none());
    }

    #[test]
    fn test_iter_both_ends() {
        let t = tree();
        let rev: Vec<i64> = t.iter().rev().map(|(k, _)| *k).collect();
        assert_eq!(rev, vec![5, 4, 3, 2, 1]);

        let mut it = t.iter();
        assert_eq!(it.len(), 5);
        assert_eq!(it.next().map(|(k, _)| *k), Some(1));
        assert_eq!(it.next_back().map(|(k, _)| *k), Some(5));
        assert_eq!(it.next().map(|(k, _)| *k), Some(2));
        assert_eq!(it.next_back().map(|(k, _)| *k), Some(4));
        assert_eq!(it.next().map(|(k, _)| *k), Some(3));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn test_into_iter_for_ref() {
        let t = tree();
        let mut count = 0;
        for (_, _) in &t {
            count += 1;
        }
        assert_eq!(count, t.len());
    }
}
