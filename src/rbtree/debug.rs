//! Structural checks for troubleshooting.

use std::cmp::Ordering;

use super::{Color, Comparator, NodeId, RbTree};

impl<K, P, C: Comparator<K>> RbTree<K, P, C> {
    /// Verify tree integrity - returns list of issues found.
    ///
    /// Checks parent/child back-links, the sentinel and root colors, that no
    /// red node has a red child, that every root-to-sentinel path has the same
    /// black count, that keys are strictly increasing in order, and that the
    /// reachable node count matches [`RbTree::len`].
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.link(NodeId::NIL).color != Color::Black {
            issues.push("sentinel is not black".to_string());
        }
        if self.root != NodeId::NIL {
            if self.color(self.root) != Color::Black {
                issues.push(format!("root {:?} is red", self.root));
            }
            if self.parent(self.root) != NodeId::NIL {
                issues.push(format!("root {:?} has a parent", self.root));
            }
        }

        let mut reachable = 0usize;
        let mut expected_black: Option<usize> = None;
        // (node, black nodes strictly above it)
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        if self.root != NodeId::NIL {
            stack.push((self.root, 0));
        }
        while let Some((id, above)) = stack.pop() {
            reachable += 1;
            let blacks = above + usize::from(!self.is_red(id));

            if self.nodes[id.index()].entry.is_none() {
                issues.push(format!("{id:?} is reachable but not live"));
            }
            if self.is_red(id) && (self.is_red(self.left(id)) || self.is_red(self.right(id))) {
                issues.push(format!("red {id:?} has a red child"));
            }

            for child in [self.left(id), self.right(id)] {
                if child == NodeId::NIL {
                    match expected_black {
                        None => expected_black = Some(blacks),
                        Some(b) if b != blacks => issues.push(format!(
                            "black height {blacks} under {id:?} differs from {b}"
                        )),
                        Some(_) => {}
                    }
                } else {
                    if self.parent(child) != id {
                        issues.push(format!("{child:?} does not point back to parent {id:?}"));
                    }
                    stack.push((child, blacks));
                }
            }
        }

        if reachable != self.count {
            issues.push(format!(
                "{reachable} reachable nodes but len() = {}",
                self.count
            ));
        }

        let mut prev: Option<&K> = None;
        for (k, _) in self.iter() {
            if let Some(p) = prev {
                if self.cmp.compare(p, k) != Ordering::Less {
                    issues.push("in-order keys are not strictly increasing".to_string());
                    break;
                }
            }
            prev = Some(k);
        }

        issues
    }
}
