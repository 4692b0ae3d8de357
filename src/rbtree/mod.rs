//! Red-black tree engine.
//!
//! Nodes live in one arena and address each other by [`NodeId`]. Index 0 is
//! the sentinel: it is always black, stands in for every absent child and
//! for the parent of the root, and is never part of the ordering. Deletion
//! temporarily points the sentinel's parent at the spliced node's parent so
//! the fix-up cases can walk upward from an absent child, the same trick the
//! classic sentinel-based formulation relies on.
//!
//! Every node carries a key and a payload `P`. Ordered sets use `()` as the
//! payload; ordered maps store their value there. The engine knows nothing
//! about keys beyond the [`Comparator`] it is built with.

mod cursor;
mod debug;

pub use cursor::{Cursor, Iter};

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::scalar::NaturalKey;

// =============================================================================
// Comparators
// =============================================================================

/// Total order over keys used by a tree.
///
/// Any `Fn(&K, &K) -> Ordering` closure is a comparator; state the closure
/// captures plays the role of comparator state.
pub trait Comparator<K> {
    /// Compare two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Default comparator: dispatches to [`NaturalKey::natural_cmp`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<K: NaturalKey> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.natural_cmp(b)
    }
}

// =============================================================================
// Node arena
// =============================================================================

/// Handle to a live node of one tree.
///
/// Handles stay valid until the node is deleted or the tree is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    const NIL: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// Red node
    Red,
    /// Black node (the sentinel is always black)
    Black,
}

#[derive(Clone, Copy, Debug)]
struct Links {
    color: Color,
    parent: NodeId,
    left: NodeId,
    right: NodeId,
}

impl Links {
    const DETACHED: Links = Links {
        color: Color::Black,
        parent: NodeId::NIL,
        left: NodeId::NIL,
        right: NodeId::NIL,
    };
}

#[derive(Clone)]
struct Node<K, P> {
    links: Links,
    /// `None` for the sentinel and for recycled slots.
    entry: Option<(K, P)>,
}

// =============================================================================
// RbTree
// =============================================================================

/// Red-black tree over keys `K` with a per-node payload `P`.
///
/// Operations are O(log n). There is no internal locking; mutation requires
/// `&mut self`, so a live [`Cursor`] or [`Iter`] rules out concurrent
/// mutation at compile time.
#[derive(Clone)]
pub struct RbTree<K, P, C> {
    nodes: Vec<Node<K, P>>,
    /// Recycled arena slots.
    free: Vec<NodeId>,
    root: NodeId,
    count: usize,
    cmp: C,
}

impl<K, P, C> RbTree<K, P, C> {
    /// Create an empty tree ordered by `cmp`.
    pub fn new(cmp: C) -> Self {
        Self {
            nodes: vec![Node {
                links: Links::DETACHED,
                entry: None,
            }],
            free: Vec::new(),
            root: NodeId::NIL,
            count: 0,
            cmp,
        }
    }

    /// Create an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize, cmp: C) -> Result<Self> {
        let mut tree = Self::new(cmp);
        tree.nodes
            .try_reserve_exact(capacity)
            .map_err(|_| Error::out_of_memory(capacity))?;
        Ok(tree)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The comparator this tree was built with.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Root node, if the tree is not empty.
    pub fn root(&self) -> Option<NodeId> {
        self.live(self.root)
    }

    /// Drop every node. Arena capacity is kept.
    pub fn clear(&mut self) {
        log::trace!("rbtree: clearing {} nodes", self.count);
        self.nodes.truncate(1);
        self.nodes[0].links = Links::DETACHED;
        self.free.clear();
        self.root = NodeId::NIL;
        self.count = 0;
    }

    // === Node access ===

    /// Key stored at `id`.
    ///
    /// # Panics
    /// Panics if `id` does not name a live node of this tree.
    pub fn key(&self, id: NodeId) -> &K {
        &self.entry(id).0
    }

    /// Payload stored at `id`.
    ///
    /// # Panics
    /// Panics if `id` does not name a live node of this tree.
    pub fn payload(&self, id: NodeId) -> &P {
        &self.entry(id).1
    }

    /// Mutable payload stored at `id`. The key cannot be changed in place.
    ///
    /// # Panics
    /// Panics if `id` does not name a live node of this tree.
    pub fn payload_mut(&mut self, id: NodeId) -> &mut P {
        match self.nodes.get_mut(id.index()).and_then(|n| n.entry.as_mut()) {
            Some((_, payload)) => payload,
            None => panic!("{id:?} is not a live node"),
        }
    }

    /// Color of the node at `id`.
    pub fn color(&self, id: NodeId) -> Color {
        self.link(id).color
    }

    #[inline]
    fn entry(&self, id: NodeId) -> &(K, P) {
        match self.nodes.get(id.index()).and_then(|n| n.entry.as_ref()) {
            Some(entry) => entry,
            None => panic!("{id:?} is not a live node"),
        }
    }

    #[inline]
    fn live(&self, id: NodeId) -> Option<NodeId> {
        (id != NodeId::NIL).then_some(id)
    }

    #[inline]
    fn link(&self, id: NodeId) -> &Links {
        &self.nodes[id.index()].links
    }

    #[inline]
    fn link_mut(&mut self, id: NodeId) -> &mut Links {
        &mut self.nodes[id.index()].links
    }

    #[inline]
    fn parent(&self, id: NodeId) -> NodeId {
        self.link(id).parent
    }

    #[inline]
    fn left(&self, id: NodeId) -> NodeId {
        self.link(id).left
    }

    #[inline]
    fn right(&self, id: NodeId) -> NodeId {
        self.link(id).right
    }

    #[inline]
    fn is_red(&self, id: NodeId) -> bool {
        self.link(id).color == Color::Red
    }

    #[inline]
    fn paint(&mut self, id: NodeId, color: Color) {
        debug_assert!(
            id != NodeId::NIL || color == Color::Black,
            "sentinel must stay black"
        );
        self.link_mut(id).color = color;
    }

    fn alloc(&mut self, key: K, payload: P) -> Result<NodeId> {
        let links = Links {
            color: Color::Red,
            ..Links::DETACHED
        };
        if let Some(id) = self.free.pop() {
            let node = &mut self.nodes[id.index()];
            node.links = links;
            node.entry = Some((key, payload));
            return Ok(id);
        }

        let idx = self.nodes.len();
        let id = u32::try_from(idx)
            .map(NodeId)
            .map_err(|_| Error::capacity_exhausted(idx))?;
        self.nodes
            .try_reserve(1)
            .map_err(|_| Error::out_of_memory(idx + 1))?;
        self.nodes.push(Node {
            links,
            entry: Some((key, payload)),
        });
        Ok(id)
    }

    /// Detach `id` from the arena and hand back its entry.
    fn release(&mut self, id: NodeId) -> (K, P) {
        let node = &mut self.nodes[id.index()];
        node.links = Links::DETACHED;
        let entry = node.entry.take().expect("released node must be live");
        self.free.push(id);
        entry
    }

    // === Ordered navigation ===

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        if id != NodeId::NIL {
            while self.left(id) != NodeId::NIL {
                id = self.left(id);
            }
        }
        id
    }

    fn rightmost(&self, mut id: NodeId) -> NodeId {
        if id != NodeId::NIL {
            while self.right(id) != NodeId::NIL {
                id = self.right(id);
            }
        }
        id
    }

    /// Smallest node.
    pub fn first(&self) -> Option<NodeId> {
        self.live(self.leftmost(self.root))
    }

    /// Largest node.
    pub fn last(&self) -> Option<NodeId> {
        self.live(self.rightmost(self.root))
    }

    fn successor_of(&self, mut id: NodeId) -> NodeId {
        if self.right(id) != NodeId::NIL {
            return self.leftmost(self.right(id));
        }
        while self.parent(id) != NodeId::NIL && self.right(self.parent(id)) == id {
            id = self.parent(id);
        }
        self.parent(id)
    }

    fn predecessor_of(&self, mut id: NodeId) -> NodeId {
        if self.left(id) != NodeId::NIL {
            return self.rightmost(self.left(id));
        }
        while self.parent(id) != NodeId::NIL && self.left(self.parent(id)) == id {
            id = self.parent(id);
        }
        self.parent(id)
    }

    /// In-order successor of `id`.
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        self.live(self.successor_of(id))
    }

    /// In-order predecessor of `id`.
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.live(self.predecessor_of(id))
    }

    /// Cursor positioned on the smallest node.
    pub fn cursor(&self) -> Cursor<'_, K, P, C> {
        Cursor::new(self)
    }

    pub fn iter(&self) -> Iter<'_, K, P, C> {
        Iter::new(self)
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn height(&self) -> usize {
        let mut max = 0usize;
        let mut stack: SmallVec<[(NodeId, usize); 64]> = SmallVec::new();
        if self.root != NodeId::NIL {
            stack.push((self.root, 1));
        }
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            for child in [self.left(id), self.right(id)] {
                if child != NodeId::NIL {
                    stack.push((child, depth + 1));
                }
            }
        }
        max
    }

    /// Black nodes on the leftmost root-to-sentinel path.
    pub fn black_height(&self) -> usize {
        let mut id = self.root;
        let mut blacks = 0;
        while id != NodeId::NIL {
            if !self.is_red(id) {
                blacks += 1;
            }
            id = self.left(id);
        }
        blacks
    }

    // === Rotations ===

    fn rotate_left(&mut self, p: NodeId) {
        let g = self.parent(p);
        let r = self.right(p);
        let inner = self.left(r);

        if g == NodeId::NIL {
            self.root = r;
        } else if self.left(g) == p {
            self.link_mut(g).left = r;
        } else {
            self.link_mut(g).right = r;
        }

        self.link_mut(r).parent = g;
        self.link_mut(p).parent = r;
        self.link_mut(r).left = p;
        self.link_mut(p).right = inner;
        if inner != NodeId::NIL {
            self.link_mut(inner).parent = p;
        }
    }

    fn rotate_right(&mut self, p: NodeId) {
        let g = self.parent(p);
        let l = self.left(p);
        let inner = self.right(l);

        if g == NodeId::NIL {
            self.root = l;
        } else if self.left(g) == p {
            self.link_mut(g).left = l;
        } else {
            self.link_mut(g).right = l;
        }

        self.link_mut(l).parent = g;
        self.link_mut(p).parent = l;
        self.link_mut(l).right = p;
        self.link_mut(p).left = inner;
        if inner != NodeId::NIL {
            self.link_mut(inner).parent = p;
        }
    }

    /// Rotations can move the root slot; walk up to the topmost live node.
    fn update_root(&mut self) {
        let mut id = self.root;
        if id == NodeId::NIL {
            return;
        }
        while self.parent(id) != NodeId::NIL {
            id = self.parent(id);
        }
        self.root = id;
    }

    /// Put `with` where `node` hangs. `with` may be the sentinel, whose
    /// parent is then set for the delete fix-up.
    fn transplant(&mut self, node: NodeId, with: NodeId) {
        let parent = self.parent(node);
        if parent == NodeId::NIL {
            self.root = with;
        } else if self.right(parent) == node {
            self.link_mut(parent).right = with;
        } else {
            self.link_mut(parent).left = with;
        }
        self.link_mut(with).parent = parent;
    }

    fn sibling(&self, id: NodeId) -> NodeId {
        let p = self.parent(id);
        if self.left(p) == id {
            self.right(p)
        } else {
            self.left(p)
        }
    }

    fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        debug_assert_ne!(a, b);
        let (lo, hi) = if a.index() < b.index() {
            (a.index(), b.index())
        } else {
            (b.index(), a.index())
        };
        let (head, tail) = self.nodes.split_at_mut(hi);
        std::mem::swap(&mut head[lo].entry, &mut tail[0].entry);
    }

    // === Insert fix-up ===

    fn insert_fixup(&mut self, mut n: NodeId) {
        loop {
            let p = self.parent(n);

            // Case 1: n is the root.
            if p == NodeId::NIL {
                self.paint(n, Color::Black);
                return;
            }

            // Case 2: black parent, nothing violated.
            if !self.is_red(p) {
                return;
            }

            // A red parent is never the root, so the grandparent exists.
            let g = self.parent(p);
            debug_assert_ne!(g, NodeId::NIL, "red node at the root");
            let u = if self.left(g) == p {
                self.right(g)
            } else {
                self.left(g)
            };

            // Case 3: red uncle. Push the red up and retry from the grandparent.
            if self.is_red(u) {
                self.paint(p, Color::Black);
                self.paint(u, Color::Black);
                self.paint(g, Color::Red);
                n = g;
                continue;
            }

            // Case 4: inner grandchild, rotate into the outer position.
            if n == self.right(p) && p == self.left(g) {
                self.rotate_left(p);
                n = self.left(n);
            } else if n == self.left(p) && p == self.right(g) {
                self.rotate_right(p);
                n = self.right(n);
            }

            // Case 5: outer grandchild.
            let p = self.parent(n);
            let g = self.parent(p);
            self.paint(p, Color::Black);
            self.paint(g, Color::Red);
            if n == self.left(p) {
                self.rotate_right(g);
            } else {
                self.rotate_left(g);
            }
            return;
        }
    }

    // === Delete fix-up ===

    /// `n` carries an extra black. `n` may be the sentinel.
    fn delete_fixup(&mut self, mut n: NodeId) {
        loop {
            // Case 1: the extra black reached the root.
            if self.parent(n) == NodeId::NIL {
                return;
            }

            // Case 2: red sibling, rotate so the sibling becomes black.
            let p = self.parent(n);
            let s = self.sibling(n);
            if self.is_red(s) {
                self.paint(p, Color::Red);
                self.paint(s, Color::Black);
                if n == self.left(p) {
                    self.rotate_left(p);
                } else {
                    self.rotate_right(p);
                }
            }

            let p = self.parent(n);
            let s = self.sibling(n);
            debug_assert_ne!(s, NodeId::NIL, "double-black node without sibling");
            let s_children_black = !self.is_red(self.left(s)) && !self.is_red(self.right(s));

            // Case 3: everything black, push the extra black up.
            if !self.is_red(p) && !self.is_red(s) && s_children_black {
                self.paint(s, Color::Red);
                n = p;
                continue;
            }

            // Case 4: red parent absorbs the extra black.
            if self.is_red(p) && !self.is_red(s) && s_children_black {
                self.paint(s, Color::Red);
                self.paint(p, Color::Black);
                return;
            }

            // Case 5: sibling's near child is red, rotate it outward.
            if !self.is_red(s) {
                if n == self.left(p) && !self.is_red(self.right(s)) && self.is_red(self.left(s)) {
                    self.paint(s, Color::Red);
                    let near = self.left(s);
                    self.paint(near, Color::Black);
                    self.rotate_right(s);
                } else if n == self.right(p)
                    && !self.is_red(self.left(s))
                    && self.is_red(self.right(s))
                {
                    self.paint(s, Color::Red);
                    let near = self.right(s);
                    self.paint(near, Color::Black);
                    self.rotate_left(s);
                }
            }

            // Case 6: sibling's far child is red; recolor and rotate the parent.
            let p = self.parent(n);
            let s = self.sibling(n);
            let parent_color = self.color(p);
            self.paint(s, parent_color);
            self.paint(p, Color::Black);
            if n == self.left(p) {
                let far = self.right(s);
                self.paint(far, Color::Black);
                self.rotate_left(p);
            } else {
                let far = self.left(s);
                self.paint(far, Color::Black);
                self.rotate_right(p);
            }
            return;
        }
    }
}

impl<K, P, C: Comparator<K>> RbTree<K, P, C> {
    /// Find the node holding a key equal to `key`.
    pub fn search(&self, key: &K) -> Option<NodeId> {
        let mut p = self.root;
        while p != NodeId::NIL {
            self.check_links(p);
            match self.cmp.compare(self.key(p), key) {
                Ordering::Greater => p = self.left(p),
                Ordering::Less => p = self.right(p),
                Ordering::Equal => return Some(p),
            }
        }
        None
    }

    /// Whether a key equal to `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Insert `key` with a default payload.
    ///
    /// Returns the node and whether it was created. An existing node is
    /// returned untouched; callers update its payload through
    /// [`RbTree::payload_mut`].
    pub fn insert(&mut self, key: K) -> Result<(NodeId, bool)>
    where
        P: Default,
    {
        self.insert_with(key, P::default)
    }

    /// Insert `key`, building the payload with `make` only if the key is new.
    pub fn insert_with<F: FnOnce() -> P>(&mut self, key: K, make: F) -> Result<(NodeId, bool)> {
        let (id, unused) = self.insert_impl(key, make)?;
        Ok((id, unused.is_none()))
    }

    /// Insert `key` with `payload`. If the key already exists the tree is
    /// unchanged and `payload` is handed back.
    pub fn insert_payload(&mut self, key: K, payload: P) -> Result<(NodeId, Option<P>)> {
        let (id, unused) = self.insert_impl(key, move || payload)?;
        Ok((id, unused.map(|make| make())))
    }

    /// Shared descent. Returns the constructor back when the key was found.
    fn insert_impl<F: FnOnce() -> P>(&mut self, key: K, make: F) -> Result<(NodeId, Option<F>)> {
        let mut parent = NodeId::NIL;
        let mut went_left = false;
        let mut n = self.root;
        while n != NodeId::NIL {
            parent = n;
            match self.cmp.compare(self.key(n), &key) {
                Ordering::Greater => {
                    went_left = true;
                    n = self.left(n);
                }
                Ordering::Less => {
                    went_left = false;
                    n = self.right(n);
                }
                Ordering::Equal => return Ok((n, Some(make))),
            }
        }

        let n = self.alloc(key, make())?;
        self.link_mut(n).parent = parent;
        if parent == NodeId::NIL {
            self.root = n;
        } else if went_left {
            self.link_mut(parent).left = n;
        } else {
            self.link_mut(parent).right = n;
        }
        self.count += 1;

        self.insert_fixup(n);
        self.update_root();
        Ok((n, None))
    }

    /// Remove the node holding `key`, returning its key and payload.
    ///
    /// A node with two children trades its entry with its in-order
    /// successor, and the successor's position is spliced out instead.
    pub fn delete(&mut self, key: &K) -> Option<(K, P)> {
        let n = self.search(key)?;

        let mut s = if self.right(n) != NodeId::NIL {
            self.leftmost(self.right(n))
        } else {
            self.rightmost(self.left(n))
        };
        if s != NodeId::NIL {
            self.swap_entries(n, s);
        } else {
            s = n;
        }

        // s has at most one child.
        let child = if self.right(s) == NodeId::NIL {
            self.left(s)
        } else {
            self.right(s)
        };
        self.transplant(s, child);

        if !self.is_red(s) {
            if self.is_red(child) {
                self.paint(child, Color::Black);
            } else {
                self.delete_fixup(child);
            }
        }
        self.link_mut(NodeId::NIL).parent = NodeId::NIL;
        self.count -= 1;

        Some(self.release(s))
    }

    #[inline]
    fn check_links(&self, id: NodeId) {
        debug_assert!(
            self.left(id) == NodeId::NIL || self.parent(self.left(id)) == id,
            "left child of {id:?} does not point back"
        );
        debug_assert!(
            self.right(id) == NodeId::NIL || self.parent(self.right(id)) == id,
            "right child of {id:?} does not point back"
        );
    }
}

impl<K: fmt::Debug, P: fmt::Debug, C> fmt::Debug for RbTree<K, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
