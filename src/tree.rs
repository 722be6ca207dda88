//! Structural binomial trees
//!
//! A binomial tree of order k holds exactly 2ᵏ nodes. Its root has k children
//! of orders k-1, k-2, ..., 0, threaded leftmost-first through the `siblings`
//! link of each child.
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//!
//! Unlike a heap's binomial tree there is no ordering between parent and child
//! payloads. Linking always makes the second argument the new leftmost child of
//! the first, so the tree shape records insertion history and nothing else.
//!
//! **Memory Model**: Strong ownership flows from a root downward through
//! `children` and `siblings`. There are no parent links, so plain `Box` is
//! enough and no reference counting is needed.

use smallvec::SmallVec;

use crate::rank::{self, Rank, MAX_ORDER};

/// Type alias for an owned node
pub(crate) type NodeRef<T> = Box<Node<T>>;

/// Type alias for an optional owned node
pub(crate) type NodePtr<T> = Option<NodeRef<T>>;

/// Stack used for iterative walks; no chain is longer than `MAX_ORDER`
type WalkStack<N> = SmallVec<[N; MAX_ORDER as usize]>;

/// Internal node structure
///
/// The payload is kept apart from the structural [`Links`] so a detached node
/// can be destructured and its payload moved out.
pub(crate) struct Node<T> {
    pub(crate) item: T,
    pub(crate) links: Links<T>,
}

/// Structural header of a node
///
/// - `order`: a node of order k roots a subtree of 2ᵏ nodes
/// - `children`: first child (order k-1), None for order 0
/// - `siblings`: next entry in the parent's children chain, None for roots
pub(crate) struct Links<T> {
    pub(crate) order: Rank,
    pub(crate) children: NodePtr<T>,
    pub(crate) siblings: NodePtr<T>,
}

impl<T> Node<T> {
    /// Creates a detached order-0 node
    pub(crate) fn leaf(item: T) -> NodeRef<T> {
        Box::new(Node {
            item,
            links: Links {
                order: 0,
                children: None,
                siblings: None,
            },
        })
    }

    #[inline]
    pub(crate) fn order(&self) -> Rank {
        self.links.order
    }

    /// Consumes a childless, detached node and returns its payload
    pub(crate) fn into_item(self: Box<Self>) -> T {
        debug_assert!(self.links.children.is_none());
        debug_assert!(self.links.siblings.is_none());
        let Node { item, .. } = *self;
        item
    }
}

/// Merges two trees of equal order k into one tree of order k+1 by making `b`
/// the leftmost child of `a`
///
/// **Time Complexity**: O(1)
///
/// # Panics
///
/// Panics if the orders differ or `b` is not a root.
pub(crate) fn link<T>(mut a: NodeRef<T>, mut b: NodeRef<T>) -> NodeRef<T> {
    assert_eq!(
        a.links.order, b.links.order,
        "link requires trees of equal order"
    );
    assert!(b.links.siblings.is_none(), "link requires `b` to be a root");

    b.links.siblings = a.links.children.take();
    a.links.order = rank::checked_increment(a.links.order);
    a.links.children = Some(b);
    a
}

/// Splits a tree of order k > 0 into two trees of order k-1
///
/// Detaches and returns the leftmost child of `a`; `a` keeps the remaining
/// children. Returns None for an order-0 tree.
///
/// **Time Complexity**: O(1)
pub(crate) fn unlink<T>(a: &mut Node<T>) -> NodePtr<T> {
    if a.links.order == 0 {
        return None;
    }
    debug_assert!(a.links.siblings.is_none(), "unlink requires a root");

    let mut b = a.links.children.take()?;
    a.links.children = b.links.siblings.take();
    a.links.order -= 1;
    debug_assert_eq!(a.links.order, b.links.order);
    Some(b)
}

// Teardown walks an explicit stack so dropping a deep tree never recurses
// through nested Box drops.
impl<T> Drop for Links<T> {
    fn drop(&mut self) {
        let mut stack: WalkStack<NodeRef<T>> = SmallVec::new();
        stack.extend(self.children.take());
        stack.extend(self.siblings.take());

        while let Some(mut node) = stack.pop() {
            stack.extend(node.links.children.take());
            stack.extend(node.links.siblings.take());
        }
    }
}

/// A binomial tree detached from any forest
///
/// Returned by the steal operations and consumed by
/// [`BinomialForest::seed`](crate::BinomialForest::seed). The root of a
/// `BinomialTree` never has siblings.
///
/// # Example
///
/// ```rust
/// use binomial_forest::BinomialTree;
///
/// let tree = BinomialTree::new("task");
/// assert_eq!(tree.order(), 0);
/// assert_eq!(tree.len(), 1);
/// assert_eq!(tree.root(), &"task");
/// ```
pub struct BinomialTree<T> {
    root: NodeRef<T>,
}

impl<T> BinomialTree<T> {
    /// Creates a single-node tree of order 0.
    pub fn new(item: T) -> Self {
        BinomialTree {
            root: Node::leaf(item),
        }
    }

    pub(crate) fn from_root(root: NodeRef<T>) -> Self {
        debug_assert!(root.links.siblings.is_none());
        BinomialTree { root }
    }

    pub(crate) fn into_root(self) -> NodeRef<T> {
        self.root
    }

    /// Order of the tree; it holds `2^order` nodes.
    #[inline]
    pub fn order(&self) -> Rank {
        self.root.order()
    }

    /// Number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> u32 {
        rank::tree_size(self.order())
    }

    /// Always false: a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Payload of the root node.
    pub fn root(&self) -> &T {
        &self.root.item
    }

    /// Mutable payload of the root node.
    pub fn root_mut(&mut self) -> &mut T {
        &mut self.root.item
    }

    /// Iterates the payloads in preorder (root first, then each child
    /// subtree from the leftmost).
    pub fn iter(&self) -> Iter<'_, T> {
        let mut stack = SmallVec::new();
        stack.push(&*self.root);
        Iter {
            stack,
            include_siblings: false,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for BinomialTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinomialTree")
            .field("order", &self.order())
            .field("root", self.root())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a BinomialTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Preorder iterator over the payloads of a [`BinomialTree`]
pub struct Iter<'a, T> {
    stack: WalkStack<&'a Node<T>>,
    // The root's own sibling link is never followed
    include_siblings: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if self.include_siblings {
            if let Some(sibling) = node.links.siblings.as_deref() {
                self.stack.push(sibling);
            }
        }
        self.include_siblings = true;
        if let Some(child) = node.links.children.as_deref() {
            self.stack.push(child);
        }
        Some(&node.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(order: Rank, next: &mut u32) -> NodeRef<u32> {
        if order == 0 {
            let leaf = Node::leaf(*next);
            *next += 1;
            return leaf;
        }
        let older = build(order - 1, next);
        let newer = build(order - 1, next);
        link(newer, older)
    }

    fn chain_orders<T>(node: &Node<T>) -> Vec<Rank> {
        let mut orders = Vec::new();
        let mut current = node.links.children.as_deref();
        while let Some(child) = current {
            orders.push(child.order());
            current = child.links.siblings.as_deref();
        }
        orders
    }

    #[test]
    fn test_link_prepends_child() {
        let a = Node::leaf('a');
        let b = Node::leaf('b');
        let ab = link(a, b);

        assert_eq!(ab.order(), 1);
        assert_eq!(ab.item, 'a');
        let child = ab.links.children.as_deref().unwrap();
        assert_eq!(child.item, 'b');
        assert!(child.links.siblings.is_none());
    }

    #[test]
    fn test_children_have_descending_orders() {
        let mut next = 0;
        let tree = build(4, &mut next);
        assert_eq!(next, 16);
        assert_eq!(tree.order(), 4);
        assert_eq!(chain_orders(&tree), vec![3, 2, 1, 0]);
    }

    #[test]
    #[should_panic(expected = "equal order")]
    fn test_link_rejects_unequal_orders() {
        let a = link(Node::leaf(0), Node::leaf(1));
        let _ = link(a, Node::leaf(2));
    }

    #[test]
    fn test_unlink_is_inverse_of_link() {
        let mut next = 0;
        let mut tree = build(3, &mut next);
        let half = unlink(&mut tree).unwrap();

        assert_eq!(tree.order(), 2);
        assert_eq!(half.order(), 2);
        assert!(half.links.siblings.is_none());
        assert_eq!(chain_orders(&tree), vec![1, 0]);
        assert_eq!(chain_orders(&half), vec![1, 0]);

        let whole = link(tree, half);
        assert_eq!(whole.order(), 3);
        assert_eq!(chain_orders(&whole), vec![2, 1, 0]);
    }

    #[test]
    fn test_unlink_order_zero() {
        let mut leaf = Node::leaf(7);
        assert!(unlink(&mut leaf).is_none());
        assert_eq!(leaf.order(), 0);
        assert_eq!(leaf.into_item(), 7);
    }

    #[test]
    fn test_iter_visits_every_node() {
        let mut next = 0;
        let tree = BinomialTree::from_root(build(5, &mut next));
        let mut items: Vec<u32> = tree.iter().copied().collect();
        assert_eq!(items.len(), 32);
        assert_eq!(items[0], *tree.root());
        items.sort_unstable();
        assert_eq!(items, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn test_root_mut_and_borrowed_iteration() {
        let mut next = 0;
        let mut tree = BinomialTree::from_root(build(2, &mut next));
        *tree.root_mut() += 100;

        let mut seen = Vec::new();
        for item in &tree {
            seen.push(*item);
        }
        assert_eq!(seen[0], *tree.root());
        assert!(*tree.root() >= 100);
        seen.sort_unstable();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen.iter().filter(|&&v| v >= 100).count(), 1);
    }

    #[test]
    fn test_drop_large_tree_is_iterative() {
        let mut next = 0;
        let tree = BinomialTree::from_root(build(16, &mut next));
        assert_eq!(tree.len(), 1 << 16);
        drop(tree);
    }

    #[test]
    fn test_drop_releases_payloads() {
        use std::rc::Rc;

        fn build_shared(order: Rank, marker: &Rc<()>) -> NodeRef<Rc<()>> {
            if order == 0 {
                return Node::leaf(Rc::clone(marker));
            }
            link(build_shared(order - 1, marker), build_shared(order - 1, marker))
        }

        let marker = Rc::new(());
        let root = build_shared(3, &marker);
        assert_eq!(root.order(), 3);
        assert_eq!(Rc::strong_count(&marker), 9);
        drop(root);
        assert_eq!(Rc::strong_count(&marker), 1);
    }
}
