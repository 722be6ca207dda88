//! Binomial forest: a binary counter of binomial trees
//!
//! A forest of capacity exponent n has n slots. Slot i holds either nothing or
//! exactly one binomial tree of order i, so the set of occupied slots is the
//! binary expansion of the node count. The forest therefore holds at most
//! 2⁰ + 2¹ + ... + 2ⁿ⁻¹ = 2ⁿ − 1 nodes.
//!
//! **Key Operations**:
//! - **Push**: amortized O(1), worst O(n) - binary increment with carry
//! - **Pop**: O(n) worst - binary decrement; strict LIFO over pushes
//! - **Steal**: O(1) plus an O(n) scan - removes trees from the high-order end
//! - **Seed**: O(n) - installs one stolen tree into an empty forest
//!
//! The low-order end holds the most recently pushed nodes and the high-order
//! end the oldest, so an owner popping from the front and a thief stealing from
//! the back never compete for the same trees.
//!
//! **Concurrency**: nothing here is synchronized. A forest shared between an
//! owner and a thief must be wrapped in the caller's own lock.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::error::{ForestError, Rejected, SeedRejected};
use crate::rank::{self, Rank, MAX_ORDER, MIN_ORDER};
use crate::traits::{Adaptive, Coarse, Fine, StealPolicy};
use crate::tree::{self, BinomialTree, Node, NodePtr, NodeRef};

/// What to do with resident payloads when a forest is torn down with
/// [`BinomialForest::free`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Teardown {
    /// Hand every resident payload back to the caller. This is the default:
    /// the forest never destroys data it was only asked to arrange.
    #[default]
    Retain,
    /// Drop every resident payload along with the forest.
    Release,
}

/// Binomial forest
///
/// # Example
///
/// ```rust
/// use binomial_forest::BinomialForest;
///
/// let mut forest = BinomialForest::alloc(4).unwrap();
/// for task in 0..5 {
///     forest.push(task).unwrap();
/// }
/// assert_eq!(forest.representation(), 0b0101);
///
/// // The oldest tasks leave from the back...
/// let stolen = forest.steal_2().unwrap();
/// assert_eq!(stolen.len(), 4);
///
/// // ...while the newest stay at the front.
/// assert_eq!(forest.pop(), Some(4));
/// assert!(forest.is_empty());
/// ```
pub struct BinomialForest<T> {
    /// Slot i holds at most one tree, of order exactly i
    trees: Vec<NodePtr<T>>,
    /// Capacity exponent; `trees.len() == order`
    order: Rank,
    /// Running node count, equal to the sum of 2^i over occupied slots
    num_nodes: u32,
}

impl<T> BinomialForest<T> {
    /// Allocates an empty forest of capacity exponent `n`, able to hold up to
    /// 2ⁿ − 1 nodes
    ///
    /// # Errors
    ///
    /// - [`ForestError::InvalidCapacity`] if `n` is outside
    ///   [`MIN_ORDER`]`..=`[`MAX_ORDER`]
    /// - [`ForestError::AllocationFailed`] if the slot array cannot be
    ///   allocated
    pub fn alloc(n: u32) -> Result<Self, ForestError> {
        let order = Rank::try_from(n)
            .ok()
            .filter(|order| (MIN_ORDER..=MAX_ORDER).contains(order))
            .ok_or(ForestError::InvalidCapacity { requested: n })?;

        let slots = usize::from(order);
        let mut trees = Vec::new();
        if let Err(err) = trees.try_reserve_exact(slots) {
            warn!(slots, %err, "binomial forest allocation failed");
            return Err(ForestError::AllocationFailed { slots });
        }
        trees.resize_with(slots, || None);

        Ok(BinomialForest {
            trees,
            order,
            num_nodes: 0,
        })
    }

    /// Tears the forest down, walking every resident tree iteratively
    ///
    /// With [`Teardown::Retain`] the resident payloads are returned in pop
    /// order (newest first). With [`Teardown::Release`] they are dropped and
    /// the returned vector is empty.
    pub fn free(mut self, teardown: Teardown) -> Vec<T> {
        match teardown {
            Teardown::Retain => self.drain().collect(),
            Teardown::Release => {
                // Each tree's links drop iteratively
                self.trees.clear();
                self.num_nodes = 0;
                Vec::new()
            }
        }
    }

    /// Capacity exponent of the forest
    #[inline]
    pub fn order(&self) -> Rank {
        self.order
    }

    /// Maximum number of nodes the forest can hold (2^order − 1)
    #[inline]
    pub fn capacity(&self) -> u32 {
        rank::forest_capacity(self.order)
    }

    /// Number of resident nodes, read from the running counter
    #[inline]
    pub fn len(&self) -> u32 {
        self.num_nodes
    }

    /// Returns true if no slot is occupied
    pub fn is_empty(&self) -> bool {
        let empty = self.trees.iter().all(Option::is_none);
        debug_assert!(!empty || self.num_nodes == 0);
        empty
    }

    /// Returns true if every slot is occupied
    pub fn is_full(&self) -> bool {
        let full = self.trees.iter().all(Option::is_some);
        debug_assert!(!full || self.num_nodes == self.capacity());
        full
    }

    /// Recomputes the node count from slot occupancy
    ///
    /// Bit i of the result is set exactly when slot i holds a tree. The result
    /// always equals [`len`](Self::len); this is the O(order) cross-check of
    /// the running counter.
    pub fn representation(&self) -> u32 {
        let n = self
            .trees
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .fold(0u32, |n, (i, _)| n | (1u32 << i));
        debug_assert_eq!(n, self.num_nodes, "node counter out of sync with slots");
        n
    }

    /// Inserts a payload as a new single-node tree (push semantics)
    ///
    /// **Time Complexity**: O(1) amortized, O(order) worst-case
    ///
    /// **Algorithm**: binary increment. The new node is carried upward from
    /// slot 0; every occupied slot is linked under the carry (the carry stays
    /// root, since it is newer) and cleared, and the first empty slot receives
    /// the carry.
    ///
    /// # Errors
    ///
    /// Returns the payload with [`ForestError::Full`] if the forest is full;
    /// the forest is left untouched.
    pub fn push(&mut self, item: T) -> Result<(), Rejected<T>> {
        if self.num_nodes == self.capacity() {
            let capacity = self.capacity();
            return Err(Rejected::new(item, ForestError::Full { capacity }));
        }

        let mut carry = Node::leaf(item);
        for slot in self.trees.iter_mut() {
            match slot.take() {
                Some(occupant) => carry = tree::link(carry, occupant),
                None => {
                    *slot = Some(carry);
                    break;
                }
            }
        }

        self.num_nodes += 1;
        Ok(())
    }

    /// Removes and returns the most recently pushed payload (pop semantics)
    ///
    /// **Time Complexity**: O(order) worst-case
    ///
    /// **Algorithm**: binary decrement. The lowest occupied slot i is emptied;
    /// its root is returned and its children, of orders i-1, ..., 0, move into
    /// slots i-1, ..., 0, all of which were empty.
    pub fn pop(&mut self) -> Option<T> {
        let Some(index) = self.trees.iter().position(Option::is_some) else {
            debug_assert_eq!(self.num_nodes, 0);
            return None;
        };
        let mut root = self.trees[index].take()?;
        debug_assert_eq!(usize::from(root.order()), index);

        self.scatter_children(&mut root);
        self.num_nodes -= 1;
        Some(root.into_item())
    }

    /// Pops until the forest is empty, yielding payloads newest first
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { forest: self }
    }

    /// Moves the children of a detached root into their order slots
    fn scatter_children(&mut self, root: &mut Node<T>) {
        let mut children = root.links.children.take();
        let mut expected = root.order();
        while let Some(mut child) = children {
            expected -= 1;
            debug_assert_eq!(child.order(), expected);
            children = child.links.siblings.take();
            let slot = usize::from(child.order());
            debug_assert!(self.trees[slot].is_none());
            self.trees[slot] = Some(child);
        }
        debug_assert_eq!(expected, 0);
        root.links.order = 0;
    }

    /// Removes the tree in the highest occupied slot
    fn remove_highest(&mut self) -> NodePtr<T> {
        let tree = self.trees.iter_mut().rev().find_map(Option::take)?;
        debug_assert!(tree.links.siblings.is_none());
        self.num_nodes -= rank::tree_size(tree.order());
        Some(tree)
    }

    /// Splits the leftmost child off a removed tree, returns the reduced tree
    /// to the forest and hands back the child
    ///
    /// An order-0 tree has nothing to split off and is returned whole; that
    /// only happens when it was the last node in the forest.
    fn split_merge(&mut self, mut highest: NodeRef<T>) -> NodeRef<T> {
        let Some(half) = tree::unlink(&mut highest) else {
            debug_assert!(self.is_empty());
            return highest;
        };

        let slot = usize::from(highest.order());
        let merged = match self.trees[slot].take() {
            // The occupant was pushed later, so it stays root
            Some(occupant) => tree::link(occupant, highest),
            None => highest,
        };
        let target = usize::from(merged.order());
        debug_assert!(self.trees[target].is_none());
        self.trees[target] = Some(merged);

        self.num_nodes += rank::tree_size(half.order());
        half
    }

    /// Steals half of the highest-order tree, returning the other half to the
    /// forest
    ///
    /// Takes between ~1/4 and 1/2 of the resident nodes. A forest holding a
    /// single node gives that node up.
    pub fn steal_1(&mut self) -> Option<BinomialTree<T>> {
        let highest = self.remove_highest()?;
        let stolen = self.split_merge(highest);
        Some(self.hand_over(stolen, Fine::NAME))
    }

    /// Steals the complete highest-order tree
    ///
    /// Takes between ~1/2 and all of the resident nodes.
    pub fn steal_2(&mut self) -> Option<BinomialTree<T>> {
        let stolen = self.remove_highest()?;
        Some(self.hand_over(stolen, Coarse::NAME))
    }

    /// Steals either the complete highest-order tree or half of it, whichever
    /// keeps the stolen share between 1/3 and ~2/3 of the resident nodes
    ///
    /// With x = 2^k the size of the highest tree and r the remaining count,
    /// the whole tree is taken when r > x/2, giving x/(x+r) < 2/3, and half
    /// of it otherwise, giving (x/2)/(x+r) ≥ 1/3.
    pub fn steal_3(&mut self) -> Option<BinomialTree<T>> {
        let highest = self.remove_highest()?;
        let x = rank::tree_size(highest.order());
        let stolen = if self.num_nodes > x / 2 {
            highest
        } else {
            self.split_merge(highest)
        };
        Some(self.hand_over(stolen, Adaptive::NAME))
    }

    /// Steals with the policy chosen by the type parameter
    ///
    /// ```rust
    /// use binomial_forest::{BinomialForest, Fine};
    ///
    /// let mut forest = BinomialForest::alloc(4).unwrap();
    /// (0..8).for_each(|i| forest.push(i).unwrap());
    /// assert_eq!(forest.steal::<Fine>().map(|t| t.len()), Some(4));
    /// ```
    pub fn steal<P: StealPolicy>(&mut self) -> Option<BinomialTree<T>> {
        P::steal(self)
    }

    fn hand_over(&self, stolen: NodeRef<T>, policy: &'static str) -> BinomialTree<T> {
        trace!(
            policy,
            order = stolen.order(),
            remaining = self.num_nodes,
            "stole binomial tree"
        );
        BinomialTree::from_root(stolen)
    }

    /// Installs `tree` into a forest, allocating one if none is given
    ///
    /// With `None`, a forest of capacity exponent `tree.order() + 1` (just
    /// large enough for the tree) is allocated. A supplied forest is reused
    /// after [`seed_into`](Self::seed_into) checks it.
    ///
    /// # Errors
    ///
    /// Hands the tree back with [`ForestError::AllocationFailed`], or with the
    /// errors of [`seed_into`](Self::seed_into). A supplied forest that is
    /// refused comes back in [`SeedRejected::forest`] with its payloads.
    pub fn seed(forest: Option<Self>, tree: BinomialTree<T>) -> Result<Self, SeedRejected<T>> {
        let mut forest = match forest {
            Some(forest) => forest,
            None => {
                let n = u32::from(tree.order()) + 1;
                debug!(capacity = n, "allocating forest for seed tree");
                match Self::alloc(n) {
                    Ok(forest) => forest,
                    Err(error) => {
                        return Err(SeedRejected {
                            tree,
                            forest: None,
                            error,
                        })
                    }
                }
            }
        };
        match forest.seed_into(tree) {
            Ok(()) => Ok(forest),
            Err(Rejected { value, error }) => Err(SeedRejected {
                tree: value,
                forest: Some(forest),
                error,
            }),
        }
    }

    /// Installs `tree` into this forest, which must be empty
    ///
    /// # Errors
    ///
    /// Hands the tree back with [`ForestError::NotEmpty`] if the forest holds
    /// nodes, or [`ForestError::TreeTooLarge`] if its capacity exponent does
    /// not exceed the tree's order.
    pub fn seed_into(&mut self, tree: BinomialTree<T>) -> Result<(), Rejected<BinomialTree<T>>> {
        if !self.is_empty() {
            let len = self.num_nodes;
            return Err(Rejected::new(tree, ForestError::NotEmpty { len }));
        }
        if tree.order() >= self.order {
            let error = ForestError::TreeTooLarge {
                order: tree.order(),
                capacity: self.order,
            };
            return Err(Rejected::new(tree, error));
        }

        let order = tree.order();
        self.trees[usize::from(order)] = Some(tree.into_root());
        self.num_nodes = rank::tree_size(order);
        Ok(())
    }
}

impl<T> fmt::Debug for BinomialForest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Read occupancy directly so a stale counter shows up as a mismatch
        let slots: String = self
            .trees
            .iter()
            .rev()
            .map(|slot| if slot.is_some() { '1' } else { '0' })
            .collect();
        f.debug_struct("BinomialForest")
            .field("order", &self.order)
            .field("num_nodes", &self.num_nodes)
            .field("slots", &format_args!("{}", slots))
            .finish()
    }
}

/// Iterator returned by [`BinomialForest::drain`]
pub struct Drain<'a, T> {
    forest: &'a mut BinomialForest<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.forest.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.forest.len() as usize;
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}
