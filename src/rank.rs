//! Order type shared by binomial trees and forests.
//!
//! # Why u8?
//!
//! The order of a binomial tree is the base-2 logarithm of its node count, and
//! the capacity exponent of a forest is bounded by [`MAX_ORDER`] so the total
//! node count fits in a `u32`. A `u8` covers that range with room to spare and
//! keeps the per-node link header small.

/// Type alias for tree orders and forest capacity exponents.
pub type Rank = u8;

/// Smallest capacity exponent a forest can be allocated with.
pub const MIN_ORDER: Rank = 1;

/// Largest capacity exponent a forest can be allocated with.
///
/// A forest of this order holds up to 2³² − 1 nodes, which is `u32::MAX`.
pub const MAX_ORDER: Rank = 32;

/// Safely increment an order, panicking past [`MAX_ORDER`].
///
/// # Panics
///
/// Panics if the result would exceed `MAX_ORDER`. No forest can hold a tree
/// that large, so this indicates a broken link precondition.
///
/// # Example
///
/// ```rust
/// use binomial_forest::rank::{checked_increment, Rank};
///
/// let order: Rank = 5;
/// assert_eq!(checked_increment(order), 6);
/// ```
#[inline]
pub fn checked_increment(order: Rank) -> Rank {
    assert!(
        order < MAX_ORDER,
        "order overflow: a binomial tree of order {} cannot grow inside any forest",
        order
    );
    order + 1
}

/// Number of nodes in a binomial tree of the given order (2^order).
///
/// `order` must be below [`MAX_ORDER`]; every tree that fits in a forest is.
#[inline]
pub fn tree_size(order: Rank) -> u32 {
    1u32 << order
}

/// Maximum number of nodes a forest with capacity exponent `order` can hold.
#[inline]
pub fn forest_capacity(order: Rank) -> u32 {
    ((1u64 << order) - 1) as u32
}
