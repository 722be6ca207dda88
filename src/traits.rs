//! Steal policies
//!
//! The three steal operations of [`BinomialForest`] differ only in how much of
//! the forest they hand over. Each is also available as a zero-sized policy
//! type so schedulers can be written generically over the policy:
//!
//! | Policy       | Method      | Share of N resident nodes taken |
//! |--------------|-------------|---------------------------------|
//! | [`Fine`]     | `steal_1`   | ~N/4 ..= N/2                    |
//! | [`Coarse`]   | `steal_2`   | ~N/2 ..= N                      |
//! | [`Adaptive`] | `steal_3`   | N/3 ..= ~2N/3                   |
//!
//! A single-node forest always gives up its node, whatever the policy.

use crate::forest::BinomialForest;
use crate::tree::BinomialTree;

/// A rule for removing trees from the high-order end of a forest
///
/// # Example
///
/// ```rust
/// use binomial_forest::{Adaptive, BinomialForest, StealPolicy};
///
/// fn rebalance<P: StealPolicy>(victim: &mut BinomialForest<u32>) -> Option<BinomialForest<u32>> {
///     let tree = P::steal(victim)?;
///     BinomialForest::seed(None, tree).ok()
/// }
///
/// let mut victim = BinomialForest::alloc(8).unwrap();
/// (0..100).for_each(|i| victim.push(i).unwrap());
/// let thief = rebalance::<Adaptive>(&mut victim).unwrap();
/// assert_eq!(thief.len() + victim.len(), 100);
/// ```
pub trait StealPolicy {
    /// Short name used in trace events
    const NAME: &'static str;

    /// Removes a tree from the back of `forest`, or None if it is empty
    fn steal<T>(forest: &mut BinomialForest<T>) -> Option<BinomialTree<T>>;
}

/// Splits the highest tree in half and takes one half
#[derive(Debug, Clone, Copy, Default)]
pub struct Fine;

/// Takes the highest tree whole
#[derive(Debug, Clone, Copy, Default)]
pub struct Coarse;

/// Takes the highest tree whole or halved, bounding the share to a third..two thirds
#[derive(Debug, Clone, Copy, Default)]
pub struct Adaptive;

impl StealPolicy for Fine {
    const NAME: &'static str = "fine";

    fn steal<T>(forest: &mut BinomialForest<T>) -> Option<BinomialTree<T>> {
        forest.steal_1()
    }
}

impl StealPolicy for Coarse {
    const NAME: &'static str = "coarse";

    fn steal<T>(forest: &mut BinomialForest<T>) -> Option<BinomialTree<T>> {
        forest.steal_2()
    }
}

impl StealPolicy for Adaptive {
    const NAME: &'static str = "adaptive";

    fn steal<T>(forest: &mut BinomialForest<T>) -> Option<BinomialTree<T>> {
        forest.steal_3()
    }
}
