//! Error types for forest operations
//!
//! [`ForestError`] names why an operation was refused. Operations that take
//! ownership of a payload or tree report failure with [`Rejected`], which hands
//! the value back so the caller never loses it.

use std::fmt;

use crate::forest::BinomialForest;
use crate::rank::Rank;
use crate::tree::BinomialTree;

/// Error type for forest operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForestError {
    /// The requested capacity exponent is outside `MIN_ORDER..=MAX_ORDER`
    InvalidCapacity {
        /// The exponent that was asked for
        requested: u32,
    },
    /// The slot array could not be allocated
    AllocationFailed {
        /// Number of slots that were requested
        slots: usize,
    },
    /// Every slot is occupied; no further node fits
    Full {
        /// Maximum node count of the forest
        capacity: u32,
    },
    /// A seed target must be empty
    NotEmpty {
        /// Nodes resident in the target forest
        len: u32,
    },
    /// A seed tree does not fit the target forest's slots
    TreeTooLarge {
        /// Order of the rejected tree
        order: Rank,
        /// Capacity exponent of the target forest
        capacity: Rank,
    },
}

impl fmt::Display for ForestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForestError::InvalidCapacity { requested } => {
                write!(f, "capacity exponent {} is out of range", requested)
            }
            ForestError::AllocationFailed { slots } => {
                write!(f, "failed to allocate {} forest slots", slots)
            }
            ForestError::Full { capacity } => {
                write!(f, "forest is full ({} nodes)", capacity)
            }
            ForestError::NotEmpty { len } => {
                write!(f, "forest must be empty to be seeded, holds {} nodes", len)
            }
            ForestError::TreeTooLarge { order, capacity } => write!(
                f,
                "tree of order {} does not fit a forest of order {}",
                order, capacity
            ),
        }
    }
}

impl std::error::Error for ForestError {}

/// A value refused by a forest, returned to the caller with the reason.
#[derive(Clone, PartialEq, Eq)]
pub struct Rejected<T> {
    /// The payload or tree that was not inserted
    pub value: T,
    /// Why it was refused
    pub error: ForestError,
}

impl<T> Rejected<T> {
    pub(crate) fn new(value: T, error: ForestError) -> Self {
        Rejected { value, error }
    }

    /// Recovers the refused value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

// Payloads need not be Debug
impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected: {}", self.error)
    }
}

impl<T: fmt::Debug> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A refused [`BinomialForest::seed`], handing back both the tree and the
/// forest it was meant for
pub struct SeedRejected<T> {
    /// The tree that was not installed
    pub tree: BinomialTree<T>,
    /// The supplied target forest, with its payloads untouched
    pub forest: Option<BinomialForest<T>>,
    /// Why it was refused
    pub error: ForestError,
}

impl<T> SeedRejected<T> {
    /// Recovers the refused tree, dropping any supplied forest.
    pub fn into_inner(self) -> BinomialTree<T> {
        self.tree
    }

    /// Recovers the refused tree together with the supplied forest.
    pub fn into_parts(self) -> (BinomialTree<T>, Option<BinomialForest<T>>) {
        (self.tree, self.forest)
    }
}

impl<T> fmt::Debug for SeedRejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedRejected")
            .field("order", &self.tree.order())
            .field("forest", &self.forest)
            .field("error", &self.error)
            .finish()
    }
}

impl<T> fmt::Display for SeedRejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seed rejected: {}", self.error)
    }
}

impl<T> std::error::Error for SeedRejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ForestError::Full { capacity: 31 }.to_string(),
            "forest is full (31 nodes)"
        );
        assert_eq!(
            ForestError::TreeTooLarge {
                order: 4,
                capacity: 3
            }
            .to_string(),
            "tree of order 4 does not fit a forest of order 3"
        );
        assert_eq!(
            ForestError::InvalidCapacity { requested: 33 }.to_string(),
            "capacity exponent 33 is out of range"
        );
    }

    #[test]
    fn test_rejected_returns_value() {
        let rejected = Rejected::new(String::from("task"), ForestError::NotEmpty { len: 2 });
        assert_eq!(rejected.to_string(), "rejected: forest must be empty to be seeded, holds 2 nodes");
        assert!(std::error::Error::source(&rejected).is_some());
        assert_eq!(rejected.into_inner(), "task");
    }

    #[test]
    fn test_seed_rejected_keeps_forest() {
        let mut forest = BinomialForest::alloc(3).unwrap();
        forest.push(1).unwrap();
        let rejected = SeedRejected {
            tree: BinomialTree::new(2),
            forest: Some(forest),
            error: ForestError::NotEmpty { len: 1 },
        };
        assert_eq!(rejected.to_string(), "seed rejected: forest must be empty to be seeded, holds 1 nodes");
        let rendered = format!("{:?}", rejected);
        assert!(rendered.contains("NotEmpty"), "{}", rendered);

        let (tree, forest) = rejected.into_parts();
        assert_eq!(tree.root(), &2);
        assert_eq!(forest.unwrap().free(Default::default()), vec![1]);
    }
}
