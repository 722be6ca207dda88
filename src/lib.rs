//! Binomial Forests for Work-Stealing Queues
//!
//! This crate provides a forest of structural binomial trees that behaves as a
//! stack at one end and can be split off in large pieces at the other:
//!
//! - **Push**: O(1) amortized - binary increment with carry propagation
//! - **Pop**: O(log n) - strict LIFO over pushes
//! - **Steal**: O(log n) - removes a bounded fraction of the oldest elements
//!   from the high-order end, using one of three policies
//! - **Seed**: O(log n) - bootstraps a forest from one stolen tree
//!
//! A worker pushes and pops its own tasks at the front. A thief steals a whole
//! tree from the back, seeds it into its own forest and pops from there in the
//! same LIFO order. The forest itself is not synchronized; callers that share
//! one between threads wrap it in a lock of their choosing.
//!
//! # Example
//!
//! ```rust
//! use binomial_forest::BinomialForest;
//!
//! let mut local = BinomialForest::alloc(10).unwrap();
//! for task in 0..100 {
//!     local.push(task).unwrap();
//! }
//!
//! // A thief takes between a third and two thirds of the work
//! let stolen = local.steal_3().unwrap();
//! let mut remote = BinomialForest::seed(None, stolen).unwrap();
//! assert_eq!(remote.len() + local.len(), 100);
//!
//! // Both sides drain in LIFO order
//! assert_eq!(local.pop(), Some(99));
//! assert_eq!(remote.pop(), Some(63));
//! ```

pub mod error;
pub mod forest;
pub mod rank;
pub mod traits;
pub mod tree;

pub use error::{ForestError, Rejected, SeedRejected};
pub use forest::{BinomialForest, Drain, Teardown};
pub use traits::{Adaptive, Coarse, Fine, StealPolicy};
pub use tree::BinomialTree;
