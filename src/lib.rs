//! # Sapling
//!
//! Subtree updates and path maximum queries over a fixed tree.
//!
//! ## Overview
//!
//! A [`Tree`] holds `n` nodes with ids `1..=n`, each carrying an integer value
//! that starts at 0. Once the edges are in place two operations run against it:
//!
//! * [`Tree::add_value`] adds a delta to every node in the subtree of a node,
//!   where subtrees are defined relative to the tree's root (node 1 by default).
//! * [`Tree::max`] returns the largest value on the path between two nodes.
//!
//! [`IndexedTree`] answers the same queries after validating the topology and
//! precomputing parent and depth tables. [`SharedTree`] puts either behind a
//! read/write lock, and the [`script`] module runs batches of instructions.
//!
//! ```
//! use sapling::Tree;
//!
//! let mut tree = Tree::new(4)?;
//! tree.add_edge(1, 2)?;
//! tree.add_edge(1, 3)?;
//! tree.add_edge(3, 4)?;
//!
//! tree.add_value(3, 5)?;
//! assert_eq!(tree.values(), vec![0, 0, 5, 5]);
//! assert_eq!(tree.max(2, 4)?, 5);
//! # Ok::<(), sapling::TreeError>(())
//! ```

mod builder;
mod compare;
mod display;
mod error;
mod hash;
mod id;
mod index;
mod iterator;
mod query;
mod sync;
mod tree;

pub mod node;
pub mod script;


pub use builder::TreeBuilder;
pub use display::TreeDisplay;
pub use error::{Result, TreeError};
pub use index::IndexedTree;
pub use iterator::{IterNode, SubtreeIter};
pub use node::Node;
pub use query::PathQuery;
pub use sync::SharedTree;
pub use tree::Tree;

pub type NodeId = usize;
pub type NodeIndex = usize;
pub type NodeDepth = usize;
pub type Value = i64;

/// Root used when none is configured
pub const DEFAULT_ROOT: NodeId = 1;
