//! A builder for constructing trees from a node count and an edge list.
//!

use tracing::{debug, debug_span};

use crate::{
    error::{Result, TreeError},
    IndexedTree, NodeId, Tree, DEFAULT_ROOT,
};

/// A builder for constructing trees.
///
/// Edges are checked against the node count as they are added. With
/// [`TreeBuilder::strict`] enabled, [`TreeBuilder::done`] also verifies that the
/// edges form a tree instead of leaving that to the first query that trips over it.
///
/// # Examples
///
/// ```
/// use sapling::TreeBuilder;
///
/// let mut tree = TreeBuilder::new(4)
///     .edges([(1, 2), (1, 3), (3, 4)])
///     .unwrap()
///     .strict(true)
///     .done()
///     .unwrap();
///
/// tree.add_value(3, 5).unwrap();
/// assert_eq!(tree.max(2, 4).unwrap(), 5);
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: usize,
    root: NodeId,
    edges: Vec<(NodeId, NodeId)>,
    strict: bool,
    debug_span: tracing::Span,
}

impl TreeBuilder {
    /// Creates a new `TreeBuilder` for a tree of `nodes` nodes rooted at node 1.
    pub fn new(nodes: usize) -> Self {
        let debug_span = debug_span!("TreeBuilder", nodes);
        debug_span.in_scope(|| debug!("Created new TreeBuilder"));

        Self {
            nodes,
            root: DEFAULT_ROOT,
            edges: Vec::new(),
            strict: false,
            debug_span,
        }
    }

    /// Set the node subtrees are defined relative to
    pub fn root(mut self, root: NodeId) -> Self {
        self.root = root;
        self
    }

    /// Verify the tree property when the tree is built
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Adds an undirected edge.
    ///
    /// # Arguments
    ///
    /// * `x`, `y`: The ids of the two nodes, each in `1..=nodes`.
    pub fn edge(mut self, x: NodeId, y: NodeId) -> Result<Self> {
        for id in [x, y] {
            if id == 0 || id > self.nodes {
                return Err(TreeError::InvalidNodeId {
                    id,
                    len: self.nodes,
                });
            }
        }

        self.edges.push((x, y));
        Ok(self)
    }

    /// Adds every edge from an iterator of id pairs
    pub fn edges(self, edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Result<Self> {
        edges
            .into_iter()
            .try_fold(self, |builder, (x, y)| builder.edge(x, y))
    }

    /// Returns the constructed tree when finished building it.
    pub fn done(self) -> Result<Tree> {
        let strict = self.strict;
        let debug_span = self.debug_span.clone();

        debug_span.in_scope(|| {
            if strict {
                // Indexing runs the full validation
                return self.index().map(IndexedTree::into_tree);
            }

            let tree = self.build()?;
            debug!("Finished building tree");
            Ok(tree)
        })
    }

    /// Returns the constructed tree validated and indexed
    pub fn index(self) -> Result<IndexedTree> {
        let debug_span = self.debug_span.clone();

        debug_span.in_scope(|| {
            let tree = self.build()?.index()?;
            debug!("Finished building indexed tree");
            Ok(tree)
        })
    }

    fn build(self) -> Result<Tree> {
        let mut tree = Tree::with_root(self.nodes, self.root)?;
        for (x, y) in self.edges {
            tree.add_edge(x, y)?;
        }
        Ok(tree)
    }
}
