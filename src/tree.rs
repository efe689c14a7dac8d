use colored::Colorize as _;
use tracing::debug;

use crate::{
    error::{Result, TreeError},
    id::checked_index,
    index::IndexedTree,
    iterator::{self, SubtreeIter},
    node::Node,
    NodeId, Value, DEFAULT_ROOT,
};

/// A fixed tree of `n` nodes with ids `1..=n`, each holding an integer value.
///
/// Subtrees are defined relative to the root, which is node 1 unless set with
/// [`Tree::with_root`]. `Tree` trusts the edge list it is given; a disconnected
/// edge list surfaces lazily as [`TreeError::MalformedTopology`] from the
/// queries that can't find a path. Use [`IndexedTree`] to validate eagerly.
///
/// `Tree` is not internally synchronized. Wrap it in a [`crate::SharedTree`]
/// to share it between threads.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    edges: usize,
}

impl Default for Tree {
    /// An empty tree. Every query on it fails with [`TreeError::UninitializedTree`].
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: DEFAULT_ROOT,
            edges: 0,
        }
    }
}

impl Tree {
    /// Create a tree of `n` nodes with values of 0 and no edges, rooted at node 1
    pub fn new(n: usize) -> Result<Self> {
        Self::with_root(n, DEFAULT_ROOT)
    }

    /// Create a tree of `n` nodes rooted at `root`
    pub fn with_root(n: usize, root: NodeId) -> Result<Self> {
        if n == 0 {
            return Err(TreeError::EmptyTree);
        }
        checked_index(root, n)?;

        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(n)
            .map_err(|_| TreeError::TooManyNodes { nodes: n })?;
        nodes.extend((1..=n).map(Node::new));

        debug!("Created tree with {} nodes rooted at {}", n, root);

        Ok(Self {
            nodes,
            root,
            edges: 0,
        })
    }

    /// Record an undirected edge between `x` and `y`
    pub fn add_edge(&mut self, x: NodeId, y: NodeId) -> Result<()> {
        let xi = checked_index(x, self.len())?;
        let yi = checked_index(y, self.len())?;

        self.nodes[xi].push_neighbor(y);
        self.nodes[yi].push_neighbor(x);
        self.edges += 1;

        Ok(())
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of edges added so far
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        Ok(&self.nodes[checked_index(id, self.len())?])
    }

    pub fn value(&self, id: NodeId) -> Result<Value> {
        self.node(id).map(Node::value)
    }

    /// Values of all nodes ordered by id
    pub fn values(&self) -> Vec<Value> {
        self.nodes.iter().map(Node::value).collect()
    }

    /// The path between `start` and `end`, both inclusive, ordered `end` first
    /// and `start` last.
    pub fn find_path(&self, start: NodeId, end: NodeId) -> Result<Vec<NodeId>> {
        checked_index(start, self.len())?;
        checked_index(end, self.len())?;

        iterator::find_path(&self.nodes, start, end).ok_or(TreeError::MalformedTopology {
            from: start,
            to: end,
        })
    }

    /// Strict ancestors of `id` relative to the root, parent first
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        // Root first, id last
        let mut path = self.find_path(id, self.root)?;
        path.pop();
        path.reverse();
        Ok(path)
    }

    /// Ids of the subtree rooted at `id` in pre-order, `id` first
    pub fn subtree(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let index = checked_index(id, self.len())?;
        let ancestors = self.ancestors(id)?;

        Ok(SubtreeIter::new(&self.nodes, index, ancestors)
            .map(|node| node.id())
            .collect())
    }

    /// Walk the whole tree in pre-order from the root
    pub fn iter(&self) -> SubtreeIter<'_> {
        if self.is_empty() {
            return SubtreeIter::empty(&self.nodes);
        }
        SubtreeIter::new(&self.nodes, self.root - 1, [])
    }

    /// Add `delta` to every node in the subtree of `t`, `t` included.
    ///
    /// The tree is left untouched if any error is returned.
    pub fn add_value(&mut self, t: NodeId, delta: Value) -> Result<()> {
        let subtree = self.subtree(t)?;
        debug!(
            "{} {} to subtree of {} ({} nodes)",
            "Add".green(),
            delta,
            t,
            subtree.len()
        );
        self.apply_delta(&subtree, delta)
    }

    /// Maximum value on the path between `a` and `b`, both inclusive
    pub fn max(&self, a: NodeId, b: NodeId) -> Result<Value> {
        let path = self.find_path(a, b)?;
        let max = path_max(&self.nodes, &path);
        debug!("{} {} {} = {}", "Max".cyan(), a, b, max);
        Ok(max)
    }

    /// Check every addition before writing any of them
    pub(crate) fn apply_delta(&mut self, ids: &[NodeId], delta: Value) -> Result<()> {
        let updated = ids
            .iter()
            .map(|&id| {
                self.nodes[id - 1]
                    .checked_value_add(delta)
                    .ok_or(TreeError::ValueOverflow { id, delta })
            })
            .collect::<Result<Vec<Value>>>()?;

        for (&id, value) in ids.iter().zip(updated) {
            self.nodes[id - 1].set_value(value);
        }

        Ok(())
    }

    /// Validate the tree property and precompute parent and depth tables
    pub fn index(self) -> Result<IndexedTree> {
        IndexedTree::from_tree(self)
    }
}

/// Maximum of the node values along a non-empty path, seeded from its last element
pub(crate) fn path_max(nodes: &[Node], path: &[NodeId]) -> Value {
    let (last, rest) = match path.split_last() {
        Some(split) => split,
        None => return Value::MIN,
    };

    rest.iter()
        .map(|&id| nodes[id - 1].value())
        .fold(nodes[last - 1].value(), Value::max)
}
