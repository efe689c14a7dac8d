use crate::{error::Result, IndexedTree, NodeId, Tree, Value};

/// The query surface shared by [`Tree`] and [`IndexedTree`].
///
/// Both implementations give identical answers for the same input, they only
/// differ in how they find paths and subtrees.
pub trait PathQuery: std::fmt::Debug {
    /// Number of nodes
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn root(&self) -> NodeId;

    fn value(&self, id: NodeId) -> Result<Value>;

    /// The path between `start` and `end` ordered `end` first and `start` last
    fn find_path(&self, start: NodeId, end: NodeId) -> Result<Vec<NodeId>>;

    /// Add `delta` to every node in the subtree of `t`
    fn add_value(&mut self, t: NodeId, delta: Value) -> Result<()>;

    /// Maximum value on the path between `a` and `b`
    fn max(&self, a: NodeId, b: NodeId) -> Result<Value>;
}

impl PathQuery for Tree {
    fn len(&self) -> usize {
        Tree::len(self)
    }

    fn root(&self) -> NodeId {
        Tree::root(self)
    }

    fn value(&self, id: NodeId) -> Result<Value> {
        Tree::value(self, id)
    }

    fn find_path(&self, start: NodeId, end: NodeId) -> Result<Vec<NodeId>> {
        Tree::find_path(self, start, end)
    }

    fn add_value(&mut self, t: NodeId, delta: Value) -> Result<()> {
        Tree::add_value(self, t, delta)
    }

    fn max(&self, a: NodeId, b: NodeId) -> Result<Value> {
        Tree::max(self, a, b)
    }
}

impl PathQuery for IndexedTree {
    fn len(&self) -> usize {
        self.tree().len()
    }

    fn root(&self) -> NodeId {
        self.tree().root()
    }

    fn value(&self, id: NodeId) -> Result<Value> {
        self.tree().value(id)
    }

    fn find_path(&self, start: NodeId, end: NodeId) -> Result<Vec<NodeId>> {
        IndexedTree::find_path(self, start, end)
    }

    fn add_value(&mut self, t: NodeId, delta: Value) -> Result<()> {
        IndexedTree::add_value(self, t, delta)
    }

    fn max(&self, a: NodeId, b: NodeId) -> Result<Value> {
        IndexedTree::max(self, a, b)
    }
}
