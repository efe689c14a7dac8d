use std::{collections::VecDeque, ops::Deref};

use fixedbitset::FixedBitSet;
use tracing::{debug, debug_span};

use crate::{
    error::{Result, TreeError},
    id::{checked_index, id_of},
    iterator::SubtreeIter,
    tree::path_max,
    NodeDepth, NodeId, NodeIndex, Tree, Value,
};

/// A [`Tree`] whose topology has been validated, with the parent and depth of
/// every node relative to the root precomputed.
///
/// Queries give the same answers as on the plain [`Tree`]. Path discovery
/// climbs parent pointers instead of searching the whole tree, and subtree
/// updates don't need a path to the root at all.
#[derive(Debug, Clone)]
pub struct IndexedTree {
    tree: Tree,
    parent: Vec<Option<NodeIndex>>,
    depth: Vec<NodeDepth>,
}

impl IndexedTree {
    /// Validate that `tree` is connected with exactly `n - 1` edges and no self
    /// loops, then index it from its root.
    pub fn from_tree(tree: Tree) -> Result<Self> {
        debug_span!("index").in_scope(|| {
            let len = tree.len();
            if len == 0 {
                return Err(TreeError::UninitializedTree);
            }

            if tree.edge_count() != len - 1 {
                return Err(TreeError::EdgeCount {
                    nodes: len,
                    expected: len - 1,
                    found: tree.edge_count(),
                });
            }

            if let Some(node) = tree
                .nodes()
                .iter()
                .find(|node| node.neighbors().contains(&node.id()))
            {
                return Err(TreeError::SelfLoop { id: node.id() });
            }

            let root = tree.root() - 1;
            let mut parent = vec![None; len];
            let mut depth = vec![0; len];
            let mut visited = FixedBitSet::with_capacity(len);
            let mut queue = VecDeque::from([root]);
            visited.insert(root);

            while let Some(index) = queue.pop_front() {
                for neighbor in tree.nodes()[index].neighbors() {
                    let next = neighbor - 1;
                    if !visited.put(next) {
                        parent[next] = Some(index);
                        depth[next] = depth[index] + 1;
                        queue.push_back(next);
                    }
                }
            }

            if let Some(unreached) = (0..len).find(|&index| !visited.contains(index)) {
                return Err(TreeError::MalformedTopology {
                    from: tree.root(),
                    to: id_of(unreached),
                });
            }

            debug!(
                "Indexed {} nodes, max depth {}",
                len,
                depth.iter().max().copied().unwrap_or(0)
            );

            Ok(Self {
                tree,
                parent,
                depth,
            })
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Parent of `id` relative to the root. `None` for the root itself.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        let index = checked_index(id, self.tree.len())?;
        Ok(self.parent[index].map(id_of))
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> Result<NodeDepth> {
        let index = checked_index(id, self.tree.len())?;
        Ok(self.depth[index])
    }

    /// The path between `start` and `end`, both inclusive, ordered `end` first
    /// and `start` last.
    pub fn find_path(&self, start: NodeId, end: NodeId) -> Result<Vec<NodeId>> {
        let mut a = checked_index(start, self.tree.len())?;
        let mut b = checked_index(end, self.tree.len())?;

        // Climb from both ends until they meet at the lowest common ancestor
        let mut from_start = Vec::new();
        let mut from_end = Vec::new();

        while a != b {
            if self.depth[a] >= self.depth[b] {
                from_start.push(id_of(a));
                a = self.climb(a)?;
            } else {
                from_end.push(id_of(b));
                b = self.climb(b)?;
            }
        }

        from_end.push(id_of(a));
        from_end.extend(from_start.into_iter().rev());

        Ok(from_end)
    }

    fn climb(&self, index: NodeIndex) -> Result<NodeIndex> {
        // Only the root has no parent, and it has the minimum depth
        self.parent[index].ok_or(TreeError::MalformedTopology {
            from: id_of(index),
            to: self.tree.root(),
        })
    }

    /// Strict ancestors of `id`, parent first
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let index = checked_index(id, self.tree.len())?;

        Ok(
            std::iter::successors(self.parent[index], |&up| self.parent[up])
                .map(id_of)
                .collect(),
        )
    }

    /// Ids of the subtree rooted at `id` in pre-order, `id` first
    pub fn subtree(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let index = checked_index(id, self.tree.len())?;

        // In a validated tree the parent is the only way up
        let excluded = self.parent[index].map(id_of);

        Ok(SubtreeIter::new(self.tree.nodes(), index, excluded)
            .map(|node| node.id())
            .collect())
    }

    /// Add `delta` to every node in the subtree of `t`, `t` included.
    pub fn add_value(&mut self, t: NodeId, delta: Value) -> Result<()> {
        let subtree = self.subtree(t)?;
        debug!("Add {} to subtree of {} ({} nodes)", delta, t, subtree.len());
        self.tree.apply_delta(&subtree, delta)
    }

    /// Maximum value on the path between `a` and `b`, both inclusive
    pub fn max(&self, a: NodeId, b: NodeId) -> Result<Value> {
        let path = self.find_path(a, b)?;
        Ok(path_max(self.tree.nodes(), &path))
    }
}

impl Deref for IndexedTree {
    type Target = Tree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}
