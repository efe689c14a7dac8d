//! Iterative traversals over the node storage of a tree.
//!
//! Nothing here recurses, so chain shaped trees of any depth are safe to walk.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use tracing::trace;

use crate::{
    id::{checked_index, id_of},
    node::Node,
    NodeDepth, NodeId, NodeIndex,
};

/// A node yielded by a [`SubtreeIter`], with its depth relative to the start node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterNode {
    id: NodeId,
    depth: NodeDepth,
}

impl IterNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn depth(&self) -> NodeDepth {
        self.depth
    }
}

/// Pre-order depth first walk from a start node that never enters a node in
/// the exclusion set.
///
/// Excluding the strict ancestors of the start node (relative to the root)
/// makes this a walk over the subtree of the start node.
pub struct SubtreeIter<'iter> {
    nodes: &'iter [Node],
    visited: FixedBitSet,
    excluded: FixedBitSet,
    stack: VecDeque<(NodeDepth, NodeIndex)>,
}

impl<'iter> SubtreeIter<'iter> {
    /// `start` and every id in `excluded` must already be validated against `nodes`
    pub(crate) fn new(
        nodes: &'iter [Node],
        start: NodeIndex,
        excluded: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        let mut excluded_set = FixedBitSet::with_capacity(nodes.len());
        for id in excluded {
            excluded_set.insert(id - 1);
        }

        Self {
            nodes,
            visited: FixedBitSet::with_capacity(nodes.len()),
            excluded: excluded_set,
            stack: VecDeque::from([(0, start)]),
        }
    }

    /// An iterator that yields nothing
    pub(crate) fn empty(nodes: &'iter [Node]) -> Self {
        Self {
            nodes,
            visited: FixedBitSet::new(),
            excluded: FixedBitSet::new(),
            stack: VecDeque::new(),
        }
    }
}

impl<'iter> Iterator for SubtreeIter<'iter> {
    type Item = IterNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((depth, index)) = self.stack.pop_front() {
            // A malformed edge list can reach the same node twice
            if self.visited.put(index) {
                continue;
            }

            // Push neighbors in reverse so the first neighbor is visited next
            for neighbor in self.nodes[index].neighbors().iter().rev() {
                let next = neighbor - 1;
                if !self.visited.contains(next) && !self.excluded.contains(next) {
                    self.stack.push_front((depth + 1, next));
                }
            }

            trace!("Visit node {} at depth {}", id_of(index), depth);

            return Some(IterNode {
                id: id_of(index),
                depth,
            });
        }

        None
    }
}

/// Breadth first search from `start` recording a parent pointer per visited node.
///
/// Returns the path between the two nodes ordered `end` first and `start` last,
/// or `None` if `end` can not be reached.
pub(crate) fn find_path(nodes: &[Node], start: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
    let start = checked_index(start, nodes.len()).ok()?;
    let end = checked_index(end, nodes.len()).ok()?;

    let mut parent: Vec<Option<NodeIndex>> = vec![None; nodes.len()];
    let mut visited = FixedBitSet::with_capacity(nodes.len());
    let mut queue = VecDeque::from([start]);
    visited.insert(start);

    while let Some(index) = queue.pop_front() {
        if index == end {
            break;
        }

        for neighbor in nodes[index].neighbors() {
            let next = neighbor - 1;
            if !visited.put(next) {
                parent[next] = Some(index);
                queue.push_back(next);
            }
        }
    }

    if !visited.contains(end) {
        trace!("Node {} unreachable from {}", id_of(end), id_of(start));
        return None;
    }

    // Walk the parent pointers from end back to start
    let mut path = vec![id_of(end)];
    let mut current = end;
    while let Some(up) = parent[current] {
        path.push(id_of(up));
        current = up;
    }

    Some(path)
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use crate::test::{chain, sample_tree};

    use super::*;

    #[traced_test]
    #[test]
    fn path_order() {
        let tree = sample_tree();

        assert_eq!(find_path(tree.nodes(), 4, 1).unwrap(), vec![1, 3, 4]);
        assert_eq!(find_path(tree.nodes(), 1, 4).unwrap(), vec![4, 3, 1]);
        assert_eq!(find_path(tree.nodes(), 2, 4).unwrap(), vec![4, 3, 1, 2]);
        assert_eq!(find_path(tree.nodes(), 3, 3).unwrap(), vec![3]);
    }

    #[traced_test]
    #[test]
    fn path_unreachable() {
        let mut tree = crate::Tree::new(3).unwrap();
        tree.add_edge(1, 2).unwrap();

        assert!(find_path(tree.nodes(), 1, 3).is_none());
        assert!(find_path(tree.nodes(), 1, 9).is_none());
    }

    #[test]
    fn deep_chain() {
        let tree = chain(200_000);

        let path = find_path(tree.nodes(), 1, 200_000).unwrap();
        assert_eq!(path.len(), 200_000);
        assert_eq!(path.first(), Some(&200_000));
        assert_eq!(path.last(), Some(&1));

        let walked = SubtreeIter::new(tree.nodes(), 0, []).count();
        assert_eq!(walked, 200_000);
    }

    #[traced_test]
    #[test]
    fn subtree_walk() {
        let tree = sample_tree();

        let all: Vec<(NodeId, NodeDepth)> = SubtreeIter::new(tree.nodes(), 0, [])
            .map(|node| (node.id(), node.depth()))
            .collect();
        assert_eq!(all, vec![(1, 0), (2, 1), (3, 1), (4, 2)]);

        // Excluding the parent of 3 confines the walk below 3
        let below: Vec<NodeId> = SubtreeIter::new(tree.nodes(), 2, [1])
            .map(|node| node.id())
            .collect();
        assert_eq!(below, vec![3, 4]);
    }
}
