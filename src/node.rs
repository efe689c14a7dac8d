use std::hash::Hasher;

use xxhash_rust::xxh64::Xxh64;

use crate::{NodeId, Value};

/// A vertex of the tree.
///
/// The neighbor list keeps insertion order, which also fixes the order in which
/// traversals visit children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    value: Value,
    neighbors: Vec<NodeId>,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            value: 0,
            neighbors: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Return the number of neighbors of this node
    pub fn num_neighbors(&self) -> usize {
        self.neighbors.len()
    }

    pub(crate) fn push_neighbor(&mut self, id: NodeId) {
        self.neighbors.push(id);
    }

    pub(crate) fn checked_value_add(&self, delta: Value) -> Option<Value> {
        self.value.checked_add(delta)
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Feed the id, value and neighbor list into the hasher
    pub(crate) fn hash_into(&self, hasher: &mut Xxh64) {
        hasher.write_u64(self.id as u64);
        hasher.write_i64(self.value);
        hasher.write_u64(self.neighbors.len() as u64);
        for neighbor in &self.neighbors {
            hasher.write_u64(*neighbor as u64);
        }
    }

    pub fn xxhash(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        self.hash_into(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Node;

    #[test]
    fn neighbors_keep_insertion_order() {
        let mut node = Node::new(3);
        node.push_neighbor(7);
        node.push_neighbor(1);
        node.push_neighbor(4);

        assert_eq!(node.id(), 3);
        assert_eq!(node.value(), 0);
        assert_eq!(node.neighbors(), &[7, 1, 4]);
        assert_eq!(node.num_neighbors(), 3);
    }

    #[test]
    fn hash_tracks_value() {
        let mut node = Node::new(1);
        let before = node.xxhash();

        node.set_value(10);
        assert_ne!(before, node.xxhash());

        node.set_value(0);
        assert_eq!(before, node.xxhash());
    }

    #[test]
    fn checked_add() {
        let mut node = Node::new(1);
        node.set_value(i64::MAX);
        assert_eq!(node.checked_value_add(1), None);
        assert_eq!(node.checked_value_add(-1), Some(i64::MAX - 1));
    }
}
