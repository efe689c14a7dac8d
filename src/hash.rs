use std::hash::Hasher as _;

use xxhash_rust::xxh64::Xxh64;

use crate::Tree;

impl Tree {
    /// Hash of the whole tree state: root, every node's value and neighbor list
    pub fn xxhash(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        hasher.write_u64(self.root() as u64);
        for node in self.nodes() {
            node.hash_into(&mut hasher);
        }
        hasher.finish()
    }

    /// Hash of the node values only, ignoring topology
    pub fn xxhash_values(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        for node in self.nodes() {
            hasher.write_i64(node.value());
        }
        hasher.finish()
    }
}
