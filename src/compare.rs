use crate::{IndexedTree, Tree};

/// Tree Comparison
///
/// Two trees are equal when their roots, node values and neighbor lists match.

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root() && self.nodes() == other.nodes()
    }
}

impl Eq for Tree {}

impl PartialEq for IndexedTree {
    fn eq(&self, other: &Self) -> bool {
        self.tree() == other.tree()
    }
}

impl Eq for IndexedTree {}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use crate::{
        test::{random_tree, sample_tree},
        Tree,
    };

    #[traced_test]
    #[test]
    fn equal_trees() {
        let mut tree = random_tree(12, 4);
        assert_eq!(tree, random_tree(12, 4));

        tree.add_value(5, 1).unwrap();
        assert_ne!(tree, random_tree(12, 4));

        let mut a = sample_tree().index().unwrap();
        let b = sample_tree().index().unwrap();
        assert_eq!(a, b);

        a.add_value(2, 3).unwrap();
        assert_ne!(a, b);
    }

    #[traced_test]
    #[test]
    fn root_and_neighbor_order() {
        assert_ne!(
            Tree::with_root(3, 1).unwrap(),
            Tree::with_root(3, 2).unwrap()
        );

        let mut a = Tree::new(3).unwrap();
        a.add_edge(1, 2).unwrap();
        a.add_edge(1, 3).unwrap();

        let mut b = Tree::new(3).unwrap();
        b.add_edge(1, 3).unwrap();
        b.add_edge(1, 2).unwrap();

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
