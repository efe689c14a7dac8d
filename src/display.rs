use std::fmt::Write;

use colored::Colorize as _;

use crate::{IndexedTree, IterNode, Tree};

pub struct TreeDisplay;

impl TreeDisplay {
    /// Draw the tree from its root with one row per node, showing `id: value`
    pub fn format(tree: &Tree, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("\n")?;

        let rows: Vec<IterNode> = tree.iter().collect();
        let last = last_siblings(&rows);

        let mut root_children = false;

        // Whether the branch drawn at each depth continues below the current row
        let mut open: Vec<bool> = Vec::new();

        for (i, node) in rows.iter().enumerate() {
            let depth = node.depth();
            open.truncate(depth);

            if depth == 0 {
                let has_children = rows.get(i + 1).map_or(false, |next| next.depth() > 0);
                root_children = has_children;
                f.write_char(if has_children { '┏' } else { '━' })?;
            } else {
                // The root's branch runs to the closing row
                f.write_str("┃ ")?;
                for &continues in &open[1..] {
                    f.write_str(if continues { "┃ " } else { "  " })?;
                }

                f.write_char(if last[i] { '┗' } else { '┣' })?;
            }

            open.push(!last[i]);

            let value = tree.nodes()[node.id() - 1].value();
            write!(f, "{}: {}", node.id().to_string().bold(), value)?;

            f.write_char('\n')?;
        }

        // Finished node iteration
        if root_children {
            f.write_str("┗")?;
        }

        Ok(())
    }
}

/// For each pre-order row, whether no later sibling follows it
fn last_siblings(rows: &[IterNode]) -> Vec<bool> {
    let mut last = vec![true; rows.len()];

    // Depths at which a sibling has been seen further down, walking backwards
    let mut pending: Vec<bool> = Vec::new();

    for (i, node) in rows.iter().enumerate().rev() {
        let depth = node.depth();
        pending.resize(depth + 1, false);
        last[i] = !pending[depth];
        pending[depth] = true;
    }

    last
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TreeDisplay::format(self, f)
    }
}

impl std::fmt::Display for IndexedTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TreeDisplay::format(self.tree(), f)
    }
}
