use crate::{error::TreeError, NodeId, NodeIndex};

/// Convert a 1-based node identifier into a storage index, checking it against
/// the number of nodes in the tree.
pub(crate) fn checked_index(id: NodeId, len: usize) -> Result<NodeIndex, TreeError> {
    if len == 0 {
        return Err(TreeError::UninitializedTree);
    }

    if id == 0 || id > len {
        return Err(TreeError::InvalidNodeId { id, len });
    }

    Ok(id - 1)
}

/// Identifier of the node stored at `index`
#[inline]
pub(crate) fn id_of(index: NodeIndex) -> NodeId {
    index + 1
}
