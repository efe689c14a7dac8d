use thiserror::Error;

use crate::{NodeId, Value};

/// Errors raised by tree construction, queries and the script driver.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("node id {id} is outside the range 1..={len}")]
    InvalidNodeId { id: NodeId, len: usize },

    #[error("tree has not been constructed")]
    UninitializedTree,

    #[error("a tree needs at least one node")]
    EmptyTree,

    #[error("can't allocate a tree of {nodes} nodes")]
    TooManyNodes { nodes: usize },

    #[error("no path from node {from} to node {to}, the edges do not form a tree")]
    MalformedTopology { from: NodeId, to: NodeId },

    #[error("a tree of {nodes} nodes needs {expected} edges, found {found}")]
    EdgeCount {
        nodes: usize,
        expected: usize,
        found: usize,
    },

    #[error("edge from node {id} to itself")]
    SelfLoop { id: NodeId },

    #[error("adding {delta} to node {id} overflows its value")]
    ValueOverflow { id: NodeId, delta: Value },

    #[error("unknown instruction `{0}`")]
    UnknownInstruction(String),

    #[error("parse error at token {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True for errors a batch of queries can continue past
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            TreeError::InvalidNodeId { .. }
                | TreeError::MalformedTopology { .. }
                | TreeError::ValueOverflow { .. }
        )
    }
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
