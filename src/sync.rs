use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::debug;

use crate::{error::Result, query::PathQuery, NodeId, Value};

/// A tree shared between threads.
///
/// Queries take the read lock and may overlap each other. Updates take the
/// write lock, so a query never observes a half applied update. Clones share
/// the same tree.
#[derive(Debug)]
pub struct SharedTree<T>
where
    T: PathQuery,
{
    inner: Arc<RwLock<T>>,
}

impl<T> Clone for SharedTree<T>
where
    T: PathQuery,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> SharedTree<T>
where
    T: PathQuery,
{
    pub fn new(tree: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Hold the read lock for a sequence of queries against one consistent state
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    pub fn value(&self, id: NodeId) -> Result<Value> {
        self.inner.read().value(id)
    }

    pub fn find_path(&self, start: NodeId, end: NodeId) -> Result<Vec<NodeId>> {
        self.inner.read().find_path(start, end)
    }

    pub fn max(&self, a: NodeId, b: NodeId) -> Result<Value> {
        self.inner.read().max(a, b)
    }

    pub fn add_value(&self, t: NodeId, delta: Value) -> Result<()> {
        let mut tree = self.inner.write();
        debug!("Write lock taken for add {} to {}", delta, t);
        tree.add_value(t, delta)
    }

    /// Take the tree back out if this is the last handle to it
    pub fn try_unwrap(self) -> std::result::Result<T, Self> {
        Arc::try_unwrap(self.inner)
            .map(|lock| lock.into_inner())
            .map_err(|inner| Self { inner })
    }
}
