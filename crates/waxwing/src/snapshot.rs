use std::sync::{Arc, PoisonError, RwLock};

use crate::taxonomy::TaxonomyTree;

/// A handle to the most recently published tree snapshot.
///
/// Rebuilds produce a whole new [`TaxonomyTree`] and swap it in atomically;
/// readers holding an earlier snapshot keep a consistent, if slightly
/// stale, view. That is the entire locking discipline: the tree itself is
/// never mutated, so there is no torn read to guard against.
#[derive(Default)]
pub struct TreeHandle {
    current: RwLock<Arc<TaxonomyTree>>,
}

impl TreeHandle {
    /// Returns a new [`TreeHandle`] holding the given tree.
    pub fn new(tree: TaxonomyTree) -> Self {
        Self {
            current: RwLock::new(Arc::new(tree)),
        }
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> Arc<TaxonomyTree> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publishes a new snapshot, replacing the current one for subsequent
    /// readers.
    pub fn publish(&self, tree: TaxonomyTree) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(tree);
    }
}
