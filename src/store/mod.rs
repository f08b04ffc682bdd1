//! Artifact store: ownership and timely release of encoded blobs.
//!
//! Every encoded output lives in the store behind an opaque, revocable
//! [`ArtifactHandle`]. Handles are released when a new conversion supersedes
//! them, when the batch is cleared, and when the session ends. Releasing is
//! centralized here so no handle can be forgotten on an error path.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Opaque, revocable reference to a blob of encoded bytes.
///
/// A handle is only useful together with the store that issued it. After the
/// store releases it, fetching through the handle fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactHandle(u64);

/// In-memory blob store with explicit release.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    blobs: Mutex<FxHashMap<u64, Arc<[u8]>>>,
    next_id: AtomicU64,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of encoded bytes and hand back a retrievable handle.
    pub fn issue(&self, bytes: Vec<u8>) -> ArtifactHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.blobs.lock().insert(id, Arc::from(bytes));
        ArtifactHandle(id)
    }

    /// Fetch the content behind a handle, or `None` if it was released.
    pub fn fetch(&self, handle: &ArtifactHandle) -> Option<Arc<[u8]>> {
        self.blobs.lock().get(&handle.0).cloned()
    }

    /// Release a single handle. Releasing an already-released handle is a no-op.
    pub fn release(&self, handle: ArtifactHandle) {
        self.blobs.lock().remove(&handle.0);
    }

    /// Release every handle the store has issued.
    pub fn release_all(&self) {
        self.blobs.lock().clear();
    }

    /// Number of live (retrievable) handles.
    pub fn live(&self) -> usize {
        self.blobs.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_fetch() {
        let store = ArtifactStore::new();
        let handle = store.issue(vec![1, 2, 3]);
        assert_eq!(store.fetch(&handle).unwrap().as_ref(), &[1, 2, 3]);
        assert_eq!(store.live(), 1);
    }

    #[test]
    fn test_fetch_after_release_fails() {
        let store = ArtifactStore::new();
        let handle = store.issue(vec![1, 2, 3]);
        let stale = handle.clone();
        store.release(handle);
        assert!(store.fetch(&stale).is_none());
        assert_eq!(store.live(), 0);
    }

    #[test]
    fn test_release_all() {
        let store = ArtifactStore::new();
        let handles: Vec<_> = (0..5).map(|i| store.issue(vec![i])).collect();
        assert_eq!(store.live(), 5);
        store.release_all();
        assert_eq!(store.live(), 0);
        for handle in &handles {
            assert!(store.fetch(handle).is_none());
        }
    }

    #[test]
    fn test_handles_are_unique() {
        let store = ArtifactStore::new();
        let a = store.issue(vec![1]);
        let b = store.issue(vec![1]);
        assert_ne!(a, b);
    }
}
