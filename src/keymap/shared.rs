//! Atomic publication of a registry for concurrent readers
//!
//! Readers load one `Arc<Registry>` snapshot and never see a half-applied
//! change. Writers build a modified copy and swap it in with a single store.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::error::Result;
use super::registry::Registry;

pub struct SharedRegistry<E> {
    snap: ArcSwap<Registry<E>>,
}

impl<E> SharedRegistry<E> {
    pub fn new(registry: Registry<E>) -> Self {
        Self {
            snap: ArcSwap::from_pointee(registry),
        }
    }

    /// Consistent snapshot of the current registry
    #[inline]
    pub fn load(&self) -> Arc<Registry<E>> {
        self.snap.load_full()
    }

    /// Publish a new registry unconditionally; in-flight readers keep their old snapshot
    ///
    /// Discards any change committed since the caller's last `load`. Writers
    /// that derive `registry` from a snapshot should use [`Self::publish`].
    pub fn store(&self, registry: Registry<E>) {
        self.snap.store(Arc::new(registry));
    }

    /// Publish `next` only if the live registry is still `current`
    ///
    /// Returns false when another writer got there first; the caller restages
    /// from a fresh snapshot.
    pub fn publish(&self, current: &Arc<Registry<E>>, next: Registry<E>) -> bool {
        let prev = self.snap.compare_and_swap(current, Arc::new(next));
        Arc::ptr_eq(&prev, current)
    }

    /// Copy-on-write update: apply `f` to a staging copy and publish it on success
    ///
    /// If another writer commits in between, `f` is re-run against the newer
    /// snapshot, so it may be called more than once. On error nothing is
    /// published.
    pub fn update<T>(&self, mut f: impl FnMut(&mut Registry<E>) -> Result<T>) -> Result<T> {
        loop {
            let cur = self.load();
            let mut staging = Registry::clone(&cur);
            let out = f(&mut staging)?;
            if self.publish(&cur, staging) {
                return Ok(out);
            }
            tracing::trace!("registry changed during update, retrying");
        }
    }
}

impl<E> Default for SharedRegistry<E> {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

impl<E> From<Registry<E>> for SharedRegistry<E> {
    fn from(registry: Registry<E>) -> Self {
        Self::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{Action, Key, KeymapError};

    fn quit() -> Action<u8> {
        Action::new("quit").handler(|| 1)
    }

    #[test]
    fn test_update_publishes_on_success() {
        let shared = SharedRegistry::default();
        shared
            .update(|r| r.register(Key::ctrl("c"), quit()))
            .unwrap();
        assert_eq!(shared.load().len(), 1);
    }

    #[test]
    fn test_update_discards_on_error() {
        let shared = SharedRegistry::default();
        shared
            .update(|r| r.register(Key::ctrl("c"), quit()))
            .unwrap();

        let err = shared
            .update(|r| {
                r.register(Key::ctrl("q"), quit())?;
                r.register(Key::ctrl("c"), Action::new("other").handler(|| 2))
            })
            .unwrap_err();
        assert!(matches!(err, KeymapError::Conflict(_)));
        assert_eq!(shared.load().len(), 1);
    }

    #[test]
    fn test_publish_refuses_stale_snapshot() {
        let shared = SharedRegistry::default();
        let stale = shared.load();
        shared.update(|r| r.register(Key::ctrl("c"), quit())).unwrap();

        let mut next = Registry::clone(&stale);
        next.register(Key::ctrl("q"), quit()).unwrap();
        assert!(!shared.publish(&stale, next));
        assert!(shared.load().lookup(&Key::ctrl("c"), "global", "").is_some());

        let cur = shared.load();
        let mut next = Registry::clone(&cur);
        next.register(Key::ctrl("q"), quit()).unwrap();
        assert!(shared.publish(&cur, next));
        assert_eq!(shared.load().len(), 2);
    }

    #[test]
    fn test_old_snapshot_survives_store() {
        let shared = SharedRegistry::default();
        let before = shared.load();
        shared.update(|r| r.register(Key::ctrl("c"), quit())).unwrap();

        assert!(before.is_empty());
        assert_eq!(shared.load().len(), 1);
    }
}
