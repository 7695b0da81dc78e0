//! Deferred, load-once fields.
//!
//! Every container-valued attribute in the object graph starts out
//! [`LoadPhase::NotLoaded`] and is materialized on first read.
//!
//! # Concurrency
//! The load is check-then-act, not compare-and-swap. Two callers that
//! both observe `NotLoaded` (or one observing the other's `Loading`)
//! will each run the loader; the first value stored is kept and handed
//! to both. Callers that need exactly one backing-store query must
//! serialize first access themselves.

use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

/// Observable state of a [`Lazy`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Never loaded, or the last load failed.
    NotLoaded,
    /// A load is in progress.
    Loading,
    /// The value is cached.
    Loaded,
}

#[derive(Debug)]
enum LoadState<T> {
    NotLoaded,
    Loading,
    Loaded(Arc<T>),
}

/// A field that is loaded at most once and cached afterwards.
#[derive(Debug)]
pub struct Lazy<T> {
    state: Mutex<LoadState<T>>,
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Lazy<T> {
    /// Creates an unloaded field.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(LoadState::NotLoaded),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoadState<T>> {
        // A panicking loader cannot leave a partially built value behind,
        // so a poisoned state is still consistent.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Returns the current phase without triggering a load.
    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        match &*self.lock() {
            LoadState::NotLoaded => LoadPhase::NotLoaded,
            LoadState::Loading => LoadPhase::Loading,
            LoadState::Loaded(_) => LoadPhase::Loaded,
        }
    }

    /// Whether the value is cached.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.phase() == LoadPhase::Loaded
    }

    /// Returns the cached value, if loaded.
    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        match &*self.lock() {
            LoadState::Loaded(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Returns the cached value or runs `load` to produce it.
    ///
    /// A failed load resets the field to `NotLoaded` so a later call can
    /// retry; the lock is not held while `load` runs.
    pub fn get_or_load<E, F>(&self, label: &str, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        {
            let mut state = self.lock();
            match &*state {
                LoadState::Loaded(value) => return Ok(Arc::clone(value)),
                LoadState::Loading => {
                    debug!("{label}: concurrent first access, loading again");
                }
                LoadState::NotLoaded => {
                    *state = LoadState::Loading;
                }
            }
        }

        debug!("{label}: loading");
        match load() {
            Ok(value) => {
                let mut state = self.lock();
                if let LoadState::Loaded(existing) = &*state {
                    return Ok(Arc::clone(existing));
                }
                let value = Arc::new(value);
                *state = LoadState::Loaded(Arc::clone(&value));
                Ok(value)
            }
            Err(err) => {
                let mut state = self.lock();
                if matches!(*state, LoadState::Loading) {
                    *state = LoadState::NotLoaded;
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn loads_once_and_returns_same_instance() {
        let lazy: Lazy<Vec<u32>> = Lazy::new();
        let calls = Cell::new(0);
        let load = || -> Result<Vec<u32>, ()> {
            calls.set(calls.get() + 1);
            Ok(Vec::new())
        };

        assert_eq!(lazy.phase(), LoadPhase::NotLoaded);
        let first = lazy.get_or_load("test", load).unwrap();
        let second = lazy
            .get_or_load("test", || -> Result<Vec<u32>, ()> {
                calls.set(calls.get() + 1);
                Ok(vec![1])
            })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.is_empty());
        assert_eq!(calls.get(), 1);
        assert_eq!(lazy.phase(), LoadPhase::Loaded);
    }

    #[test]
    fn failed_load_can_be_retried() {
        let lazy: Lazy<u32> = Lazy::new();
        let err = lazy.get_or_load("test", || Err::<u32, &str>("boom"));
        assert_eq!(err.unwrap_err(), "boom");
        assert_eq!(lazy.phase(), LoadPhase::NotLoaded);

        let value = lazy.get_or_load("test", || Ok::<u32, &str>(7)).unwrap();
        assert_eq!(*value, 7);
    }

    #[test]
    fn loader_observes_loading_phase() {
        let lazy: Lazy<u32> = Lazy::new();
        let value = lazy
            .get_or_load("test", || {
                assert_eq!(lazy.phase(), LoadPhase::Loading);
                Ok::<u32, ()>(1)
            })
            .unwrap();
        assert_eq!(*value, 1);
        assert!(lazy.get().is_some());
    }
}
