//! Persisted, subscribable single-record container
//!
//! A [`ReactiveStore`] owns one record, hands out clones of it, and broadcasts every change
//! over a `tokio::sync::watch` channel. Each write is persisted before subscribers are woken,
//! as the envelope `{"state": <record>, "version": N}` under `"{namespace}:{key}"`.
//!
//! Rehydration never fails: a missing, unreadable, malformed or outdated document yields the
//! record's `Default`. Storage write failures are logged and the in-memory state still
//! changes.

use crate::adapters::storage::StateStorage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// A record a [`ReactiveStore`] can hold
pub trait PersistedRecord:
    Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Storage key, without the namespace
    const KEY: &'static str;

    /// Schema version; persisted documents with another version are discarded
    const VERSION: u32 = 1;
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

/// `"{namespace}:{key}"`
pub fn storage_key(namespace: &str, key: &str) -> String {
    format!("{namespace}:{key}")
}

/// Single-record reactive container
pub struct ReactiveStore<T: PersistedRecord> {
    tx: watch::Sender<T>,
    writer: Mutex<()>,
    storage: Arc<dyn StateStorage>,
    key: String,
}

impl<T: PersistedRecord> ReactiveStore<T> {
    /// Builds the store, rehydrating from `storage`
    pub fn load(storage: Arc<dyn StateStorage>, namespace: &str) -> Self {
        let key = storage_key(namespace, T::KEY);
        let initial = rehydrate::<T>(storage.as_ref(), &key);
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            writer: Mutex::new(()),
            storage,
            key,
        }
    }

    /// Clone of the current record
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Runs `f` against the current record without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that observes every subsequent change
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Replaces the record
    pub fn set(&self, state: T) {
        self.update(|current| *current = state);
    }

    /// Mutates a copy of the record, persists it, then notifies subscribers
    ///
    /// Writers are serialized, so concurrent updates never lose each other's changes.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = self.get();
        let result = f(&mut next);
        persist(self.storage.as_ref(), &self.key, &next);
        self.tx.send_replace(next);
        result
    }

    /// Restores the default record and deletes the persisted document
    pub fn reset(&self) {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "Failed to remove persisted state");
        }
        self.tx.send_replace(T::default());
    }

    /// Namespaced storage key
    pub fn key(&self) -> &str {
        &self.key
    }
}

fn rehydrate<T: PersistedRecord>(storage: &dyn StateStorage, key: &str) -> T {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted state; using defaults");
            return T::default();
        }
    };

    match serde_json::from_str::<Envelope<T>>(&raw) {
        Ok(envelope) if envelope.version == T::VERSION => envelope.state,
        Ok(envelope) => {
            tracing::warn!(
                key,
                found = envelope.version,
                expected = T::VERSION,
                "Persisted state has another version; using defaults"
            );
            T::default()
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Persisted state is malformed; using defaults");
            T::default()
        }
    }
}

fn persist<T: PersistedRecord>(storage: &dyn StateStorage, key: &str, state: &T) {
    let envelope = Envelope {
        state,
        version: T::VERSION,
    };
    let result = serde_json::to_string(&envelope)
        .map_err(crate::domain::WardroomError::from)
        .and_then(|json| storage.save(key, &json));
    if let Err(e) = result {
        tracing::warn!(key, error = %e, "Failed to persist state");
    }
}
