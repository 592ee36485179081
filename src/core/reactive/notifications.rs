//! Notification feed store

use super::container::{PersistedRecord, ReactiveStore};
use crate::adapters::storage::StateStorage;
use crate::domain::{Notification, NotificationEvent, NotificationId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Persisted feed, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationFeed {
    /// Notifications, index 0 is the most recent
    pub notifications: Vec<Notification>,
}

impl PersistedRecord for NotificationFeed {
    const KEY: &'static str = "notifications";
}

impl NotificationFeed {
    /// Number of entries with `read == false`
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}

/// Reactive notification feed
pub struct NotificationStore {
    inner: ReactiveStore<NotificationFeed>,
    max_entries: usize,
}

impl NotificationStore {
    /// Loads the feed; `max_entries == 0` keeps every entry
    pub fn load(storage: Arc<dyn StateStorage>, namespace: &str, max_entries: usize) -> Self {
        Self {
            inner: ReactiveStore::load(storage, namespace),
            max_entries,
        }
    }

    /// Stamps `event` and prepends it, dropping the oldest entries beyond the cap
    pub fn add(&self, event: NotificationEvent) -> Notification {
        let notification = Notification::from_event(event);
        let max_entries = self.max_entries;
        let dropped = self.inner.update(|feed| {
            feed.notifications.insert(0, notification.clone());
            if max_entries > 0 && feed.notifications.len() > max_entries {
                let dropped = feed.notifications.len() - max_entries;
                feed.notifications.truncate(max_entries);
                dropped
            } else {
                0
            }
        });

        tracing::debug!(
            notification_id = %notification.id,
            kind = %notification.kind,
            dropped,
            "Added notification"
        );
        notification
    }

    /// Marks one notification read; returns whether it exists
    pub fn mark_read(&self, id: &NotificationId) -> bool {
        self.inner.update(|feed| match feed.notifications.iter_mut().find(|n| &n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        })
    }

    /// Marks every notification read; returns how many changed
    pub fn mark_all_read(&self) -> usize {
        self.inner.update(|feed| {
            let mut changed = 0;
            for notification in feed.notifications.iter_mut().filter(|n| !n.read) {
                notification.read = true;
                changed += 1;
            }
            changed
        })
    }

    /// Deletes one notification; returns whether it existed
    pub fn remove(&self, id: &NotificationId) -> bool {
        self.inner.update(|feed| {
            let before = feed.notifications.len();
            feed.notifications.retain(|n| &n.id != id);
            feed.notifications.len() != before
        })
    }

    /// Deletes every notification
    pub fn clear(&self) {
        self.inner.reset();
    }

    /// Number of unread notifications
    pub fn unread_count(&self) -> usize {
        self.inner.read(NotificationFeed::unread_count)
    }

    /// Clone of the feed, newest first
    pub fn list(&self) -> Vec<Notification> {
        self.inner.get().notifications
    }

    /// Receiver that observes every change to the feed
    pub fn subscribe(&self) -> watch::Receiver<NotificationFeed> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::domain::NotificationType;

    fn event(title: &str) -> NotificationEvent {
        NotificationEvent::new(NotificationType::SystemAbnormal, title, "details")
    }

    fn store(max_entries: usize) -> NotificationStore {
        NotificationStore::load(Arc::new(MemoryStorage::new()), "test", max_entries)
    }

    #[test]
    fn test_add_prepends() {
        let store = store(0);
        store.add(event("first"));
        store.add(event("second"));
        let titles: Vec<_> = store.list().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert_eq!(store.unread_count(), 2);
    }

    #[test]
    fn test_mark_read_and_remove() {
        let store = store(0);
        let first = store.add(event("first"));
        store.add(event("second"));

        assert!(store.mark_read(&first.id));
        assert_eq!(store.unread_count(), 1);
        assert!(!store.mark_read(&NotificationId::generate()));

        assert_eq!(store.mark_all_read(), 1);
        assert_eq!(store.unread_count(), 0);

        assert!(store.remove(&first.id));
        assert!(!store.remove(&first.id));
        assert_eq!(store.list().len(), 1);

        store.clear();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let store = store(2);
        for title in ["a", "b", "c"] {
            store.add(event(title));
        }
        let titles: Vec<_> = store.list().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["c", "b"]);
    }
}
