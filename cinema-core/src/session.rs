//! Signed-in session: the cached profile in key-value storage and a small
//! publish/subscribe hub that tells open views when it changes.

use crate::models::User;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Storage key holding the signed-in profile as JSON.
pub const USER_KEY: &str = "user";
/// Storage key holding the chosen UI language.
pub const LOCALE_KEY: &str = "cinema.locale";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("could not encode value: {0}")]
    Encode(String),
}

/// String key-value storage. `localStorage` in the browser, a map in tests.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// [`StorageError`] when the backing store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// What the `user` key currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredUser {
    Missing,
    /// Placeholder text or JSON that does not decode to a profile.
    Corrupt,
    Present(User),
}

#[must_use]
pub fn read_user(store: &dyn KeyValueStore) -> StoredUser {
    let Some(raw) = store.get(USER_KEY) else {
        return StoredUser::Missing;
    };
    match raw.trim() {
        "" | "undefined" | "null" => StoredUser::Corrupt,
        text => serde_json::from_str::<User>(text).map_or(StoredUser::Corrupt, StoredUser::Present),
    }
}

/// Drop a corrupt `user` entry. Returns true when something was removed.
pub fn sanitize_user(store: &dyn KeyValueStore) -> bool {
    if read_user(store) == StoredUser::Corrupt {
        store.remove(USER_KEY);
        true
    } else {
        false
    }
}

/// The cached profile, clearing the key when it is corrupt.
#[must_use]
pub fn load_user(store: &dyn KeyValueStore) -> Option<User> {
    match read_user(store) {
        StoredUser::Present(user) => Some(user),
        StoredUser::Corrupt => {
            store.remove(USER_KEY);
            None
        }
        StoredUser::Missing => None,
    }
}

/// # Errors
/// [`StorageError`] when encoding or the write fails.
pub fn save_user(store: &dyn KeyValueStore, user: &User) -> Result<(), StorageError> {
    let json = serde_json::to_string(user).map_err(|e| StorageError::Encode(e.to_string()))?;
    store.set(USER_KEY, &json)
}

/// Update the cached point balance in place, if a profile is stored.
///
/// # Errors
/// [`StorageError`] when the write fails.
pub fn update_points(store: &dyn KeyValueStore, available: i64) -> Result<Option<User>, StorageError> {
    let Some(mut user) = load_user(store) else {
        return Ok(None);
    };
    user.available_points = Some(available);
    save_user(store, &user)?;
    Ok(Some(user))
}

pub fn clear_session(store: &dyn KeyValueStore) {
    store.remove(USER_KEY);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    UserChanged(Option<User>),
    PointsChanged { available: i64 },
}

type Listener = Rc<dyn Fn(&SessionEvent)>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// Single-threaded event hub for session changes.
#[derive(Clone, Default)]
pub struct SessionHub {
    inner: Rc<RefCell<HubInner>>,
}

impl PartialEq for SessionHub {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SessionHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl SessionHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned handle is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Rc::new(listener));
        Subscription {
            hub: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    /// Listeners may subscribe or unsubscribe while being notified.
    pub fn publish(&self, event: &SessionEvent) {
        let listeners: Vec<Listener> = self.inner.borrow().listeners.values().cloned().collect();
        for listener in listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Unsubscribes on drop.
pub struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().listeners.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::cell::Cell;

    fn user() -> User {
        User {
            user_id: 7,
            full_name: "Nguyen Van A".into(),
            email: "a@example.com".into(),
            phone: None,
            roles: vec![Role::Customer],
            membership_tier: None,
            available_points: Some(120),
        }
    }

    #[test]
    fn placeholder_values_are_removed() {
        for raw in ["undefined", "null", "", "{not json"] {
            let store = MemoryStore::new();
            store.set(USER_KEY, raw).expect("set");
            assert!(sanitize_user(&store), "{raw:?} should be removed");
            assert_eq!(store.get(USER_KEY), None);
        }
    }

    #[test]
    fn valid_profile_survives_sanitizing() {
        let store = MemoryStore::new();
        save_user(&store, &user()).expect("save");
        assert!(!sanitize_user(&store));
        assert_eq!(load_user(&store), Some(user()));
        clear_session(&store);
        assert_eq!(read_user(&store), StoredUser::Missing);
    }

    #[test]
    fn points_update_rewrites_profile() {
        let store = MemoryStore::new();
        assert_eq!(update_points(&store, 5).expect("update"), None);
        save_user(&store, &user()).expect("save");
        let updated = update_points(&store, 40).expect("update").expect("user");
        assert_eq!(updated.available_points, Some(40));
        assert_eq!(load_user(&store).and_then(|u| u.available_points), Some(40));
    }

    #[test]
    fn subscriptions_end_on_drop() {
        let hub = SessionHub::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let sub = hub.subscribe(move |event| {
            if matches!(event, SessionEvent::PointsChanged { .. }) {
                counter.set(counter.get() + 1);
            }
        });
        hub.publish(&SessionEvent::PointsChanged { available: 10 });
        hub.publish(&SessionEvent::UserChanged(None));
        assert_eq!(seen.get(), 1);
        drop(sub);
        assert_eq!(hub.listener_count(), 0);
        hub.publish(&SessionEvent::PointsChanged { available: 3 });
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn listeners_may_unsubscribe_while_notified() {
        let hub = SessionHub::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let inner_slot = Rc::clone(&slot);
        let sub = hub.subscribe(move |_| {
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);
        hub.publish(&SessionEvent::UserChanged(Some(user())));
        assert_eq!(hub.listener_count(), 0);
    }
}
