use std::sync::{Arc, Weak};

use serde_json::Value;

use crate::settings_store::{ListenerId, SettingsStore};

#[must_use = "dropping a Subscription unbinds its effect"]
pub(crate) struct Subscription {
    store: Weak<SettingsStore>,
    key: String,
    id: Option<ListenerId>,
}

impl Subscription {
    #[cfg(test)]
    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(store) = self.store.upgrade() {
            store.remove_change_listener(&self.key, id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("active", &self.id.is_some())
            .finish()
    }
}

// The current value is not replayed.
pub(crate) fn bind<F>(store: &Arc<SettingsStore>, key: &str, effect: F) -> Subscription
where
    F: Fn(&Value) + Send + Sync + 'static,
{
    let id = store.add_change_listener(key, Arc::new(effect));
    Subscription {
        store: Arc::downgrade(store),
        key: key.to_string(),
        id: Some(id),
    }
}

#[derive(Debug, Default)]
pub(crate) struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub(crate) fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub(crate) fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub(crate) fn unbind_all(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }
}

impl Extend<Subscription> for SubscriptionSet {
    fn extend<T: IntoIterator<Item = Subscription>>(&mut self, iter: T) {
        self.subscriptions.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use serde_json::json;

    use super::*;

    fn counter_effect(counter: &Arc<AtomicUsize>) -> impl Fn(&Value) + Send + Sync + 'static {
        let counter = counter.clone();
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn bind_runs_effect_on_change_only() {
        let store = Arc::new(SettingsStore::in_memory("settings"));
        store.set_value("enableMenu", json!(true));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = bind(&store, "enableMenu", move |value| {
            sink.lock().expect("lock").push(value.clone());
        });

        assert!(seen.lock().expect("lock").is_empty());
        store.set_value("enableMenu", json!(false));
        assert_eq!(*seen.lock().expect("lock"), vec![json!(false)]);
    }

    #[test]
    fn dropping_subscription_unbinds_effect() {
        let store = Arc::new(SettingsStore::in_memory("settings"));
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let subscription = bind(&store, "tray", counter_effect(&counter));
            assert_eq!(subscription.key(), "tray");
            store.set_value("tray", json!(false));
        }
        store.set_value("tray", json!(true));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(store.listener_count("tray"), 0);
    }

    #[test]
    fn unbind_all_releases_every_subscription() {
        let store = Arc::new(SettingsStore::in_memory("settings"));
        let counter = Arc::new(AtomicUsize::new(0));
        let mut set = SubscriptionSet::default();
        set.push(bind(&store, "tray", counter_effect(&counter)));
        set.push(bind(&store, "enableMenu", counter_effect(&counter)));
        assert_eq!(set.len(), 2);

        set.unbind_all();
        store.set_value("tray", json!(false));
        store.set_value("enableMenu", json!(true));

        assert!(set.is_empty());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn subscription_outliving_store_drops_cleanly() {
        let store = Arc::new(SettingsStore::in_memory("settings"));
        let subscription = bind(&store, "tray", |_| {});
        drop(store);
        subscription.dispose();
    }
}
