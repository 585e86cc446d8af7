use crate::change::{ChangeRequest, ChangeType};
use crate::path::Path;
use crate::value;
use fxhash::FxHashMap;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Invoked with the value at the listener's registered path after every overlapping change.
pub type Callback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Handle of a listener registration, unique within one [`Applier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Listener {
    path: Path,
    callback: Callback,
}

/// Owns one component model: the single entry point for mutating it and the table of
/// listeners that observe it.
///
/// Change requests on one applier are serialized by a change gate that stays held while
/// listeners run. The gate is reentrant, so a listener may fire a further change on the
/// same thread; the model itself is never locked while a listener runs.
pub struct Applier {
    gate: ReentrantMutex<()>,
    model: Mutex<Value>,
    listeners: RwLock<FxHashMap<ListenerId, Listener>>,
    next_id: AtomicU64,
}

impl fmt::Debug for Applier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Applier")
            .field("model", &*self.model.lock())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl Applier {
    #[must_use]
    pub fn new(model: Value) -> Self {
        Self {
            gate: ReentrantMutex::new(()),
            model: Mutex::new(model),
            listeners: RwLock::new(FxHashMap::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers `callback` for changes overlapping `path`.
    pub fn add_listener<F>(&self, path: Path, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.insert(path, Arc::new(callback))
    }

    /// Registers `callback` and immediately invokes it once with the current value at
    /// `path`.
    ///
    /// No change request can slip between the registration and that first invocation, so
    /// the listener observes every later change exactly once.
    pub fn add_listener_primed<F>(&self, path: Path, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let _gate = self.gate.lock();
        let current = self.read(&path).unwrap_or(Value::Null);
        let callback: Callback = Arc::new(callback);
        let id = self.insert(path, Arc::clone(&callback));
        callback(&current);
        id
    }

    fn insert(&self, path: Path, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        trace!(listener = %id, path = %path, "Listener registered");
        self.listeners.write().insert(id, Listener { path, callback });
        id
    }

    /// Unregisters a listener. Unknown ids are ignored.
    ///
    /// Waits for a notification running on another thread to finish, so the callback is
    /// never invoked once this returns.
    pub fn remove_listener(&self, id: ListenerId) {
        let _gate = self.gate.lock();
        if self.listeners.write().remove(&id).is_some() {
            trace!(listener = %id, "Listener removed");
        }
    }

    /// Applies `request` to the model, then notifies every listener whose registered path
    /// overlaps the target path.
    ///
    /// Each notified listener gets the value stored at its own registered path (`null` when
    /// absent). The listener set is captured once the mutation is committed: listeners
    /// added during notification are not invoked, listeners removed during notification
    /// are skipped.
    pub fn fire_change_request(&self, request: ChangeRequest) {
        let _gate = self.gate.lock();

        let ChangeRequest { path, value, change_type } = request;
        {
            let mut model = self.model.lock();
            match change_type {
                ChangeType::Set => value::set(&mut model, &path, value),
                ChangeType::Delete => value::delete(&mut model, &path),
            }
        }

        let pending: Vec<(ListenerId, Path, Callback)> = self
            .listeners
            .read()
            .iter()
            .filter(|(_, listener)| listener.path.overlaps(&path))
            .map(|(id, listener)| (*id, listener.path.clone(), Arc::clone(&listener.callback)))
            .collect();

        debug!(path = %path, change = %change_type, listeners = pending.len(), "Change applied");

        for (id, listener_path, callback) in pending {
            if !self.listeners.read().contains_key(&id) {
                trace!(listener = %id, "Listener removed during notification, skipped");
                continue;
            }
            let current = self.read(&listener_path).unwrap_or(Value::Null);
            callback(&current);
        }
    }

    /// Snapshot of the whole model.
    #[must_use]
    pub fn model(&self) -> Value {
        self.model.lock().clone()
    }

    /// Snapshot of the value at `path`, `None` when absent.
    #[must_use]
    pub fn read(&self, path: &Path) -> Option<Value> {
        value::get(&self.model.lock(), path).cloned()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Drops every listener registration; later changes notify nobody.
    pub fn clear(&self) {
        let _gate = self.gate.lock();
        let removed = {
            let mut listeners = self.listeners.write();
            let removed = listeners.len();
            listeners.clear();
            removed
        };
        if removed > 0 {
            debug!(listeners = removed, "Listener table cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type Seen = Arc<Mutex<Vec<Value>>>;

    fn recorder() -> (Seen, impl Fn(&Value) + Send + Sync + 'static) {
        let seen: Seen = Arc::default();
        let sink = Arc::clone(&seen);
        (seen, move |value: &Value| sink.lock().push(value.clone()))
    }

    fn p(raw: &str) -> Path {
        Path::parse(raw).unwrap()
    }

    #[test]
    fn test_listener_ids_are_fresh() {
        let applier = Applier::new(json!({}));
        let a = applier.add_listener(p("a"), |_| {});
        let b = applier.add_listener(p("a"), |_| {});
        assert!(b > a);
        assert_eq!(applier.listener_count(), 2);
    }

    #[test]
    fn test_listener_receives_value_at_own_path() {
        let applier = Applier::new(json!({"net": {"ip": "a", "mask": "b"}}));
        let (seen, callback) = recorder();
        applier.add_listener(p("net"), callback);

        applier.fire_change_request(ChangeRequest::set(p("net.ip"), json!("z")));
        assert_eq!(*seen.lock(), vec![json!({"ip": "z", "mask": "b"})]);
    }

    #[test]
    fn test_descendant_listener_sees_parent_change() {
        let applier = Applier::new(json!({"net": {"ip": "a"}}));
        let (seen, callback) = recorder();
        applier.add_listener(p("net.ip"), callback);

        applier.fire_change_request(ChangeRequest::set(p("net"), json!({"ip": "b"})));
        applier.fire_change_request(ChangeRequest::delete(p("net")));
        assert_eq!(*seen.lock(), vec![json!("b"), Value::Null]);
    }

    #[test]
    fn test_disjoint_listener_not_invoked() {
        let applier = Applier::new(json!({}));
        let (seen, callback) = recorder();
        applier.add_listener(p("a.b"), callback);

        applier.fire_change_request(ChangeRequest::set(p("a.c"), json!(1)));
        applier.fire_change_request(ChangeRequest::set(p("ab"), json!(1)));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_root_listener_sees_everything() {
        let applier = Applier::new(json!({}));
        let (seen, callback) = recorder();
        applier.add_listener(Path::root(), callback);

        applier.fire_change_request(ChangeRequest::set(p("x"), json!(1)));
        assert_eq!(*seen.lock(), vec![json!({"x": 1})]);
    }

    #[test]
    fn test_removed_listener_not_invoked() {
        let applier = Applier::new(json!({}));
        let (seen, callback) = recorder();
        let id = applier.add_listener(p("a"), callback);
        applier.remove_listener(id);
        applier.remove_listener(id);

        applier.fire_change_request(ChangeRequest::set(p("a"), json!(1)));
        assert!(seen.lock().is_empty());
        assert_eq!(applier.listener_count(), 0);
    }

    #[test]
    fn test_primed_listener_gets_current_value_first() {
        let applier = Applier::new(json!({"brightness": 50}));
        let (seen, callback) = recorder();
        applier.add_listener_primed(p("brightness"), callback);
        applier.fire_change_request(ChangeRequest::set(p("brightness"), json!(80)));

        assert_eq!(*seen.lock(), vec![json!(50), json!(80)]);
    }

    #[test]
    fn test_listener_removed_during_notification_is_skipped() {
        let applier = Arc::new(Applier::new(json!({})));
        let calls = Arc::new(AtomicU64::new(0));
        let ids: Arc<Mutex<Vec<ListenerId>>> = Arc::default();

        // Each listener removes the other one; only the first to run may be invoked.
        for _ in 0..2 {
            let applier_ref = Arc::clone(&applier);
            let calls = Arc::clone(&calls);
            let ids_ref = Arc::clone(&ids);
            let id = applier.add_listener(p("a"), move |_: &Value| {
                calls.fetch_add(1, Ordering::SeqCst);
                let ids = ids_ref.lock().clone();
                for id in ids {
                    applier_ref.remove_listener(id);
                }
            });
            ids.lock().push(id);
        }

        applier.fire_change_request(ChangeRequest::set(p("a"), json!(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(applier.listener_count(), 0);
    }

    #[test]
    fn test_listener_added_during_notification_not_invoked() {
        let applier = Arc::new(Applier::new(json!({})));
        let (seen, callback) = recorder();
        let callback = Arc::new(Mutex::new(Some(callback)));

        applier.add_listener(p("a"), {
            let applier = Arc::clone(&applier);
            move |_: &Value| {
                if let Some(callback) = callback.lock().take() {
                    applier.add_listener(p("a"), callback);
                }
            }
        });

        applier.fire_change_request(ChangeRequest::set(p("a"), json!(1)));
        assert!(seen.lock().is_empty());

        applier.fire_change_request(ChangeRequest::set(p("a"), json!(2)));
        assert_eq!(*seen.lock(), vec![json!(2)]);
    }

    #[test]
    fn test_reentrant_change_from_listener() {
        let applier = Arc::new(Applier::new(json!({"a": 0, "b": 0})));
        let (seen, callback) = recorder();
        applier.add_listener(p("b"), callback);

        applier.add_listener(p("a"), {
            let applier = Arc::clone(&applier);
            move |value: &Value| {
                applier.fire_change_request(ChangeRequest::set(p("b"), value.clone()));
            }
        });

        applier.fire_change_request(ChangeRequest::set(p("a"), json!(7)));
        assert_eq!(applier.model(), json!({"a": 7, "b": 7}));
        assert_eq!(*seen.lock(), vec![json!(7)]);
    }

    #[test]
    fn test_clear_drops_listeners() {
        let applier = Applier::new(json!({}));
        let (seen, callback) = recorder();
        applier.add_listener(Path::root(), callback);
        applier.clear();

        applier.fire_change_request(ChangeRequest::set(p("a"), json!(1)));
        assert!(seen.lock().is_empty());
        assert_eq!(applier.read(&p("a")), Some(json!(1)));
    }
}
