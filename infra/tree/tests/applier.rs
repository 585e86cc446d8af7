use nexus_tree::{ChangeRequest, ChangeType, Path, Registry};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;

fn p(raw: &str) -> Path {
    Path::parse(raw).unwrap()
}

fn recorder() -> (Arc<Mutex<Vec<Value>>>, impl Fn(&Value) + Send + Sync + 'static) {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
    let sink = Arc::clone(&seen);
    (seen, move |value: &Value| sink.lock().push(value.clone()))
}

#[test]
fn test_every_overlapping_listener_notified_once() {
    let registry = Registry::new();
    let component = registry
        .construct(p("dev"), "Router", json!({"net": {"ip": "10.0.0.1", "mask": "255.0.0.0"}, "name": "r1"}))
        .unwrap();
    let applier = component.applier();

    let (root, on_root) = recorder();
    let (net, on_net) = recorder();
    let (ip, on_ip) = recorder();
    let (mask, on_mask) = recorder();
    let (name, on_name) = recorder();
    applier.add_listener(Path::root(), on_root);
    applier.add_listener(p("net"), on_net);
    applier.add_listener(p("net.ip"), on_ip);
    applier.add_listener(p("net.mask"), on_mask);
    applier.add_listener(p("name"), on_name);

    applier.fire_change_request(ChangeRequest {
        path: p("net.ip"),
        value: json!("10.0.0.2"),
        change_type: ChangeType::Set,
    });

    assert_eq!(root.lock().len(), 1);
    assert_eq!(*net.lock(), vec![json!({"ip": "10.0.0.2", "mask": "255.0.0.0"})]);
    assert_eq!(*ip.lock(), vec![json!("10.0.0.2")]);
    assert!(mask.lock().is_empty());
    assert!(name.lock().is_empty());
}

#[test]
fn test_delete_notifies_with_null() {
    let registry = Registry::new();
    let component = registry.construct(p("dev"), "T", json!({"a": {"b": 1}})).unwrap();
    let (seen, callback) = recorder();
    component.applier().add_listener(p("a.b"), callback);

    component.applier().fire_change_request(ChangeRequest::delete(p("a")));
    component.applier().fire_change_request(ChangeRequest::delete(p("a")));

    assert_eq!(*seen.lock(), vec![Value::Null, Value::Null]);
    assert_eq!(component.model(), json!({}));
}
