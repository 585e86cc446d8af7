use nexus_event_bus::{EventBus, EventReceiverExt};
use nexus_tree::{ChangeRequest, ComponentEvent, Path, Registry, TreeError};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::thread;

fn p(raw: &str) -> Path {
    Path::parse(raw).unwrap()
}

#[test]
fn test_construct_twice_is_conflict() {
    let registry = Registry::new();
    registry.construct(p("a"), "T", json!({})).unwrap();

    let err = registry.construct(p("a"), "T", json!({})).unwrap_err();
    assert!(matches!(err, TreeError::PathConflict { .. }));

    registry.destroy(&p("a")).unwrap();
    registry.construct(p("a"), "T", json!({})).unwrap();
}

#[test]
fn test_construct_requires_parent() {
    let registry = Registry::new();
    let err = registry.construct(p("a.b"), "T", json!({})).unwrap_err();
    assert!(matches!(err, TreeError::ParentNotFound { .. }));

    registry.construct(p("a"), "T", json!({})).unwrap();
    registry.construct(p("a.b"), "T", json!({})).unwrap();
    registry.construct(p("a.b.c"), "T", json!({})).unwrap();
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_destroy_removes_subtree() {
    let registry = Registry::new();
    for raw in ["a", "a.b", "a.b.c", "a.d", "e"] {
        registry.construct(p(raw), "T", json!({})).unwrap();
    }

    registry.destroy(&p("a")).unwrap();
    for raw in ["a", "a.b", "a.b.c", "a.d"] {
        assert!(matches!(registry.lookup(&p(raw)), Err(TreeError::NotFound { .. })), "{raw}");
    }
    assert!(registry.lookup(&p("e")).is_ok());
    assert!(matches!(registry.destroy(&p("a")), Err(TreeError::NotFound { .. })));
}

#[test]
fn test_destroy_detaches_listeners() {
    let registry = Registry::new();
    registry.construct(p("a"), "T", json!({})).unwrap();
    let child = registry.construct(p("a.b"), "T", json!({"x": 1})).unwrap();

    let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
    let id = child.applier().add_listener(p("x"), {
        let seen = Arc::clone(&seen);
        move |value: &Value| seen.lock().push(value.clone())
    });

    registry.destroy(&p("a")).unwrap();
    assert_eq!(child.applier().listener_count(), 0);

    child.applier().fire_change_request(ChangeRequest::set(p("x"), json!(2)));
    child.applier().remove_listener(id);
    assert!(seen.lock().is_empty());
}

#[test]
fn test_racing_constructs_yield_one_success() {
    let registry = Arc::new(Registry::new());

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.construct(p("contested"), "T", json!({"winner": n})))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results.iter().filter(|r| matches!(r, Err(TreeError::PathConflict { .. }))).count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_changes_on_one_component_are_serialized() {
    let registry = Registry::new();
    let component = registry.construct(p("counter"), "T", json!({})).unwrap();

    thread::scope(|scope| {
        for n in 0..4 {
            let component = Arc::clone(&component);
            scope.spawn(move || {
                for i in 0..50 {
                    let key = format!("w{n}_{i}");
                    component
                        .applier()
                        .fire_change_request(ChangeRequest::set(Path::from_segments([key]).unwrap(), json!(i)));
                }
            });
        }
    });

    let model = component.model();
    assert_eq!(model.as_object().map(serde_json::Map::len), Some(200));
}

#[tokio::test]
async fn test_lifecycle_events_are_published() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<ComponentEvent>().unwrap();
    let registry = Registry::with_events(bus);

    registry.construct(p("a"), "Light", json!({})).unwrap();
    registry.construct(p("a.b"), "Light", json!({})).unwrap();
    registry.destroy(&p("a")).unwrap();

    let constructed = rx.recv_event().await.unwrap();
    assert_eq!(*constructed, ComponentEvent::Constructed { path: p("a"), type_name: "Light".into() });
    assert_eq!(rx.recv_event().await.unwrap().path(), &p("a.b"));

    let mut destroyed = vec![rx.recv_event().await.unwrap(), rx.recv_event().await.unwrap()];
    destroyed.sort_by(|a, b| a.path().cmp(b.path()));
    assert_eq!(*destroyed[0], ComponentEvent::Destroyed { path: p("a") });
    assert_eq!(*destroyed[1], ComponentEvent::Destroyed { path: p("a.b") });
}
