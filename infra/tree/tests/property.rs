use nexus_tree::{ChangeRequest, Path, Registry};
use proptest::prelude::*;
use serde_json::json;

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9.\\\\ ]{1,8}"
}

proptest! {
    #[test]
    fn render_then_parse_is_identity(segments in proptest::collection::vec(segment(), 0..6)) {
        let path = Path::from_segments(segments).unwrap();
        let rendered = path.render();
        prop_assert_eq!(Path::parse(&rendered).unwrap(), path);
    }

    #[test]
    fn constructed_model_is_returned_by_lookup(name in "[a-z]{1,12}", value in any::<i64>()) {
        let registry = Registry::new();
        let path = Path::from_segments([name]).unwrap();
        let model = json!({"value": value});

        registry.construct(path.clone(), "T", model.clone()).unwrap();
        prop_assert_eq!(registry.lookup(&path).unwrap().model(), model);
    }

    #[test]
    fn set_then_read_returns_value(segments in proptest::collection::vec("[a-z]{1,4}", 1..5), value in any::<i32>()) {
        let registry = Registry::new();
        let component = registry.construct(Path::parse("c").unwrap(), "T", json!({})).unwrap();
        let path = Path::from_segments(segments).unwrap();

        component.applier().fire_change_request(ChangeRequest::set(path.clone(), json!(value)));
        prop_assert_eq!(component.applier().read(&path), Some(json!(value)));
    }
}
