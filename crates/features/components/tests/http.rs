use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use nexus_components::{ComponentSummary, ComponentView, router};
use nexus_kernel::domain::config::ApiConfig;
use nexus_kernel::server::ApiState;
use nexus_kernel::tree::Path;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> (Router, ApiState) {
    let state = ApiState::builder().config(ApiConfig::default()).build().unwrap();
    let (router, _) = router().with_state(state.clone()).split_for_parts();
    (router, state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

#[tokio::test]
async fn construct_lookup_destroy() {
    let (app, _) = app();

    let (status, body) =
        call(&app, Method::POST, "/components/dev1", Some(json!({"type": "Light", "model": {"brightness": 50}}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, body) = call(&app, Method::GET, "/components/dev1", None).await;
    assert_eq!(status, StatusCode::OK);
    let view: ComponentView = serde_json::from_value(body).unwrap();
    assert_eq!(view.type_name, "Light");
    assert_eq!(view.model, json!({"brightness": 50}));

    let (status, _) = call(&app, Method::DELETE, "/components/dev1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, "/components/dev1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["isError"], true);
}

#[tokio::test]
async fn error_statuses() {
    let (app, _) = app();
    let light = json!({"type": "Light"});

    let (status, _) = call(&app, Method::POST, "/components/a.b", Some(light.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "missing parent");

    let (status, _) = call(&app, Method::POST, "/components/a", Some(light.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::POST, "/components/a", Some(light.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already occupied"));

    let (status, _) = call(&app, Method::POST, "/components/a..b", Some(light)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "malformed path");

    let (status, _) = call(&app, Method::DELETE, "/components/nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn construct_merges_type_defaults() {
    let (app, state) = app();
    state.defaults.set("Light", json!({"model": {"brightness": 100, "color": {"r": 255, "g": 255}}}));

    let (status, _) = call(
        &app,
        Method::POST,
        "/components/dev1",
        Some(json!({"type": "Light", "model": {"color": {"g": 0}}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let component = state.registry.lookup(&Path::parse("dev1").unwrap()).unwrap();
    assert_eq!(component.model(), json!({"brightness": 100, "color": {"r": 255, "g": 0}}));
}

#[tokio::test]
async fn destroy_cascades_and_list_reflects_it() {
    let (app, _) = app();
    for path in ["a", "a.b", "c"] {
        let (status, _) = call(&app, Method::POST, &format!("/components/{path}"), Some(json!({"type": "T"}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    call(&app, Method::DELETE, "/components/a", None).await;
    let (status, body) = call(&app, Method::GET, "/components/a.b", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["isError"], true);

    let (_, body) = call(&app, Method::GET, "/components", None).await;
    let listed: Vec<ComponentSummary> = serde_json::from_value(body).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, "c");
}
