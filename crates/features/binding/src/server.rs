use crate::session::{BindingSession, Outbound, SessionState};
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::extract::{Path as RouteParam, State};
use axum::response::Response;
use nexus_derive::api_handler;
use nexus_domain::constants::BINDING_TAG;
use nexus_event_bus::EventReceiverExt;
use nexus_kernel::server::ApiState;
use nexus_tree::{ComponentEvent, Path};
use std::future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

type Lifecycle = broadcast::Receiver<Arc<ComponentEvent>>;

#[api_handler(
    get,
    path = "/bindModel/{component_path}/{model_path}",
    params(
        ("component_path" = String, Path, description = "Dot-delimited component path"),
        ("model_path" = String, Path, description = "Dot-delimited path inside the model"),
    ),
    responses(
        (status = SWITCHING_PROTOCOLS, description = "WebSocket bound; pushes are JSON text frames"),
        (status = BAD_REQUEST, description = "Not a WebSocket upgrade"),
    ),
    tag = BINDING_TAG,
)]
pub(crate) async fn bind_model(
    ws: WebSocketUpgrade,
    State(state): State<ApiState>,
    RouteParam((component_path, model_path)): RouteParam<(String, String)>,
) -> Response {
    ws.on_upgrade(move |socket| run(socket, state, component_path, model_path))
}

/// Binds the whole model of the component.
#[api_handler(
    get,
    path = "/bindModel/{component_path}",
    params(("component_path" = String, Path, description = "Dot-delimited component path")),
    responses(
        (status = SWITCHING_PROTOCOLS, description = "WebSocket bound; pushes are JSON text frames"),
        (status = BAD_REQUEST, description = "Not a WebSocket upgrade"),
    ),
    tag = BINDING_TAG,
)]
pub(crate) async fn bind_whole_model(
    ws: WebSocketUpgrade,
    State(state): State<ApiState>,
    RouteParam(component_path): RouteParam<String>,
) -> Response {
    ws.on_upgrade(move |socket| run(socket, state, component_path, String::new()))
}

async fn run(mut socket: WebSocket, state: ApiState, component_path: String, model_path: String) {
    debug!(
        path = %component_path,
        model_path = %model_path,
        state = %SessionState::Connecting,
        "Binding requested"
    );

    // Subscribed before binding so a destroy right after it cannot be missed.
    let mut lifecycle = if state.config.binding.close_on_destroy {
        state
            .events
            .subscribe::<ComponentEvent>()
            .inspect_err(|e| warn!(error = %e, "Lifecycle events unavailable"))
            .ok()
    } else {
        None
    };

    let (session, mut outbound) =
        match BindingSession::open(&state.registry, &component_path, &model_path) {
            Ok(bound) => bound,
            Err(e) => {
                warn!(path = %component_path, model_path = %model_path, error = %e, "Binding rejected");
                let frame = CloseFrame { code: close_code::POLICY, reason: e.to_string().into() };
                let _ = socket.send(Message::Close(Some(frame))).await;
                return;
            },
        };

    pump(&mut socket, &session, &mut outbound, &mut lifecycle).await;

    session.close();
    let _ = socket.send(Message::Close(None)).await;
}

async fn pump(
    socket: &mut WebSocket,
    session: &BindingSession,
    outbound: &mut Outbound,
    lifecycle: &mut Option<Lifecycle>,
) {
    let mut detached = false;
    loop {
        tokio::select! {
            pushed = outbound.recv(), if !detached => match pushed {
                Some(value) => {
                    if let Err(e) = socket.send(Message::Text(value.to_string().into())).await {
                        debug!(session = %session.id(), error = %e, "Push failed, client gone");
                        break;
                    }
                },
                // The target was destroyed; the socket stays up without pushes.
                None => {
                    debug!(session = %session.id(), "Target detached, pushes stopped");
                    detached = true;
                },
            },
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if let Err(e) = session.receive(text.as_str()) {
                        warn!(session = %session.id(), kind = e.kind(), error = %e, "Inbound message dropped");
                    }
                },
                Some(Ok(Message::Binary(_))) => {
                    warn!(session = %session.id(), "Binary frame ignored");
                },
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {},
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
            },
            () = target_destroyed(lifecycle, session.component_path()) => {
                debug!(session = %session.id(), "Target destroyed, closing binding");
                break;
            },
        }
    }
}

/// Resolves once `target` is destroyed; never, without a lifecycle subscription.
async fn target_destroyed(lifecycle: &mut Option<Lifecycle>, target: &Path) {
    let Some(events) = lifecycle else {
        return future::pending().await;
    };

    while let Some(event) = events.recv_event().await {
        if matches!(event.as_ref(), ComponentEvent::Destroyed { path } if path == target) {
            return;
        }
    }
    future::pending().await
}
