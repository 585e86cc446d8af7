use crate::error::{BindingError, BindingErrorExt};
use crate::message::ChangeMessage;
use nexus_kernel::safe_nanoid;
use nexus_tree::{Component, ListenerId, Path, Registry};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Lifecycle of a binding session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    /// Socket accepted, target not yet resolved.
    Connecting = 0,
    Bound = 1,
    Closed = 2,
}

impl SessionState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Connecting,
            1 => Self::Bound,
            _ => Self::Closed,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "connecting",
            Self::Bound => "bound",
            Self::Closed => "closed",
        })
    }
}

/// Values pushed to the client, in notification order.
pub type Outbound = mpsc::UnboundedReceiver<Value>;

/// Keeps one region of a component model in sync with a remote client.
///
/// Every change overlapping the bound model path, whoever fired it, is pushed as the
/// current value at that path. Inbound messages are change requests relative to it.
pub struct BindingSession {
    id: String,
    component: Arc<Component>,
    model_path: Path,
    listener: ListenerId,
    state: AtomicU8,
}

impl fmt::Debug for BindingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingSession")
            .field("id", &self.id)
            .field("component", self.component.path())
            .field("model_path", &self.model_path)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl BindingSession {
    /// Binds to `model_path` inside the component at `component_path`.
    ///
    /// The current value at `model_path` is already queued on the returned receiver when
    /// this returns.
    ///
    /// # Errors
    /// [`BindingError::Tree`] when either path is malformed or the component does not exist;
    /// nothing is pushed in that case.
    pub fn open(
        registry: &Registry,
        component_path: &str,
        model_path: &str,
    ) -> Result<(Self, Outbound), BindingError> {
        let target = Path::parse(component_path).context("component path")?;
        let model_path = Path::parse(model_path).context("model path")?;
        let component = registry.lookup(&target)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let listener = component.applier().add_listener_primed(model_path.clone(), move |value| {
            // The receiver is gone once the socket task has exited.
            let _ = tx.send(value.clone());
        });

        let session = Self {
            id: safe_nanoid!(),
            component,
            model_path,
            listener,
            state: AtomicU8::new(SessionState::Bound as u8),
        };
        info!(
            session = %session.id,
            path = %session.component.path(),
            model_path = %session.model_path,
            listener = %listener,
            "Binding session opened"
        );
        Ok((session, rx))
    }

    /// Applies one inbound text message to the bound component.
    ///
    /// # Errors
    /// * [`BindingError::Closed`] once the session is closed; the model is untouched.
    /// * [`BindingError::Message`] for text that is not a change message.
    /// * [`BindingError::Tree`] for a malformed path or an unknown change type.
    pub fn receive(&self, text: &str) -> Result<(), BindingError> {
        if self.state() == SessionState::Closed {
            return Err(BindingError::Closed {
                message: format!("session {}", self.id).into(),
                context: None,
            });
        }

        let message: ChangeMessage = serde_json::from_str(text)?;
        let request = message.into_request(&self.model_path)?;
        debug!(
            session = %self.id,
            path = %request.path,
            change = %request.change_type,
            "Applying inbound change"
        );
        self.component.applier().fire_change_request(request);
        Ok(())
    }

    /// Stops pushes and inbound handling. Returns `true` for the call that closed it.
    ///
    /// No value is queued after this returns, even if a change is being applied on
    /// another thread at the same time.
    pub fn close(&self) -> bool {
        let previous = self.state.swap(SessionState::Closed as u8, Ordering::AcqRel);
        if SessionState::from_u8(previous) == SessionState::Closed {
            return false;
        }

        self.component.applier().remove_listener(self.listener);
        info!(session = %self.id, path = %self.component.path(), "Binding session closed");
        true
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn component_path(&self) -> &Path {
        self.component.path()
    }

    #[must_use]
    pub const fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Drop for BindingSession {
    fn drop(&mut self) {
        self.close();
    }
}
