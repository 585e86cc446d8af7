use axum::extract::FromRef;
use nexus_domain::config::ApiConfig;
use nexus_event_bus::EventBus;
use nexus_tree::{DefaultsStore, Registry};
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[nexus_derive::nexus_error]
pub enum ApiStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Everything the handlers share: one registry and one defaults store per process.
#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub registry: Arc<Registry>,
    pub defaults: Arc<DefaultsStore>,
    pub events: EventBus,
}

#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<ApiState> for Arc<Registry> {
    fn from_ref(state: &ApiState) -> Self {
        Arc::clone(&state.inner.registry)
    }
}

impl FromRef<ApiState> for Arc<DefaultsStore> {
    fn from_ref(state: &ApiState) -> Self {
        Arc::clone(&state.inner.defaults)
    }
}

impl FromRef<ApiState> for EventBus {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.events.clone()
    }
}

#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    registry: Option<Arc<Registry>>,
    defaults: Option<Arc<DefaultsStore>>,
    events: Option<EventBus>,
}

impl ApiStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shares an existing registry; it should publish on the same bus given to [`Self::events`].
    #[must_use]
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn defaults(mut self, defaults: Arc<DefaultsStore>) -> Self {
        self.defaults = Some(defaults);
        self
    }

    #[must_use]
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Missing parts are created fresh; a fresh registry publishes on the state's bus.
    ///
    /// # Errors
    /// Returns [`ApiStateError::Validation`] when no configuration was provided.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let config = self.config.ok_or_else(|| ApiStateError::Validation {
            message: "ApiConfig not provided".into(),
            context: None,
        })?;
        let events = self.events.unwrap_or_default();
        let registry =
            self.registry.unwrap_or_else(|| Arc::new(Registry::with_events(events.clone())));
        let defaults = self.defaults.unwrap_or_default();

        Ok(ApiState { inner: Arc::new(ApiStateInner { config, registry, defaults, events }) })
    }
}
