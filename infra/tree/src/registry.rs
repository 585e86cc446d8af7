use crate::component::{Component, ComponentEvent};
use crate::error::TreeError;
use crate::path::Path;
use nexus_event_bus::EventBus;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The tree of live components, keyed by absolute path.
///
/// A single lock serializes construct, destroy and lookup, so no caller ever observes a
/// half-inserted component or a half-removed subtree.
#[derive(Default)]
pub struct Registry {
    components: RwLock<BTreeMap<Path, Arc<Component>>>,
    events: Option<EventBus>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("components", &self.len())
            .field("events", &self.events.is_some())
            .finish()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that publishes [`ComponentEvent`]s on `events`.
    #[must_use]
    pub fn with_events(events: EventBus) -> Self {
        Self { components: RwLock::default(), events: Some(events) }
    }

    /// Creates a component at `path` whose model starts as `model`.
    ///
    /// # Errors
    /// * [`TreeError::PathConflict`] if a component already exists at `path`, or `path` is
    ///   the root.
    /// * [`TreeError::ParentNotFound`] if the parent is neither the root nor a component.
    pub fn construct(
        &self,
        path: Path,
        type_name: impl Into<String>,
        model: Value,
    ) -> Result<Arc<Component>, TreeError> {
        let Some(parent) = path.parent() else {
            return Err(TreeError::PathConflict {
                message: "the root is not a constructible component".into(),
                context: None,
            });
        };

        let type_name = type_name.into();
        let component = {
            let mut components = self.components.write();
            if !parent.is_root() && !components.contains_key(&parent) {
                return Err(TreeError::ParentNotFound {
                    message: format!("'{parent}'").into(),
                    context: Some(format!("constructing '{path}'").into()),
                });
            }
            if components.contains_key(&path) {
                return Err(TreeError::PathConflict {
                    message: format!("'{path}' is already occupied").into(),
                    context: None,
                });
            }

            let component = Arc::new(Component::new(path.clone(), type_name.clone(), model));
            components.insert(path.clone(), Arc::clone(&component));
            component
        };

        info!(path = %path, type_name = %type_name, "Component constructed");
        self.publish(ComponentEvent::Constructed { path, type_name });
        Ok(component)
    }

    /// Removes the component at `path` together with every descendant.
    ///
    /// Listener registrations on removed components are dropped; holders of a removed
    /// component keep a detached instance that nobody observes.
    ///
    /// # Errors
    /// Returns [`TreeError::NotFound`] if no component exists at `path`.
    pub fn destroy(&self, path: &Path) -> Result<(), TreeError> {
        let removed: Vec<Arc<Component>> = {
            let mut components = self.components.write();
            if !components.contains_key(path) {
                return Err(not_found(path));
            }

            // Descendants sort directly after their ancestor.
            let subtree: Vec<Path> = components
                .range(path.clone()..)
                .map(|(key, _)| key)
                .take_while(|key| path.is_prefix_of(key))
                .cloned()
                .collect();
            subtree.iter().filter_map(|key| components.remove(key)).collect()
        };

        for component in &removed {
            component.applier().clear();
            debug!(path = %component.path(), "Component removed");
        }
        info!(path = %path, removed = removed.len(), "Component subtree destroyed");

        for component in removed {
            self.publish(ComponentEvent::Destroyed { path: component.path().clone() });
        }
        Ok(())
    }

    /// # Errors
    /// Returns [`TreeError::NotFound`] if no component exists at `path`.
    pub fn lookup(&self, path: &Path) -> Result<Arc<Component>, TreeError> {
        self.components.read().get(path).cloned().ok_or_else(|| not_found(path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }

    /// Paths of all live components, ancestors before descendants.
    #[must_use]
    pub fn paths(&self) -> Vec<Path> {
        self.components.read().keys().cloned().collect()
    }

    /// Snapshot of all live components in path order.
    #[must_use]
    pub fn components(&self) -> Vec<Arc<Component>> {
        self.components.read().values().cloned().collect()
    }

    fn publish(&self, event: ComponentEvent) {
        let Some(events) = &self.events else { return };
        if let Err(e) = events.publish(event) {
            warn!(error = %e, "Failed to publish component event");
        }
    }
}

fn not_found(path: &Path) -> TreeError {
    TreeError::NotFound { message: format!("'{path}'").into(), context: None }
}
