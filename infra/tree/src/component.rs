use crate::applier::Applier;
use crate::path::Path;
use serde_json::Value;

/// A live instance in the registry. Its model is only reachable through the [`Applier`].
#[derive(Debug)]
pub struct Component {
    path: Path,
    type_name: String,
    applier: Applier,
}

impl Component {
    pub(crate) fn new(path: Path, type_name: String, model: Value) -> Self {
        Self { path, type_name, applier: Applier::new(model) }
    }

    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub const fn applier(&self) -> &Applier {
        &self.applier
    }

    /// Snapshot of the current model.
    #[must_use]
    pub fn model(&self) -> Value {
        self.applier.model()
    }
}

/// Lifecycle notifications published on the event bus by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentEvent {
    Constructed { path: Path, type_name: String },
    /// One per removed component, descendants included.
    Destroyed { path: Path },
}

impl ComponentEvent {
    #[must_use]
    pub const fn path(&self) -> &Path {
        match self {
            Self::Constructed { path, .. } | Self::Destroyed { path } => path,
        }
    }
}
