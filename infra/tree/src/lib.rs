//! # Tree
//!
//! The component tree behind Nexus: hierarchical [`Path`]s, the [`Registry`] of live
//! components, and the per-component [`Applier`] through which every model change flows
//! and is propagated to listeners.
//!
//! ```rust
//! use nexus_tree::{ChangeRequest, Path, Registry};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), nexus_tree::TreeError> {
//! let registry = Registry::new();
//! let light = registry.construct(Path::parse("dev1")?, "Light", json!({"brightness": 50}))?;
//!
//! light.applier().fire_change_request(ChangeRequest::set(Path::parse("brightness")?, json!(80)));
//! assert_eq!(registry.lookup(&Path::parse("dev1")?)?.model(), json!({"brightness": 80}));
//! # Ok(())
//! # }
//! ```

mod applier;
mod change;
mod component;
mod defaults;
mod error;
pub mod path;
mod registry;
pub mod value;

pub use applier::{Applier, Callback, ListenerId};
pub use change::{ChangeRequest, ChangeType};
pub use component::{Component, ComponentEvent};
pub use defaults::{DefaultsStore, MODEL_KEY};
pub use error::{TreeError, TreeErrorExt};
pub use path::Path;
pub use registry::Registry;
