//! # Event Bus
//!
//! Type-keyed broadcast channels for fan-out notifications between crates that
//! should not depend on each other. The component registry publishes lifecycle
//! events here; binding sessions and the server's audit task subscribe.
//!
//! # Example
//!
//! ```rust
//! use nexus_event_bus::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Destroyed { path: String }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<Destroyed>()?;
//!     bus.publish(Destroyed { path: "a.b".to_owned() })?;
//!
//!     let event = rx.recv_event().await.expect("bus is open");
//!     assert_eq!(event.path, "a.b");
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
