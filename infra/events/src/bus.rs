use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Lifecycle notifications are small and bursty (a subtree destroy emits one per node).
const DEFAULT_CAPACITY: usize = 256;
const MIN_CAPACITY: usize = 1;

/// Marker trait for types that can be sent across the [`EventBus`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct Channel {
    capacity: usize,
    sender: Box<dyn Any + Send + Sync>,
}

impl Channel {
    fn new<T: Event>(capacity: usize) -> Self {
        trace!(event = type_name::<T>(), capacity, "Initializing new event channel");
        let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
        Self { capacity, sender: Box::new(tx) }
    }

    fn sender<T: Event>(&self) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        self.sender.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(|| {
            EventBusError::TypeMismatch {
                message: type_name::<T>().into(),
                context: Some("Unexpected event type".into()),
            }
        })
    }
}

/// A thread-safe fan-out event bus.
///
/// One broadcast channel per event type, created lazily on first use. Cloning the bus
/// is cheap and every clone shares the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, Channel>>>,
}

impl EventBus {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events of type `T`.
    ///
    /// Only events published after this call are observed.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the channel registry is corrupted.
    ///
    /// # Examples
    /// ```rust
    /// use nexus_event_bus::{EventBus, EventReceiverExt};
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct Constructed(&'static str);
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), nexus_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let mut rx = bus.subscribe::<Constructed>()?;
    /// bus.publish(Constructed("dev1"))?;
    /// assert_eq!(rx.recv_event().await.unwrap().0, "dev1");
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes with an explicit buffer capacity.
    ///
    /// The capacity only applies when this call creates the channel; later callers
    /// share the existing buffer.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] if `capacity` is zero.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        let capacity = validate_capacity(capacity)?;
        Ok(self.sender::<T>(capacity)?.subscribe())
    }

    /// Publishes an event to every current subscriber of `T`.
    ///
    /// Returns the number of subscribers that received it; zero when nobody listens.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the channel registry is corrupted.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Publishes a shared event instance without re-wrapping.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the channel registry is corrupted.
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(DEFAULT_CAPACITY)?;
        Ok(sender.send(event).map_or_else(
            |_| {
                trace!(event = type_name::<T>(), "Event dropped: no active subscribers");
                0
            },
            |count| {
                trace!(event = type_name::<T>(), count, "Event dispatched");
                count
            },
        ))
    }

    /// Drops every channel; subscribers observe `Closed` once drained.
    ///
    /// Returns the number of event channels that were closed.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn sender<T: Event>(&self, capacity: usize) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();

        if let Some(channel) = self.channels.read().get(&id) {
            if channel.capacity != capacity && capacity != DEFAULT_CAPACITY {
                warn!(
                    event = type_name::<T>(),
                    existing_capacity = channel.capacity,
                    requested_capacity = capacity,
                    "Broadcast channel already initialized with a different capacity"
                );
            }
            return channel.sender::<T>();
        }

        self.channels.write().entry(id).or_insert_with(|| Channel::new::<T>(capacity)).sender::<T>()
    }
}

fn validate_capacity(capacity: usize) -> Result<usize, EventBusError> {
    if capacity < MIN_CAPACITY {
        return Err(EventBusError::InvalidCapacity {
            message: format!("capacity must be >= {MIN_CAPACITY}").into(),
            context: None,
        });
    }
    Ok(capacity)
}
