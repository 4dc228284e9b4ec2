mod error;
mod resource;
mod store;
mod transport;
mod view;

#[cfg(feature = "emitter")]
mod emitter;

pub use error::{ErrorKind, StoreError};
pub use resource::{InsertPosition, Resource};
pub use store::{LoadState, ResourceStore};
pub use transport::{InMemoryTransport, Query, Transport, TransportError};
pub use view::{cart_total, most_recent, page, page_count};

#[cfg(feature = "emitter")]
pub use emitter::ChangeFeed;

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
