//! ResourceStore - locally cached, eventually consistent view of a
//! server-owned resource collection.
//!
//! One generic store is instantiated per resource type; the resource
//! supplies its endpoint, id field, and insert policy through the
//! [`Resource`](crate::Resource) trait.
//!
//! ## Example
//!
//! ```ignore
//! use optistore::{InMemoryTransport, Query, Resource, ResourceStore};
//!
//! #[derive(Serialize, Deserialize, Clone)]
//! struct Review {
//!     pub id: String,
//!     pub body: String,
//!     pub rating: u8,
//! }
//!
//! impl Resource for Review {
//!     const ENDPOINT: &'static str = "/reviews";
//!     fn id(&self) -> &str { &self.id }
//! }
//!
//! let store: ResourceStore<Review, _> = ResourceStore::new(transport);
//! store.fetch_all(Query::new().with("rating", 5)).await;
//! let created = store.create(&draft).await?;
//! store.update(created.id(), &patch).await?;
//! ```

mod patch;
mod resource_store;

/// Ambient request status shared by every operation of one store.
///
/// Each operation's own `Result` is the precise per-call status; this flag
/// aggregates over in-flight operations for coarse UI signals (spinners,
/// banners).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No operation in flight, last operation succeeded (or none ran yet).
    Idle,
    /// At least one operation is in flight.
    Loading,
    /// No operation in flight and the last settled operation failed.
    Error,
}

pub use resource_store::ResourceStore;
