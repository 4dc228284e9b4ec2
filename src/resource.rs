use serde::{de::DeserializeOwned, Serialize};

/// Where a freshly confirmed item lands in the cached collection.
///
/// The policy is a compile-time constant per resource type so it cannot
/// drift between call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// New items go to the front (recent-first screens such as reviews).
    Prepend,
    /// New items go to the back.
    Append,
}

/// Trait for server-owned record types the store can cache.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection endpoint for this resource type (e.g. "/reviews",
    /// "/cart-items"). Item requests append "/{id}".
    const ENDPOINT: &'static str;

    /// Insert policy for items confirmed by `create`.
    const INSERT: InsertPosition = InsertPosition::Append;

    /// Returns the stable, unique identifier for this item.
    fn id(&self) -> &str;
}
