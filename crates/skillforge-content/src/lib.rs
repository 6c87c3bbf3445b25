//! Content-addressed pinning for course material, certificate images, and
//! generated metadata.
//!
//! The store is append-only and keyed by content hash, so pinning is
//! idempotent: identical bytes always resolve to the same [`ContentId`].
//! There is no unpin in this core; content orphaned by a failed ledger
//! write is inert and a retried pin lands on the same id.

#![deny(unsafe_code)]

mod gateway;
mod http;
mod memory;
mod store;

pub use gateway::GatewayConfig;
pub use http::{HttpPinningClient, PinningCredentials};
pub use memory::InMemoryContentStore;
pub use store::{ContentError, ContentStore};
