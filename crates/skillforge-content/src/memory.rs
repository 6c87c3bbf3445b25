use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use skillforge_types::ContentId;

use crate::store::{ContentError, ContentStore};

/// In-memory content store used for tests, local demos, and embedding.
///
/// Ids are derived from the blake3 hash of the blob, so the idempotence
/// contract holds structurally: re-pinning identical bytes dedups to the
/// same entry.
#[derive(Default)]
pub struct InMemoryContentStore {
    blobs: RwLock<HashMap<ContentId, Vec<u8>>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a pinned blob by id. Test observability; the production
    /// retrieval path is the public gateway.
    pub async fn get(&self, id: &ContentId) -> Option<Vec<u8>> {
        self.blobs.read().await.get(id).cloned()
    }

    /// Number of distinct blobs pinned.
    pub async fn blob_count(&self) -> usize {
        self.blobs.read().await.len()
    }

    fn address(bytes: &[u8]) -> ContentId {
        ContentId::new(blake3::hash(bytes).to_hex().to_string())
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn pin(&self, bytes: &[u8]) -> Result<ContentId, ContentError> {
        let id = Self::address(bytes);
        let mut blobs = self.blobs.write().await;
        if blobs.insert(id.clone(), bytes.to_vec()).is_none() {
            debug!(content_id = %id, size = bytes.len(), "blob pinned");
        }
        Ok(id)
    }
}
