use bytes::Bytes;
use tokio::sync::RwLock;

/// Single-slot cache of the most recent upload response body.
///
/// Holds the serialized JSON, so readers get exactly the bytes the upload
/// returned. Last writer wins.
#[derive(Debug, Default)]
pub struct ResultStore {
    latest: RwLock<Option<Bytes>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, body: Bytes) {
        *self.latest.write().await = Some(body);
    }

    pub async fn latest(&self) -> Option<Bytes> {
        self.latest.read().await.clone()
    }
}
