//! Matrix client-server API port.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::{MessageResponse, Pack};
use crate::domain::errors::MatrixError;
use crate::domain::pack_id::encode_pack_id;

/// Operations the tools need from a homeserver.
///
/// Rate limiting is handled inside implementations: callers never see a
/// throttled response unless the server gave no retry time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatrixPort: Send + Sync {
    /// Derives the state key for a pack name.
    fn encode_pack_id(&self, pack_name: &str) -> String {
        encode_pack_id(pack_name)
    }

    /// Fetches the emote pack stored under `pack_id`, empty if there is none.
    async fn get_emote_pack(&self, room_id: &str, pack_id: &str) -> Result<Pack, MatrixError>;

    /// Stores the pack and returns it merged with the server's reply.
    async fn put_emote_pack(
        &self,
        room_id: &str,
        pack_id: &str,
        pack: Pack,
    ) -> Result<Pack, MatrixError>;

    /// Uploads media and returns its `mxc://` content URL.
    async fn upload_file(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Bytes,
    ) -> Result<String, MatrixError>;

    /// Fetches a page of room history starting at `since`, or the latest page when empty.
    async fn get_room_events(
        &self,
        room_id: &str,
        since: &str,
    ) -> Result<MessageResponse, MatrixError>;

    /// Redacts an event. `txn_id` lets the server drop duplicate requests.
    async fn redact_event(
        &self,
        room_id: &str,
        event_id: &str,
        txn_id: &str,
    ) -> Result<(), MatrixError>;
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory homeserver holding a single pack.
    #[derive(Default)]
    pub struct FakeMatrix {
        pack: Arc<RwLock<Option<Pack>>>,
        uploads: Arc<RwLock<Vec<(String, String)>>>,
        failing_uploads: HashSet<String>,
        fail_get: bool,
    }

    impl FakeMatrix {
        /// Creates a server with no stored pack.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a server that already stores `pack`.
        pub fn with_pack(pack: Pack) -> Self {
            Self {
                pack: Arc::new(RwLock::new(Some(pack))),
                ..Self::default()
            }
        }

        /// Makes uploads of `file_name` fail.
        pub fn failing_upload(mut self, file_name: &str) -> Self {
            self.failing_uploads.insert(file_name.to_string());
            self
        }

        /// Makes pack fetches fail.
        pub fn failing_get(mut self) -> Self {
            self.fail_get = true;
            self
        }

        /// Returns `(file_name, mime_type)` of every upload, in order.
        pub async fn uploads(&self) -> Vec<(String, String)> {
            self.uploads.read().await.clone()
        }

        /// Returns the stored pack.
        pub async fn stored_pack(&self) -> Option<Pack> {
            self.pack.read().await.clone()
        }
    }

    #[async_trait]
    impl MatrixPort for FakeMatrix {
        async fn get_emote_pack(&self, _room_id: &str, _pack_id: &str) -> Result<Pack, MatrixError> {
            if self.fail_get {
                return Err(MatrixError::network("connection refused"));
            }
            Ok(self.pack.read().await.clone().unwrap_or_default())
        }

        async fn put_emote_pack(
            &self,
            _room_id: &str,
            _pack_id: &str,
            pack: Pack,
        ) -> Result<Pack, MatrixError> {
            *self.pack.write().await = Some(pack.clone());
            Ok(pack)
        }

        async fn upload_file(
            &self,
            file_name: &str,
            mime_type: &str,
            _data: Bytes,
        ) -> Result<String, MatrixError> {
            if self.failing_uploads.contains(file_name) {
                return Err(MatrixError::server(Some(413), "M_TOO_LARGE", "file too large"));
            }
            let mut uploads = self.uploads.write().await;
            uploads.push((file_name.to_string(), mime_type.to_string()));
            Ok(format!("mxc://fake.server/{}", uploads.len()))
        }

        async fn get_room_events(
            &self,
            _room_id: &str,
            _since: &str,
        ) -> Result<MessageResponse, MatrixError> {
            Ok(MessageResponse::default())
        }

        async fn redact_event(
            &self,
            _room_id: &str,
            _event_id: &str,
            _txn_id: &str,
        ) -> Result<(), MatrixError> {
            Ok(())
        }
    }
}
