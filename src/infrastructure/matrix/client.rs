//! Matrix client-server API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{ErrorResponse, PackEcho, UploadResponse};
use crate::domain::entities::{AccessToken, MessageResponse, Pack};
use crate::domain::errors::MatrixError;
use crate::domain::ports::MatrixPort;

const USER_AGENT: &str = concat!("matrix-tools/", env!("CARGO_PKG_VERSION"));
const EMOTE_PACK_EVENT_TYPE: &str = "im.ponies.room_emotes";
const LIMIT_EXCEEDED: &str = "M_LIMIT_EXCEEDED";
const UNKNOWN_ERRCODE: &str = "M_UNKNOWN";
const MESSAGES_PAGE_SIZE: &str = "50";

/// HTTP settings for [`MatrixClient`].
#[derive(Debug, Clone)]
pub struct MatrixClientConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for MatrixClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Authenticated client for a single homeserver.
pub struct MatrixClient {
    client: Client,
    base_url: Url,
    token: AccessToken,
}

impl std::fmt::Debug for MatrixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl MatrixClient {
    /// Creates client with default HTTP settings.
    ///
    /// # Errors
    /// Returns error if the URL is invalid or HTTP client creation fails.
    pub fn new(base_url: &str, token: AccessToken) -> Result<Self, MatrixError> {
        Self::with_config(base_url, token, &MatrixClientConfig::default())
    }

    /// Creates client with custom HTTP settings.
    ///
    /// # Errors
    /// Returns error if the URL is invalid or HTTP client creation fails.
    pub fn with_config(
        base_url: &str,
        token: AccessToken,
        config: &MatrixClientConfig,
    ) -> Result<Self, MatrixError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| MatrixError::invalid_url(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(MatrixError::invalid_url(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| MatrixError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, MatrixError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                MatrixError::invalid_url(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn client_endpoint(&self, segments: &[&str]) -> Result<Url, MatrixError> {
        let mut all = vec!["_matrix", "client", "v3"];
        all.extend_from_slice(segments);
        self.endpoint(&all)
    }

    fn media_endpoint(&self, segments: &[&str]) -> Result<Url, MatrixError> {
        let mut all = vec!["_matrix", "media", "v3"];
        all.extend_from_slice(segments);
        self.endpoint(&all)
    }

    fn pack_endpoint(&self, room_id: &str, pack_id: &str) -> Result<Url, MatrixError> {
        self.client_endpoint(&["rooms", room_id, "state", EMOTE_PACK_EVENT_TYPE, pack_id])
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, MatrixError> {
        request
            .header(header::AUTHORIZATION, self.token.bearer())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Request to homeserver failed");
                if e.is_timeout() {
                    MatrixError::network("request timed out")
                } else if e.is_connect() {
                    MatrixError::network(format!(
                        "failed to connect to {}",
                        self.base_url.host_str().unwrap_or("homeserver")
                    ))
                } else {
                    MatrixError::network(e.to_string())
                }
            })
    }

    /// Sends the request built by `build`, sleeping through HTTP 429 replies
    /// for as long as the server keeps sending them.
    async fn send_with_backoff<F>(&self, build: F) -> Result<Response, MatrixError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        loop {
            let response = self.send(build()).await?;
            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            let Some(retry_after) = retry_after_secs(&response) else {
                return Err(MatrixError::RateLimitedWithoutRetry);
            };
            warn!(retry_after, "Moving too fast, waiting before retrying");
            tokio::time::sleep(Duration::from_secs(retry_after.saturating_add(1))).await;
        }
    }

    async fn read_body(response: Response) -> Result<Bytes, MatrixError> {
        response
            .bytes()
            .await
            .map_err(|e| MatrixError::network(format!("failed to read response body: {e}")))
    }

    async fn error_from_response(status: StatusCode, response: Response) -> MatrixError {
        let body = Self::read_body(response).await.unwrap_or_default();
        match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(error) if !error.errcode.is_empty() => {
                MatrixError::server(Some(status.as_u16()), error.errcode, error.error)
            }
            _ => MatrixError::server(
                Some(status.as_u16()),
                UNKNOWN_ERRCODE,
                format!("unexpected response: HTTP {status}"),
            ),
        }
    }

    async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, MatrixError> {
        let body = Self::read_body(response).await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse homeserver response");
            MatrixError::decode(e.to_string())
        })
    }
}

/// Reads `Retry-After` in seconds. A present but unparsable value counts as zero.
fn retry_after_secs(response: &Response) -> Option<u64> {
    let value = response.headers().get(header::RETRY_AFTER)?;
    Some(
        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0),
    )
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn merge_echo(mut pack: Pack, echo: PackEcho) -> Pack {
    if let Some(images) = echo.images {
        pack.images.extend(images);
    }
    if let Some(info) = echo.pack {
        pack.pack = info;
    }
    pack
}

#[async_trait]
impl MatrixPort for MatrixClient {
    async fn get_emote_pack(&self, room_id: &str, pack_id: &str) -> Result<Pack, MatrixError> {
        let url = self.pack_endpoint(room_id, pack_id)?;

        debug!(room_id, pack_id, "Fetching emote pack");

        let response = self.send(self.client.get(url)).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(pack_id, "Emote pack does not exist yet");
            return Ok(Pack::default());
        }
        if !status.is_success() {
            return Err(Self::error_from_response(status, response).await);
        }

        let body = Self::read_body(response).await?;
        if is_blank(&body) {
            return Ok(Pack::default());
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse emote pack");
            MatrixError::decode(format!("invalid emote pack: {e}"))
        })
    }

    async fn put_emote_pack(
        &self,
        room_id: &str,
        pack_id: &str,
        pack: Pack,
    ) -> Result<Pack, MatrixError> {
        let url = self.pack_endpoint(room_id, pack_id)?;

        debug!(room_id, pack_id, images = pack.images.len(), "Storing emote pack");

        let response = self.send(self.client.put(url).json(&pack)).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_from_response(status, response).await);
        }

        let body = Self::read_body(response).await?;
        if is_blank(&body) {
            return Ok(pack);
        }

        let echo: PackEcho = serde_json::from_slice(&body)
            .map_err(|e| MatrixError::decode(format!("invalid state response: {e}")))?;

        Ok(merge_echo(pack, echo))
    }

    async fn upload_file(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Bytes,
    ) -> Result<String, MatrixError> {
        let mut url = self.media_endpoint(&["upload"])?;
        url.query_pairs_mut().append_pair("filename", file_name);

        loop {
            debug!(file_name, mime_type, size = data.len(), "Uploading media");

            let request = self
                .client
                .post(url.clone())
                .header(header::CONTENT_TYPE, mime_type)
                .body(data.clone());
            let response = self.send(request).await?;
            let status = response.status();
            let body = Self::read_body(response).await?;

            let upload: UploadResponse = match serde_json::from_slice(&body) {
                Ok(upload) => upload,
                Err(e) if status.is_success() => {
                    return Err(MatrixError::decode(format!("invalid upload response: {e}")));
                }
                Err(_) => {
                    return Err(MatrixError::server(
                        Some(status.as_u16()),
                        UNKNOWN_ERRCODE,
                        format!("unexpected response: HTTP {status}"),
                    ));
                }
            };

            match upload.errcode.as_deref() {
                Some(LIMIT_EXCEEDED) => {
                    let Some(retry_after_ms) = upload.retry_after_ms else {
                        return Err(MatrixError::RateLimitedWithoutRetry);
                    };
                    warn!(file_name, retry_after_ms, "Upload rate limited, waiting before retrying");
                    tokio::time::sleep(Duration::from_millis(retry_after_ms)).await;
                }
                Some(errcode) => {
                    return Err(MatrixError::server(
                        Some(status.as_u16()),
                        errcode,
                        upload.error.unwrap_or_default(),
                    ));
                }
                None => {
                    return upload
                        .content_uri
                        .ok_or_else(|| MatrixError::decode("upload response has no content_uri"));
                }
            }
        }
    }

    async fn get_room_events(
        &self,
        room_id: &str,
        since: &str,
    ) -> Result<MessageResponse, MatrixError> {
        let mut url = self.client_endpoint(&["rooms", room_id, "messages"])?;
        if !since.is_empty() {
            url.query_pairs_mut()
                .append_pair("from", since)
                .append_pair("limit", MESSAGES_PAGE_SIZE);
        }

        debug!(room_id, since, "Fetching room events");

        let response = self
            .send_with_backoff(|| self.client.get(url.clone()))
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_from_response(status, response).await);
        }

        Self::decode_json(response).await
    }

    async fn redact_event(
        &self,
        room_id: &str,
        event_id: &str,
        txn_id: &str,
    ) -> Result<(), MatrixError> {
        let url = self.client_endpoint(&["rooms", room_id, "redact", event_id, txn_id])?;

        debug!(room_id, event_id, txn_id, "Redacting event");

        let response = self
            .send_with_backoff(|| {
                self.client
                    .put(url.clone())
                    .json(&serde_json::Map::<String, serde_json::Value>::new())
            })
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_from_response(status, response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use std::time::Instant;

    const TOKEN: &str = "syt_test_token_value";
    const ROOM: &str = "!room:example.org";

    fn client_for(server: &ServerGuard) -> MatrixClient {
        MatrixClient::new(&server.url(), AccessToken::new(TOKEN).unwrap()).unwrap()
    }

    fn pack_path(pack_id: &str) -> String {
        format!("/_matrix/client/v3/rooms/{ROOM}/state/im.ponies.room_emotes/{pack_id}")
    }

    #[test]
    fn test_client_creation() {
        let client = MatrixClient::new("https://matrix.example.org", AccessToken::new(TOKEN).unwrap());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let client = MatrixClient::new("not a url", AccessToken::new(TOKEN).unwrap());
        assert!(matches!(client, Err(MatrixError::InvalidUrl { .. })));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client =
            MatrixClient::new("https://matrix.example.org/", AccessToken::new(TOKEN).unwrap()).unwrap();
        let url = client.pack_endpoint(ROOM, "My Pack/2").unwrap();
        assert_eq!(
            url.as_str(),
            "https://matrix.example.org/_matrix/client/v3/rooms/!room:example.org/state/im.ponies.room_emotes/My%20Pack%2F2"
        );
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client =
            MatrixClient::new("https://matrix.example.org", AccessToken::new(TOKEN).unwrap()).unwrap();
        assert!(!format!("{client:?}").contains(TOKEN));
    }

    #[tokio::test]
    async fn test_get_emote_pack() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", pack_path("Blobs").as_str())
            .match_header("authorization", format!("Bearer {TOKEN}").as_str())
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"images":{"blob":{"url":"mxc://example.org/b","usage":["emoticon"]}},"pack":{"display_name":"Blobs"}}"#,
            )
            .create_async()
            .await;

        let pack = client_for(&server).get_emote_pack(ROOM, "Blobs").await.unwrap();

        mock.assert_async().await;
        assert_eq!(pack.pack.display_name, "Blobs");
        assert_eq!(pack.images["blob"].url, "mxc://example.org/b");
    }

    #[tokio::test]
    async fn test_get_missing_pack_is_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", pack_path("New").as_str())
            .with_status(404)
            .with_body(r#"{"errcode":"M_NOT_FOUND","error":"Event not found."}"#)
            .create_async()
            .await;

        let pack = client_for(&server).get_emote_pack(ROOM, "New").await.unwrap();

        assert_eq!(pack, Pack::default());
    }

    #[tokio::test]
    async fn test_get_empty_body_is_empty_pack() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", pack_path("Empty").as_str())
            .with_body("")
            .create_async()
            .await;

        let pack = client_for(&server).get_emote_pack(ROOM, "Empty").await.unwrap();

        assert_eq!(pack, Pack::default());
    }

    #[tokio::test]
    async fn test_get_malformed_pack_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", pack_path("Bad").as_str())
            .with_body(r#"{"images": ["#)
            .create_async()
            .await;

        let result = client_for(&server).get_emote_pack(ROOM, "Bad").await;

        assert!(matches!(result, Err(MatrixError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_get_forbidden_surfaces_errcode() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", pack_path("Blobs").as_str())
            .with_status(403)
            .with_body(r#"{"errcode":"M_FORBIDDEN","error":"You are not in this room."}"#)
            .create_async()
            .await;

        let err = client_for(&server).get_emote_pack(ROOM, "Blobs").await.unwrap_err();

        assert_eq!(err.errcode(), Some("M_FORBIDDEN"));
    }

    #[tokio::test]
    async fn test_put_emote_pack_keeps_pack_on_event_id_reply() {
        let mut server = Server::new_async().await;
        let mut pack = Pack::default();
        pack.pack.display_name = "Blobs".to_string();

        let mock = server
            .mock("PUT", pack_path("Blobs").as_str())
            .match_header("authorization", format!("Bearer {TOKEN}").as_str())
            .match_body(Matcher::Json(serde_json::json!({
                "images": {},
                "pack": { "display_name": "Blobs" }
            })))
            .with_body(r#"{"event_id":"$abc"}"#)
            .create_async()
            .await;

        let stored = client_for(&server)
            .put_emote_pack(ROOM, "Blobs", pack.clone())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(stored, pack);
    }

    #[tokio::test]
    async fn test_put_emote_pack_merges_echo() {
        let mut server = Server::new_async().await;
        let mut pack = Pack::default();
        pack.pack.display_name = "Blobs".to_string();

        server
            .mock("PUT", pack_path("Blobs").as_str())
            .with_body(
                r#"{"images":{"extra":{"url":"mxc://example.org/e"}},"pack":{"display_name":"Server Name"}}"#,
            )
            .create_async()
            .await;

        let stored = client_for(&server)
            .put_emote_pack(ROOM, "Blobs", pack)
            .await
            .unwrap();

        assert!(stored.contains_image("extra"));
        assert_eq!(stored.pack.display_name, "Server Name");
    }

    #[tokio::test]
    async fn test_upload_file() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/_matrix/media/v3/upload")
            .match_query(Matcher::UrlEncoded("filename".into(), "smile face.png".into()))
            .match_header("content-type", "image/png")
            .match_header("authorization", format!("Bearer {TOKEN}").as_str())
            .match_body("png-bytes")
            .with_body(r#"{"content_uri":"mxc://example.org/smile"}"#)
            .expect(1)
            .create_async()
            .await;

        let url = client_for(&server)
            .upload_file("smile face.png", "image/png", Bytes::from_static(b"png-bytes"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(url, "mxc://example.org/smile");
    }

    #[tokio::test]
    async fn test_upload_retries_after_limit_exceeded() {
        let mut server = Server::new_async().await;
        let limited = server
            .mock("POST", "/_matrix/media/v3/upload")
            .match_query(Matcher::UrlEncoded("filename".into(), "y.png".into()))
            .with_status(429)
            .with_body(r#"{"errcode":"M_LIMIT_EXCEEDED","retry_after_ms":50}"#)
            .expect(1)
            .create_async()
            .await;
        let accepted = server
            .mock("POST", "/_matrix/media/v3/upload")
            .match_query(Matcher::UrlEncoded("filename".into(), "y.png".into()))
            .with_body(r#"{"content_uri":"mxc://x/y"}"#)
            .expect(1)
            .create_async()
            .await;

        let started = Instant::now();
        let url = client_for(&server)
            .upload_file("y.png", "image/png", Bytes::from_static(b"data"))
            .await
            .unwrap();

        assert_eq!(url, "mxc://x/y");
        assert!(started.elapsed() >= Duration::from_millis(50));
        limited.assert_async().await;
        accepted.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_other_errcode_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/_matrix/media/v3/upload")
            .match_query(Matcher::Any)
            .with_status(413)
            .with_body(r#"{"errcode":"M_TOO_LARGE","error":"Upload too large"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .upload_file("big.png", "image/png", Bytes::from_static(b"data"))
            .await
            .unwrap_err();

        assert_eq!(err.errcode(), Some("M_TOO_LARGE"));
    }

    #[tokio::test]
    async fn test_upload_limit_without_retry_time_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/_matrix/media/v3/upload")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"errcode":"M_LIMIT_EXCEEDED"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .upload_file("a.png", "image/png", Bytes::from_static(b"data"))
            .await
            .unwrap_err();

        assert!(err.is_rate_limit());
    }

    #[tokio::test]
    async fn test_get_room_events_first_page_has_no_cursor() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", format!("/_matrix/client/v3/rooms/{ROOM}/messages").as_str())
            .match_query(Matcher::Missing)
            .with_body(
                r#"{"chunk":[{"room_id":"!room:example.org","event_id":"$e1","type":"m.room.message","content":{"body":"hi"}}],"start":"s0","end":"c1"}"#,
            )
            .create_async()
            .await;

        let page = client_for(&server).get_room_events(ROOM, "").await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.chunk.len(), 1);
        assert_eq!(page.chunk[0].event_id, "$e1");
        assert_eq!(page.next_cursor(), Some("c1"));
    }

    #[tokio::test]
    async fn test_get_room_events_with_cursor() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", format!("/_matrix/client/v3/rooms/{ROOM}/messages").as_str())
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), "t1-2_3".into()),
                Matcher::UrlEncoded("limit".into(), "50".into()),
            ]))
            .with_body(r#"{"chunk":[],"start":"t1-2_3"}"#)
            .create_async()
            .await;

        let page = client_for(&server).get_room_events(ROOM, "t1-2_3").await.unwrap();

        mock.assert_async().await;
        assert!(page.chunk.is_empty());
        assert_eq!(page.next_cursor(), None);
    }

    #[tokio::test]
    async fn test_get_room_events_waits_out_429() {
        let mut server = Server::new_async().await;
        let path = format!("/_matrix/client/v3/rooms/{ROOM}/messages");
        let limited = server
            .mock("GET", path.as_str())
            .with_status(429)
            .with_header("retry-after", "0")
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("GET", path.as_str())
            .with_body(r#"{"chunk":[]}"#)
            .expect(1)
            .create_async()
            .await;

        let started = Instant::now();
        let page = client_for(&server).get_room_events(ROOM, "").await.unwrap();

        assert!(page.chunk.is_empty());
        assert!(started.elapsed() >= Duration::from_secs(1));
        limited.assert_async().await;
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn test_429_without_retry_after_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", format!("/_matrix/client/v3/rooms/{ROOM}/messages").as_str())
            .with_status(429)
            .create_async()
            .await;

        let err = client_for(&server).get_room_events(ROOM, "").await.unwrap_err();

        assert!(matches!(err, MatrixError::RateLimitedWithoutRetry));
    }

    #[tokio::test]
    async fn test_redact_event() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock(
                "PUT",
                format!("/_matrix/client/v3/rooms/{ROOM}/redact/$e1:example.org/redact_42").as_str(),
            )
            .match_header("authorization", format!("Bearer {TOKEN}").as_str())
            .match_body(Matcher::Json(serde_json::json!({})))
            .with_body(r#"{"event_id":"$r1"}"#)
            .expect(1)
            .create_async()
            .await;

        client_for(&server)
            .redact_event(ROOM, "$e1:example.org", "redact_42")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_redact_forbidden_fails() {
        let mut server = Server::new_async().await;
        server
            .mock(
                "PUT",
                format!("/_matrix/client/v3/rooms/{ROOM}/redact/$e1/redact_1").as_str(),
            )
            .with_status(403)
            .with_body(r#"{"errcode":"M_FORBIDDEN","error":"Not allowed"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .redact_event(ROOM, "$e1", "redact_1")
            .await
            .unwrap_err();

        assert_eq!(err.errcode(), Some("M_FORBIDDEN"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client =
            MatrixClient::new("http://127.0.0.1:9", AccessToken::new(TOKEN).unwrap()).unwrap();

        let err = client.get_emote_pack(ROOM, "x").await.unwrap_err();

        assert!(err.is_network_error());
    }
}
