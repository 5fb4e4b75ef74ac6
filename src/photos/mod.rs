//! Google Photos Library API client — the `mediaItems.list` listing call and
//! the page walker that turns its continuation tokens into a lazy stream of
//! item batches.

mod error;
pub mod types;

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use reqwest::Client;

pub use error::ListingError;
pub use types::{MediaItem, MediaItemsPage};

/// Production API endpoint. Tests inject a mock server instead.
const ENDPOINT: &str = "https://photoslibrary.googleapis.com";

/// Minimal listing surface the download engine depends on. A trait so tests
/// can drive the page walker without a network.
#[async_trait]
pub trait MediaItemsApi: Send + Sync {
    /// One `mediaItems.list` call: up to `page_size` items plus an opaque
    /// continuation token. An absent token signals the terminal page.
    async fn list(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<MediaItemsPage, ListingError>;
}

/// Authenticated `reqwest` implementation of [`MediaItemsApi`].
pub struct PhotosClient {
    http: Client,
    endpoint: String,
    access_token: String,
}

impl PhotosClient {
    pub fn new(http: Client, access_token: String) -> Self {
        Self::with_endpoint(http, ENDPOINT.to_string(), access_token)
    }

    /// Endpoint override, used by tests to point at a mock server.
    pub fn with_endpoint(http: Client, endpoint: String, access_token: String) -> Self {
        Self {
            http,
            endpoint,
            access_token,
        }
    }
}

#[async_trait]
impl MediaItemsApi for PhotosClient {
    async fn list(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<MediaItemsPage, ListingError> {
        let url = format!("{}/v1/mediaItems", self.endpoint);
        let mut request = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("pageSize", page_size.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Lazily page through the listing API.
///
/// Finite and single-pass: each poll issues one `list` call, and the stream
/// ends once the service reports no continuation token. The zero-page case
/// (empty first page, no token) yields one empty batch and then ends.
pub fn page_stream(
    api: &dyn MediaItemsApi,
    page_size: u32,
) -> impl Stream<Item = Result<Vec<MediaItem>, ListingError>> + '_ {
    // State is Some(token-to-send) while pages remain, None once the
    // terminal page has been consumed. The very first call sends no token.
    stream::try_unfold(Some(None::<String>), move |state| async move {
        let Some(token) = state else {
            return Ok(None);
        };
        let page = api.list(page_size, token.as_deref()).await?;
        tracing::debug!(
            items = page.media_items.len(),
            has_next = page.next_page_token.is_some(),
            "fetched listing page"
        );
        let next_state = page.next_page_token.map(Some);
        Ok(Some((page.media_items, next_state)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Canned-page API: records the token of every call and pops pages off a
    /// queue.
    struct FakeApi {
        pages: Mutex<VecDeque<Result<MediaItemsPage, ListingError>>>,
        seen_tokens: Mutex<Vec<Option<String>>>,
    }

    impl FakeApi {
        fn new(pages: Vec<Result<MediaItemsPage, ListingError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                seen_tokens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MediaItemsApi for FakeApi {
        async fn list(
            &self,
            _page_size: u32,
            page_token: Option<&str>,
        ) -> Result<MediaItemsPage, ListingError> {
            self.seen_tokens
                .lock()
                .unwrap()
                .push(page_token.map(str::to_string));
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .expect("walker requested more pages than canned")
        }
    }

    fn item(id: &str) -> MediaItem {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "filename": format!("{id}.jpg"),
            "mimeType": "image/jpeg",
            "baseUrl": format!("https://lh3.example/{id}"),
            "mediaMetadata": {"creationTime": "2023-05-10T08:15:30Z"}
        }))
        .unwrap()
    }

    fn page(ids: &[&str], next: Option<&str>) -> MediaItemsPage {
        MediaItemsPage {
            media_items: ids.iter().map(|id| item(id)).collect(),
            next_page_token: next.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_walks_finite_token_chain() {
        let api = FakeApi::new(vec![
            Ok(page(&["a", "b"], Some("t1"))),
            Ok(page(&["c"], Some("t2"))),
            Ok(page(&["d"], None)),
        ]);

        let batches: Vec<_> = page_stream(&api, 100).collect().await;
        assert_eq!(batches.len(), 3);
        let sizes: Vec<usize> = batches
            .iter()
            .map(|b| b.as_ref().unwrap().len())
            .collect();
        assert_eq!(sizes, vec![2, 1, 1]);

        let tokens = api.seen_tokens.lock().unwrap().clone();
        assert_eq!(
            tokens,
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_zero_page_case() {
        let api = FakeApi::new(vec![Ok(MediaItemsPage::default())]);

        let batches: Vec<_> = page_stream(&api, 100).collect().await;
        assert_eq!(batches.len(), 1);
        assert!(batches[0].as_ref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_error_ends_stream() {
        let api = FakeApi::new(vec![
            Ok(page(&["a"], Some("t1"))),
            Err(ListingError::Status {
                status: 500,
                body: "boom".into(),
            }),
        ]);

        let stream = page_stream(&api, 100);
        tokio::pin!(stream);
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_client_sends_page_token_and_bearer() {
        use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/mediaItems"))
            .and(header("authorization", "Bearer test-token"))
            .and(query_param("pageSize", "100"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "mediaItems": [],
                "nextPageToken": "t1"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/mediaItems"))
            .and(query_param("pageToken", "t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = PhotosClient::with_endpoint(
            Client::new(),
            server.uri(),
            "test-token".to_string(),
        );
        let first = client.list(100, None).await.unwrap();
        assert_eq!(first.next_page_token.as_deref(), Some("t1"));
        let second = client.list(100, Some("t1")).await.unwrap();
        assert!(second.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_client_surfaces_non_success_status() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/mediaItems"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client =
            PhotosClient::with_endpoint(Client::new(), server.uri(), "bad".to_string());
        match client.list(100, None).await {
            Err(ListingError::Status { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
