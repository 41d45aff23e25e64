//! Local HTTP redirect proxy for players
//!
//! Players are given a stable local URL (`/stream/{id}.m3u8`). On every hit
//! the proxy asks the catalog for the channel's current playlist URL and
//! answers with a 307 to it. Nothing is kept between requests: the upstream
//! URL carries short-lived signed tokens, so a cached one would stop working.
//!
//! | Request | Response |
//! |---------|----------|
//! | `/stream/<digits>.m3u8` (any method), resolved | 307, `Location: <playlist url>` |
//! | `/stream/<digits>.m3u8` (any method), resolution failed | 500, error text |
//! | anything else | 404 |

use crate::client::HiRadioClient;
use crate::error::{Error, Result};
use crate::models::Playlist;
use async_trait::async_trait;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::any,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, info, warn};

/// Resolves a channel id to its current playlist
#[async_trait]
pub trait PlaylistResolver: Send + Sync + 'static {
    async fn resolve(&self, channel_id: u32) -> Result<Playlist>;
}

#[async_trait]
impl PlaylistResolver for HiRadioClient {
    async fn resolve(&self, channel_id: u32) -> Result<Playlist> {
        self.playlist(channel_id).await
    }
}

type ResolverState = Arc<dyn PlaylistResolver>;

/// URL a player should open to play `channel_id` through a proxy on `port`
pub fn stream_url(port: u16, channel_id: u32) -> String {
    format!("http://localhost:{port}/stream/{channel_id}.m3u8")
}

const NOT_FOUND_BODY: &str = "404 page not found";

enum ProxyError {
    NoRoute,
    Resolve(Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            Self::NoRoute => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
            Self::Resolve(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
        }
    }
}

/// Build the proxy router around a playlist resolver
pub fn stream_router<R: PlaylistResolver>(resolver: R) -> Router {
    let state: ResolverState = Arc::new(resolver);
    Router::new()
        .route("/stream/{file}", any(redirect_stream))
        .fallback(not_found)
        .with_state(state)
}

/// Channel id of a `<digits>.m3u8` path segment
fn parse_stream_file(file: &str) -> Option<u32> {
    let digits = file.strip_suffix(".m3u8")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

/// Any method on /stream/{id}.m3u8
async fn redirect_stream(
    State(resolver): State<ResolverState>,
    file: std::result::Result<Path<String>, PathRejection>,
) -> std::result::Result<Redirect, ProxyError> {
    // A segment that is not valid UTF-8 once decoded cannot be an id either
    let Ok(Path(file)) = file else {
        return Err(ProxyError::NoRoute);
    };
    let channel_id = parse_stream_file(&file).ok_or(ProxyError::NoRoute)?;

    match resolver.resolve(channel_id).await {
        Ok(playlist) => {
            debug!(channel_id, url = %playlist.url, "redirecting to playlist");
            Ok(Redirect::temporary(&playlist.url))
        }
        Err(err) => {
            warn!(channel_id, error = %err, "Failed to get playlist");
            Err(ProxyError::Resolve(err))
        }
    }
}

/// A bound, not yet serving, redirect proxy
///
/// Binding is split from serving so a bind failure can be reported before
/// anything else starts (a player pointed at a dead port is useless).
pub struct StreamProxy {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl StreamProxy {
    /// Bind the listening socket
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until `shutdown` resolves, then release the socket
    pub async fn serve<R, F>(self, resolver: R, shutdown: F) -> Result<()>
    where
        R: PlaylistResolver,
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = %self.local_addr, "stream proxy listening");

        let router = stream_router(resolver);
        axum::serve(self.listener, router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!(addr = %self.local_addr, "stream proxy stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use std::sync::atomic::{AtomicU32, Ordering};
    use tower::ServiceExt;

    /// Hands out a different URL on every call, or fails for channel 0
    #[derive(Default)]
    struct RotatingResolver {
        calls: AtomicU32,
    }

    #[async_trait]
    impl PlaylistResolver for RotatingResolver {
        async fn resolve(&self, channel_id: u32) -> Result<Playlist> {
            if channel_id == 0 {
                return Err(Error::PlaylistNotFound(channel_id));
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Playlist {
                url: format!("https://cdn.example/{channel_id}/playlist.m3u8?token=U{n}"),
            })
        }
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn test_parse_stream_file() {
        assert_eq!(parse_stream_file("232.m3u8"), Some(232));
        assert_eq!(parse_stream_file("abc.m3u8"), None);
        assert_eq!(parse_stream_file(".m3u8"), None);
        assert_eq!(parse_stream_file("232"), None);
        assert_eq!(parse_stream_file("+232.m3u8"), None);
        assert_eq!(parse_stream_file("99999999999.m3u8"), None);
    }

    #[test]
    fn test_stream_url() {
        assert_eq!(
            stream_url(1077, 232),
            "http://localhost:1077/stream/232.m3u8"
        );
    }

    #[tokio::test]
    async fn test_redirect_is_resolved_every_time() {
        let router = stream_router(RotatingResolver::default());

        let first = get(router.clone(), "/stream/232.m3u8").await;
        assert_eq!(first.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            location(&first),
            "https://cdn.example/232/playlist.m3u8?token=U1"
        );

        let second = get(router, "/stream/232.m3u8").await;
        assert_eq!(second.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            location(&second),
            "https://cdn.example/232/playlist.m3u8?token=U2"
        );
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let router = stream_router(RotatingResolver::default());
        let response = get(router, "/stream/abc.m3u8").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let router = stream_router(RotatingResolver::default());
        let response = get(router.clone(), "/channels").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get(router, "/stream/232.m3u8/extra").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_undecodable_segment_is_not_found() {
        let router = stream_router(RotatingResolver::default());
        let response = get(router, "/stream/%FF.m3u8").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], NOT_FOUND_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_any_method_is_redirected() {
        let router = stream_router(RotatingResolver::default());

        for method in ["POST", "HEAD", "PUT"] {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/stream/232.m3u8")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{method}");
        }
    }

    #[tokio::test]
    async fn test_resolution_failure_is_500_with_message() {
        let router = stream_router(RotatingResolver::default());
        let response = get(router, "/stream/0.m3u8").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "playlist not found, channel id: 0"
        );
    }

    #[tokio::test]
    async fn test_bind_reports_address_and_shuts_down() {
        let proxy = StreamProxy::bind("127.0.0.1:0").await.unwrap();
        let addr = proxy.local_addr();
        assert_ne!(addr.port(), 0);

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(proxy.serve(RotatingResolver::default(), async move {
            let _ = stop_rx.await;
        }));

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();

        // Socket released: the same port can be bound again
        StreamProxy::bind(addr).await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_conflict_is_an_error() {
        let first = StreamProxy::bind("127.0.0.1:0").await.unwrap();
        let second = StreamProxy::bind(first.local_addr()).await;
        assert!(matches!(second, Err(Error::Io(_))));
    }
}
