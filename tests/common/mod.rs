//! Local media server shared by the integration tests.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header;
use axum::routing::get;
use axum::Router;

pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0 fake jpeg body";
pub const MP4_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42 fake video body";

/// `/slow` sends this many pieces of `SLOW_PIECE_SIZE` bytes, `SLOW_PIECE_GAP` apart.
pub const SLOW_PIECES: usize = 10;
pub const SLOW_PIECE_SIZE: usize = 16 * 1024;
pub const SLOW_PIECE_GAP: Duration = Duration::from_millis(300);

/// A video body that trickles in over about three seconds.
fn slow_body() -> Body {
    let pieces = futures::stream::unfold(0usize, |sent| async move {
        if sent == SLOW_PIECES {
            return None;
        }
        if sent > 0 {
            tokio::time::sleep(SLOW_PIECE_GAP).await;
        }
        let piece = Bytes::from(vec![b'v'; SLOW_PIECE_SIZE]);
        Some((Ok::<_, Infallible>(piece), sent + 1))
    });
    Body::from_stream(pieces)
}

/// Serves `/media/photo` (jpeg), `/media/clip` (mp4), `/slow` (mp4),
/// `/a/pic.jpg`, `/b/pic.jpg` and `/gone` (410). Anything else is a 404.
pub async fn spawn_media_server() -> SocketAddr {
    let app = Router::new()
        .route(
            "/media/photo",
            get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], JPEG_BYTES) }),
        )
        .route(
            "/media/clip",
            get(|| async { ([(header::CONTENT_TYPE, "video/mp4")], MP4_BYTES) }),
        )
        .route(
            "/a/pic.jpg",
            get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], JPEG_BYTES) }),
        )
        .route(
            "/b/pic.jpg",
            get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], JPEG_BYTES) }),
        )
        .route(
            "/slow",
            get(|| async { ([(header::CONTENT_TYPE, "video/mp4")], slow_body()) }),
        )
        .route(
            "/gone",
            get(|| async { (axum::http::StatusCode::GONE, "gone") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
