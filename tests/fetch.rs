//! Fetching single URLs and direct link batches.

mod common;

use std::time::Duration;

use tempfile::tempdir;

use mediaferry::scrapers::parse_links;
use mediaferry::services::{
    DownloadConfig, FetchError, HttpFetcher, LinkDownloadService, Phase, ProgressReporter,
};

use common::{spawn_media_server, JPEG_BYTES, SLOW_PIECES, SLOW_PIECE_SIZE};

fn fetcher(dir: &std::path::Path) -> HttpFetcher {
    HttpFetcher::from_config(&DownloadConfig::new(dir)).unwrap()
}

#[tokio::test]
async fn test_same_name_gets_numbered_suffix() {
    let addr = spawn_media_server().await;
    let dir = tempdir().unwrap();
    let fetcher = fetcher(dir.path());

    let first = fetcher
        .fetch(&format!("http://{}/a/pic.jpg", addr), dir.path(), None, 1)
        .await
        .unwrap();
    let second = fetcher
        .fetch(&format!("http://{}/b/pic.jpg", addr), dir.path(), None, 2)
        .await
        .unwrap();

    assert_eq!(first, dir.path().join("pic.jpg"));
    assert_eq!(second, dir.path().join("pic_1.jpg"));
    assert_eq!(std::fs::read(&second).unwrap(), JPEG_BYTES);
}

#[tokio::test]
async fn test_hint_extension_is_repaired_from_content_type() {
    let addr = spawn_media_server().await;
    let dir = tempdir().unwrap();

    let saved = fetcher(dir.path())
        .fetch(&format!("http://{}/media/clip", addr), dir.path(), Some("clip.bin"), 1)
        .await
        .unwrap();
    assert_eq!(saved, dir.path().join("clip.mp4"));

    let fallback = fetcher(dir.path())
        .fetch(&format!("http://{}/media/photo", addr), dir.path(), None, 7)
        .await
        .unwrap();
    assert_eq!(fallback, dir.path().join("file_7.jpg"));
}

#[tokio::test]
async fn test_slow_transfer_outlasting_timeout_completes() {
    let addr = spawn_media_server().await;
    let dir = tempdir().unwrap();

    // The body takes about three seconds but never stalls for a full second.
    let mut config = DownloadConfig::new(dir.path());
    config.request_timeout = Duration::from_secs(1);
    let fetcher = HttpFetcher::from_config(&config).unwrap();

    let saved = fetcher
        .fetch(&format!("http://{}/slow", addr), dir.path(), Some("long.bin"), 1)
        .await
        .unwrap();

    assert_eq!(saved, dir.path().join("long.mp4"));
    assert_eq!(
        std::fs::metadata(&saved).unwrap().len(),
        (SLOW_PIECES * SLOW_PIECE_SIZE) as u64
    );
}

#[tokio::test]
async fn test_error_status_leaves_no_file() {
    let addr = spawn_media_server().await;
    let dir = tempdir().unwrap();
    let fetcher = fetcher(dir.path());

    for path in ["gone", "does/not/exist.jpg"] {
        let err = fetcher
            .fetch(&format!("http://{}/{}", addr, path), dir.path(), Some("x.jpg"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }), "{:?}", err);
    }

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_link_batch_downloads_and_organizes() {
    let addr = spawn_media_server().await;
    let dir = tempdir().unwrap();
    let dest = dir.path().join("bob");

    let text = format!(
        "photo: http://{0}/media/photo, clip (http://{0}/media/clip) and http://{0}/gone.\nagain: http://{0}/media/photo",
        addr
    );
    let links = parse_links(&text);
    assert_eq!(links.len(), 3);

    let service = LinkDownloadService::new(fetcher(dir.path()), dir.path(), &dest);
    let summary = service
        .run(&links, ProgressReporter::silent(Phase::Links))
        .await;

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);

    let report = summary.organized.unwrap();
    assert_eq!(report.moved_images, 1);
    assert_eq!(report.moved_videos, 1);
    assert!(dest.join("images/file_1.jpg").is_file());
    assert!(dest.join("videos/file_2.mp4").is_file());
    assert!(dir.path().join("log.txt").is_file());
}
