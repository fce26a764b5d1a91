//! End-to-end viewer tests against a counting mock tile backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use raster_common::{GeoBounds, TileAddress, TileError, TileKey};
use test_utils::{pr_metadata, tile_payload_json};
use tile_client::{TileClient, TileClientConfig, TokenStore};
use viewer::{RasterViewer, ViewerConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Clone)]
struct Backend {
    requests: Arc<AtomicUsize>,
    /// Requests that answer 500 before the backend recovers.
    fail_first: usize,
}

async fn tile_handler(
    State(backend): State<Backend>,
    Path((variable, time_index, z, x, y)): Path<(String, usize, u8, u32, u32)>,
) -> axum::response::Response {
    let n = backend.requests.fetch_add(1, Ordering::SeqCst);
    if n < backend.fail_first {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let key = TileKey::new(variable, time_index, TileAddress::new(z, x, y));
    Json(tile_payload_json(&key, 0.025)).into_response()
}

async fn spawn_backend(fail_first: usize) -> (String, Arc<AtomicUsize>) {
    let requests = Arc::new(AtomicUsize::new(0));
    let backend = Backend {
        requests: Arc::clone(&requests),
        fail_first,
    };
    let app = Router::new()
        .route(
            "/api/v1/data/raster/tile/:variable/:time_index/:z/:x/:y",
            get(tile_handler),
        )
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend");
    });
    (format!("http://{addr}"), requests)
}

fn viewer_for(base_url: String) -> RasterViewer {
    let client_config = TileClientConfig {
        base_url,
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(5),
    };
    let client = TileClient::new(client_config, TokenStore::new()).expect("client");
    RasterViewer::new(client, pr_metadata(), &ViewerConfig::default()).expect("viewer")
}

#[tokio::test]
async fn refresh_fills_the_cache_once() {
    init_tracing();
    let (base_url, requests) = spawn_backend(0).await;
    let viewer = viewer_for(base_url);

    // Zoom 0 over the global dataset wants exactly one tile.
    let report = viewer.refresh().await;
    assert_eq!(report.wanted, 1);
    assert_eq!(report.fetched, 1);
    assert_eq!(viewer.cached_tile_count().await, 1);
    assert_eq!(requests.load(Ordering::SeqCst), 1);

    // A second pass is served from cache.
    let report = viewer.refresh().await;
    assert_eq!(report.cached, 1);
    assert_eq!(report.fetched, 0);
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_refreshes_share_one_fetch() {
    init_tracing();
    let (base_url, requests) = spawn_backend(0).await;
    let viewer = viewer_for(base_url);

    let (a, b) = tokio::join!(viewer.refresh(), viewer.refresh());

    // One refresh won the pending claim; the other observed it in flight
    // or found the tile already cached.
    assert_eq!(a.fetched + b.fetched, 1);
    assert_eq!(requests.load(Ordering::SeqCst), 1);
    assert_eq!(viewer.cached_tile_count().await, 1);
}

#[tokio::test]
async fn server_error_marks_the_key_and_view_change_rearms_it() {
    init_tracing();
    let (base_url, requests) = spawn_backend(1).await;
    let viewer = viewer_for(base_url);
    let key = viewer.view().await.wanted_tiles().remove(0);

    // First pass fails; the key is recorded, the cache stays empty.
    let report = viewer.refresh().await;
    assert_eq!(report.failed, 1);
    assert_eq!(viewer.cached_tile_count().await, 0);
    assert_eq!(
        viewer.error_for(&key).await,
        Some(TileError::Http { status: 500 })
    );

    // Errored keys are not retried on their own.
    let report = viewer.refresh().await;
    assert_eq!(report.skipped_errored, 1);
    assert_eq!(requests.load(Ordering::SeqCst), 1);

    // A view change re-arms them; the backend has recovered by now.
    viewer.set_viewport(GeoBounds::global(), 0).await.unwrap();
    assert!(viewer.failed_tiles().await.is_empty());
    let report = viewer.refresh().await;
    assert_eq!(report.fetched, 1);
    assert_eq!(requests.load(Ordering::SeqCst), 2);
    assert_eq!(viewer.cached_tile_count().await, 1);
}

#[tokio::test]
async fn renders_cached_tiles_to_rgba() {
    init_tracing();
    let (base_url, _) = spawn_backend(0).await;
    let viewer = viewer_for(base_url);

    viewer.refresh().await;
    let rendered = viewer.render_visible().await.expect("render");
    assert_eq!(rendered.len(), 1);

    let (key, pixels) = &rendered[0];
    assert_eq!(key.variable, "pr");
    assert_eq!(pixels.len(), 256 * 256 * 4);

    // 0.025 normalizes to t = 0.5 over pr's 0..0.05 range; the viridis
    // midpoint is (33, 145, 140), and opacity 80 gives alpha 204.
    assert_eq!(&pixels[0..4], &[33, 145, 140, 204]);
}

#[tokio::test]
async fn time_change_fetches_a_distinct_key() {
    init_tracing();
    let (base_url, requests) = spawn_backend(0).await;
    let viewer = viewer_for(base_url);

    viewer.refresh().await;
    viewer.set_time_index(5).await.unwrap();
    let report = viewer.refresh().await;

    assert_eq!(report.fetched, 1);
    assert_eq!(requests.load(Ordering::SeqCst), 2);
    // The first time step is still cached alongside the new one.
    assert_eq!(viewer.cached_tile_count().await, 2);
}
