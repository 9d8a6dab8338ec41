//! Shared utilities for the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use gridmap::config::GridmapConfig;
use gridmap::http::{HttpServer, ServerError};
use gridmap::lifecycle::Shutdown;
use gridmap::management::populate_fixture;
use gridmap::model::{MapPayload, ObserverPayload, ObstaclePayload};
use gridmap::store::MapStore;
use gridmap_sdk::GridmapClient;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: GridmapClient,
    pub http: reqwest::Client,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger graceful shutdown and wait for the server to finish.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        self.handle.await.expect("server task panicked")
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn test_config() -> GridmapConfig {
    let mut config = GridmapConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config
}

pub fn temp_snapshot(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gridmap-{tag}-{}.json", fastrand::u64(..)))
}

pub async fn spawn(config: GridmapConfig, store: MapStore) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::with_store(config, store).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let http = http_client();
    let client = GridmapClient::with_client(&format!("http://{addr}"), http.clone()).unwrap();
    TestServer {
        addr,
        client,
        http,
        shutdown,
        handle,
    }
}

/// A server with an empty inventory.
pub async fn spawn_empty() -> TestServer {
    spawn(test_config(), MapStore::new(None)).await
}

/// One fixed 50 x 40 map with "Test Observer 1" at (0, 0), an obstacle at
/// (49, 39), one random observer and obstacle, plus two random empty maps.
pub fn populate_test_db(store: &MapStore) {
    store
        .create_map(MapPayload {
            name: "Test Map 1".into(),
            width: 50,
            height: 40,
        })
        .unwrap();
    store
        .create_observer(
            "test-map-1",
            ObserverPayload {
                name: "Test Observer 1".into(),
                x: 0,
                y: 0,
                vision: Some(5.0),
            },
        )
        .unwrap();
    store
        .create_obstacle("test-map-1", ObstaclePayload { x: 49, y: 39 })
        .unwrap();
    store
        .create_observer(
            "test-map-1",
            ObserverPayload {
                name: "Test Observer 2".into(),
                x: fastrand::u32(1..=47),
                y: fastrand::u32(1..=37),
                vision: fastrand::bool().then(|| f64::from(fastrand::u32(0..10_000)) / 100.0),
            },
        )
        .unwrap();
    store
        .create_obstacle(
            "test-map-1",
            ObstaclePayload {
                x: fastrand::u32(1..=47),
                y: fastrand::u32(1..=37),
            },
        )
        .unwrap();

    for i in 2..4 {
        store
            .create_map(MapPayload {
                name: format!("Test Map {i}"),
                width: fastrand::u32(10..=50),
                height: fastrand::u32(10..=50),
            })
            .unwrap();
    }
}

/// A server holding the `populate_test_db` inventory.
pub async fn spawn_test_db() -> TestServer {
    let store = MapStore::new(None);
    populate_test_db(&store);
    spawn(test_config(), store).await
}

/// A server holding the documented "Test Map 1" fixture.
pub async fn spawn_with_fixture() -> TestServer {
    let store = MapStore::new(None);
    populate_fixture(&store).unwrap();
    spawn(test_config(), store).await
}
