//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use region_latency::config::ServiceConfig;
use region_latency::http::HttpServer;
use region_latency::lifecycle::{startup, Shutdown};

/// Directory holding the bundled sample dataset.
pub fn sample_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/azure")
}

/// Config pointing at the sample dataset and an ephemeral port.
pub fn sample_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.data.latency_matrix_path = sample_data_dir().join("azure_regions_latency_matrix.csv");
    config.data.region_map_path = sample_data_dir().join("azure_region_city_mapping.csv");
    config
}

/// A running service instance.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .unwrap();
    }
}

/// Load the dataset and start the server on an ephemeral port.
pub async fn start_server(config: ServiceConfig) -> TestServer {
    let engine = startup::load_engine(&config.data).expect("sample dataset loads");
    start_server_with_engine(config, engine).await
}

pub async fn start_server_with_engine(
    config: ServiceConfig,
    engine: Arc<region_latency::LatencyEngine>,
) -> TestServer {
    let listener = tokio::net::TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, engine);
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
