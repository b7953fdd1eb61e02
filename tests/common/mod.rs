//! Shared helpers for gateway integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use docs_gateway::config::GatewayConfig;
use docs_gateway::state::GatewayState;
use docs_gateway::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A gateway running on an ephemeral local port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub updates: mpsc::UnboundedSender<GatewayState>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway with `config`, bound to 127.0.0.1 on a free port.
pub async fn start_gateway(mut config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).expect("config compiles");
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    // The listener is already bound; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestGateway {
        addr,
        shutdown,
        updates,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
