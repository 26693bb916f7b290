//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use geotech_edge::config::EdgeConfig;
use geotech_edge::http::HttpServer;
use geotech_edge::lifecycle::Shutdown;

/// A canned Directus-style CMS serving fixed collections and counting
/// fetches per path.
pub struct MockCms {
    addr: SocketAddr,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockCms {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));

        let recorded = hits.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((mut socket, _)) => {
                        let recorded = recorded.clone();
                        tokio::spawn(async move {
                            let path = match read_request_path(&mut socket).await {
                                Some(path) => path,
                                None => return,
                            };
                            *recorded.lock().unwrap().entry(path.clone()).or_default() += 1;

                            let (status, body) = canned_response(&path);
                            let status_line = match status {
                                200 => "200 OK",
                                404 => "404 Not Found",
                                _ => "500 Internal Server Error",
                            };
                            let response = format!(
                                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                status_line,
                                body.len(),
                                body
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        Self { addr, hits }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Fetch count for a CMS path, e.g. `/items/services`.
    #[allow(dead_code)]
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

/// Read the request head and return the path (query stripped).
async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    let head = String::from_utf8_lossy(&buf);
    let target = head.lines().next()?.split_whitespace().nth(1)?;
    Some(target.split('?').next().unwrap_or(target).to_string())
}

fn canned_response(path: &str) -> (u16, String) {
    let body = match path {
        "/items/site_settings" => serde_json::json!({
            "data": {
                "company_name": "Geotech Hub",
                "phone": "+7 812 000-00-00",
                "hero": {
                    "spb": {"title": "Piling in St. Petersburg"},
                    "msk": {"title": "Piling in Moscow"},
                },
            }
        }),
        "/items/services" => serde_json::json!({
            "data": [
                {"id": 1, "title": "Sheet piling", "slug": "sheet-piling"},
                {"id": 2, "title": "Bored piles", "slug": "bored-piles"},
            ]
        }),
        "/items/machinery" => serde_json::json!({
            "data": [
                {"id": 1, "name": "BAUER BG 28", "type": "drilling rig", "status": "available"},
            ]
        }),
        "/items/cases" => serde_json::json!({
            "data": [
                {
                    "id": "17",
                    "title": "Pile field, residential block",
                    "location": "Колпино",
                    "soil_type": "водонасыщенный песок",
                    "duration": "2024",
                    "machinery": [{"machinery_id": {"name": "BAUER BG 28"}}],
                },
            ]
        }),
        "/items/cases/17" => serde_json::json!({
            "data": {
                "id": "17",
                "title": "Pile field, residential block",
                "duration": "2024",
            }
        }),
        _ => return (404, r#"{"errors":[{"message":"not found"}]}"#.to_string()),
    };
    (200, body.to_string())
}

/// Start the edge service against the given CMS; returns its base URL and
/// the shutdown handle.
pub async fn spawn_edge(mut config: EdgeConfig, cms_base_url: String) -> (String, Shutdown) {
    config.cms.base_url = cms_base_url;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).expect("server construction");
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Give the acceptor a moment to come up.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (format!("http://{}", addr), shutdown)
}

/// Test configuration with an explicit webhook secret.
pub fn test_config(secret: &str) -> EdgeConfig {
    let mut config = EdgeConfig::default();
    config.revalidate.secret = Some(secret.to_string());
    config
}
