//! HTTP endpoint serving the health registry.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::Registry;
use crate::config::Config;

/// Starts the observability endpoint for the life of the process.
///
/// When `config.only_once` is set the endpoint is not started at all: a
/// finite single pass has no meaningful liveness window to serve. Returns
/// the server task handle otherwise.
///
/// Called at most once per run; a second call would start a second listener
/// on the same address and fail there.
pub fn activate(registry: Arc<Registry>, config: &Config) -> Option<JoinHandle<()>> {
    if config.only_once {
        info!("not starting the health endpoint, because only_once is set");
        return None;
    }

    let addr = config.health_addr;
    Some(tokio::spawn(async move {
        if let Err(err) = serve(addr, registry).await {
            error!(error = %err, "health endpoint terminated");
        }
    }))
}

async fn serve(addr: SocketAddr, registry: Arc<Registry>) -> std::io::Result<()> {
    let app = Router::new()
        .route("/healthz", get(health))
        .route("/readyz", get(health))
        .with_state(registry);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "health endpoint listening");
    axum::serve(listener, app).await
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    meta: BTreeMap<String, String>,
}

async fn health(State(registry): State<Arc<Registry>>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        meta: registry.snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_once_config() -> Config {
        Config {
            only_once: true,
            ..Config::default()
        }
    }

    #[test]
    fn test_body_shape() {
        let registry = Registry::new();
        registry.set("version", "0.1.0");

        let body = HealthBody {
            status: "ok",
            meta: registry.snapshot(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["meta"]["version"], "0.1.0");
    }

    #[tokio::test]
    async fn test_only_once_skips_endpoint() {
        let registry = Arc::new(Registry::new());
        assert!(activate(Arc::clone(&registry), &only_once_config()).is_none());
    }

    #[tokio::test]
    async fn test_continuous_mode_starts_endpoint() {
        let registry = Arc::new(Registry::new());
        let config = Config {
            // Ephemeral port; the test only checks that the task starts.
            health_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            ..Config::default()
        };

        let handle = activate(registry, &config).expect("endpoint task");
        handle.abort();
    }
}
