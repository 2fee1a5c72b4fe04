//! # Demo: daemon
//!
//! Full wiring of a continuous run: readiness gate, coordinator, liveness
//! endpoint, OS-signal shutdown, exit-code mapping.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► load Config (inline YAML), open memory storage
//!   ├─► register process meta (version, hostname, storage type)
//!   ├─► bind_shutdown: Ctrl-C ──► shared token
//!   ├─► side task publishes "ready.flag" after ~600ms (two gate polls)
//!   ├─► wait_for_marker ──► Ready
//!   ├─► coordinator.start: two units, ten cycles each
//!   ├─► health::activate ──► http://127.0.0.1:8500/healthz
//!   └─► group.join ──► exit 0 (AllSucceeded / Cancelled) or 1 (FirstFailure)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example daemon
//! # in another terminal while it runs:
//! curl http://127.0.0.1:8500/healthz
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use syncvisor::{
    Config, Coordinator, GroupResult, MemoryStorage, SetupError, StorageRef, SyncError, SyncFn,
    SyncerRef, UnitConfig, bind_shutdown, health, wait_for_marker,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,syncvisor=debug".into()),
        )
        .init();

    let config = Arc::new(Config::from_yaml_str(
        r#"
marker_file: ready.flag
poll_interval: 0.2
health_addr: "127.0.0.1:8500"
storage:
  type: memory
units:
  - name: shard-a
  - name: shard-b
"#,
    )?);

    // Concrete handle kept so the demo can publish the marker itself.
    let memory = Arc::new(MemoryStorage::new());
    let storage: StorageRef = Arc::clone(&memory) as StorageRef;

    let registry = Arc::new(health::Registry::new());
    health::register_process_meta(&registry);
    registry.set("storage", storage.kind());

    let coordinator = Coordinator::new(Arc::clone(&storage), Arc::clone(&config));
    bind_shutdown(coordinator.cancellation_token());

    // Stand-in for an external publisher dropping the marker into storage.
    {
        let memory = Arc::clone(&memory);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(600)).await;
            memory.put("ready.flag", b"go".to_vec());
        });
    }

    let token = coordinator.cancellation_token();
    match wait_for_marker(
        storage.as_ref(),
        config.marker_file.as_deref(),
        config.poll_interval,
        &token,
    )
    .await
    {
        syncvisor::Gate::Ready => {}
        syncvisor::Gate::Cancelled => {
            warn!("cancelled while waiting for marker");
            return Ok(());
        }
    }

    let factory = |unit: &UnitConfig, _storage: StorageRef, _config: &Config| {
        let unit_name = unit.name.clone();
        Ok::<SyncerRef, SetupError>(SyncFn::arc(
            unit_name.clone(),
            move |ctx: CancellationToken| {
                let unit = unit_name.clone();
                async move {
                    for cycle in 1..=10u32 {
                        if ctx.is_cancelled() {
                            return Err(SyncError::Canceled);
                        }
                        info!(unit = %unit, cycle, "sync cycle");
                        tokio::select! {
                            _ = tokio::time::sleep(Duration::from_millis(500)) => {}
                            _ = ctx.cancelled() => return Err(SyncError::Canceled),
                        }
                    }
                    Ok(())
                }
            },
        ))
    };

    let group = coordinator.start(&factory)?;
    let _endpoint = health::activate(Arc::clone(&registry), &config);
    info!("all syncers running");

    match group.join().await {
        GroupResult::AllSucceeded => info!("all syncers finished"),
        GroupResult::Cancelled => warn!("run cancelled before completion"),
        GroupResult::FirstFailure { unit, error } => {
            error!(unit = %unit, error = %error, "sync run failed");
            std::process::exit(1);
        }
    }
    Ok(())
}
