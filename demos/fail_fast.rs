//! # Demo: fail_fast
//!
//! Shows the group failure policy: the first genuine failure cancels the
//! shared token, cooperative siblings stop early, and the run reports that
//! one failure with the owning unit's name.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► 3 units: "broken" fails after ~300ms, the others run until cancelled
//!   ├─► coordinator.start (only_once ⇒ no health endpoint)
//!   ├─► "broken" fails ──► shared token cancelled
//!   ├─► siblings observe the token, return Canceled (echo, warn-logged)
//!   └─► GroupResult::FirstFailure { unit: "broken", .. } ──► exit 1
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example fail_fast
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use syncvisor::{
    Config, Coordinator, GroupResult, SetupError, StorageRef, SyncError, SyncFn, SyncerRef,
    UnitConfig, health, storage,
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
only_once: true
storage:
  type: memory
units:
  - name: shard-a
  - name: broken
  - name: shard-b
"#,
    )?);

    let storage = storage::open(&config.storage)?;
    let registry = Arc::new(health::Registry::new());
    health::register_process_meta(&registry);

    let factory = |unit: &UnitConfig, _storage: StorageRef, _config: &Config| {
        let name = unit.name.clone();
        let syncer: SyncerRef = if name == "broken" {
            SyncFn::arc(name, |_ctx: CancellationToken| async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Err(SyncError::failed("simulated snapshot corruption"))
            })
        } else {
            SyncFn::arc(name, |ctx: CancellationToken| async move {
                ctx.cancelled().await;
                Err(SyncError::Canceled)
            })
        };
        Ok::<SyncerRef, SetupError>(syncer)
    };

    let coordinator = Coordinator::new(storage, Arc::clone(&config));
    let group = coordinator.start(&factory)?;
    let _endpoint = health::activate(Arc::clone(&registry), &config); // None: only_once
    info!("all syncers running");

    match group.join().await {
        GroupResult::FirstFailure { unit, error } => {
            error!(unit = %unit, error = %error, "sync run failed");
            std::process::exit(1)
        }
        other => {
            info!(result = other.as_label(), "unexpected clean exit");
            Ok(())
        }
    }
}
