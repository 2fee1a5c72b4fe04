//! # Liveness publishing: process metadata registry and health endpoint.
//!
//! ## Contents
//! - [`Registry`] - owned key/value metadata store, explicitly passed around
//!   (no global singleton)
//! - [`register_process_meta`] - attaches version and host identity
//! - [`activate`] - conditionally starts the HTTP endpoint
//!
//! ## Quick wiring
//! ```text
//! Registry ◄── register_process_meta()   (version, hostname)
//!    │     ◄── caller set()s             (storage type, ...)
//!    ▼
//! activate(registry, config)
//!    ├─ only_once = true  → endpoint skipped (finite pass has no liveness window)
//!    └─ otherwise         → axum server on config.health_addr for process life
//!                             GET /healthz, GET /readyz → {"status":"ok","meta":{...}}
//! ```

mod server;

use std::collections::BTreeMap;
use std::sync::RwLock;

pub use server::activate;

/// Crate version string published as the `version` metadata field.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-wide health metadata store.
///
/// Single-writer-per-field by convention: each call site owns the keys it
/// sets. The registry is passed explicitly into the components that need it.
#[derive(Default)]
pub struct Registry {
    meta: RwLock<BTreeMap<String, String>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) one metadata field.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut meta = self.meta.write().unwrap_or_else(|e| e.into_inner());
        meta.insert(key.into(), value.into());
    }

    /// Reads one metadata field.
    pub fn get(&self, key: &str) -> Option<String> {
        let meta = self.meta.read().unwrap_or_else(|e| e.into_inner());
        meta.get(key).cloned()
    }

    /// Returns a point-in-time copy of all fields.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        let meta = self.meta.read().unwrap_or_else(|e| e.into_inner());
        meta.clone()
    }
}

/// Registers static process metadata: build version and host identity.
///
/// A failing (or non-UTF-8) hostname lookup is tolerated; the field is
/// simply omitted.
pub fn register_process_meta(registry: &Registry) {
    registry.set("version", VERSION);
    if let Ok(name) = hostname::get()
        && let Some(name) = name.to_str()
    {
        registry.set("hostname", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_snapshot() {
        let registry = Registry::new();
        registry.set("storage", "memory");
        registry.set("storage", "fs");

        assert_eq!(registry.get("storage").as_deref(), Some("fs"));
        assert_eq!(registry.get("missing"), None);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["storage"], "fs");
    }

    #[test]
    fn test_process_meta_includes_version() {
        let registry = Registry::new();
        register_process_meta(&registry);
        assert_eq!(registry.get("version").as_deref(), Some(VERSION));
    }
}
