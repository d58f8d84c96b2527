//! # Meem Console Library
//!
//! Glue between the product editor and the validation engine.
//!
//! ## Module Organization
//! ```text
//! meem_console/
//! ├── lib.rs          ◄─── You are here (tracing setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── Configuration state (MEEM_* variables)
//! │   └── notify.rs   ◄─── Toast queue (Reporter implementation)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   └── product.rs  ◄─── submit_product, payload, service seam
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Submit Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductSubmission ──► ValidationPipeline (meem-core)                   │
//! │                           │            │              │                 │
//! │                     FieldErrors   BlockingError    resolved variants    │
//! │                           │            │              │                 │
//! │                        inline     ToastQueue     ProductService         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

use state::ConfigState;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured filter is used.
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(config: &ConfigState) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
