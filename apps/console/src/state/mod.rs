//! # State Module
//!
//! Long-lived console state shared by commands.
//!
//! ```text
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │    ConfigState       │  │    ToastQueue        │
//! │  currency, log       │  │  Mutex<Vec<Toast>>   │
//! │  read-only           │  │  implements Reporter │
//! └──────────────────────┘  └──────────────────────┘
//! ```

mod config;
mod notify;

pub use config::ConfigState;
pub use notify::{Toast, ToastLevel, ToastQueue};
