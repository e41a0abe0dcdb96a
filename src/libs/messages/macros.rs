//! Convenient macros for application messaging and logging.
//!
//! The macros route a [`Message`](super::Message) either to `tracing` (when
//! structured logging is active) or to plain stdout/stderr. The server always
//! runs with structured logging; CLI commands print plainly unless
//! `TODO_DEBUG` or `RUST_LOG` is set.
//!
//! ## Macro Categories
//!
//! - **`msg_print!`**: General message display
//! - **`msg_success!`**: Success notifications with ✅ prefix
//! - **`msg_info!`**: Informational messages with ℹ️ prefix
//! - **`msg_warning!`**: Warning messages with ⚠️ prefix
//! - **`msg_error!`**: Error messages with ❌ prefix
//! - **`msg_debug!`**: Debug-only messages with 🔍 prefix
//! - **`msg_error_anyhow!`** / **`msg_bail_anyhow!`**: Build or return an `anyhow::Error`
//!
//! ## Usage
//!
//! ```rust
//! use todo_server::{msg_info, msg_error_anyhow};
//! use todo_server::libs::messages::Message;
//!
//! msg_info!(Message::SyncingUrlTitles);
//! let error = msg_error_anyhow!(Message::EmailNotConfigured);
//! ```

use std::sync::OnceLock;

static STRUCTURED_LOGGING: OnceLock<bool> = OnceLock::new();

/// Returns `true` when messages should go to `tracing` instead of the console.
///
/// Decided once per process: either forced by [`enable_structured_logging`]
/// or derived from `TODO_DEBUG`/`RUST_LOG` on first use.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *STRUCTURED_LOGGING.get_or_init(|| std::env::var("TODO_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Forces structured logging for the rest of the process.
///
/// Has no effect once a macro has already resolved the mode.
pub fn enable_structured_logging() {
    let _ = STRUCTURED_LOGGING.set(true);
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("⚠️ {}", $msg);
        } else {
            println!("⚠️ {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️ {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("{}", $msg)
    };
}

#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("{}", $msg)
    };
}
