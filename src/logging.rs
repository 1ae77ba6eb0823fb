//! Installs a `tracing_subscriber` at startup when the `setup_tracing` feature is enabled.
//!
//! Logging stays off unless `DEBUG_STRTREE` is set to a truthy value, so the crate is silent
//! by default both as a library dependency and under `cargo test`.

#[cfg(feature = "setup_tracing")]
use ctor::ctor;
#[cfg(feature = "setup_tracing")]
use tracing::Level;

#[cfg(feature = "setup_tracing")]
#[ctor]
fn set_debug_level() {
    if std::env::var("DEBUG_STRTREE").map_or(true, |v| v == "0" || v == "false" || v.is_empty()) {
        // Disable logging
    } else {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .init();
    }
}
