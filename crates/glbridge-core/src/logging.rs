//! Console logging for applications embedding the bridge.
//!
//! Filter directives come from `GLBRIDGE_LOG`, then `RUST_LOG`, then default
//! to `warn`:
//! - `GLBRIDGE_LOG=debug` - lifecycle transitions
//! - `GLBRIDGE_LOG=glbridge_core::bridge=trace` - every frame

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "GLBRIDGE_LOG";

static INIT: OnceCell<()> = OnceCell::new();

/// Install a global `fmt` subscriber. Later calls are no-ops, and so is the
/// first call if the application already installed its own subscriber.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let console = fmt::layer().with_target(true).with_thread_names(true);

        // Another subscriber may already be installed by the embedding app.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .try_init();
    });
}
