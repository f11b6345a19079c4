//! # Trace Viewer
//!
//! Shared plumbing for a desktop trace viewer whose widgets (trace tree,
//! timeline charts, data tables) talk to each other over an in-process
//! signal bus instead of holding references to one another.
//!
//! ## Architecture
//!
//! The workspace is organized as multiple crates:
//!
//! 1. **traceviewer-core** - Signal catalog, payload types, signal bus
//! 2. **traceviewer-settings** - Configuration files for the bus and logging
//! 3. **traceviewer** - Logging bootstrap and application wiring

pub use traceviewer_core::payloads;
pub use traceviewer_core::signals;

pub use traceviewer_core::{
    current_manager, kinds, set_manager_instance, FailureReason, Owner, RegistrantIdentity, Signal,
    SignalBusConfig, SignalError, SignalKind, SignalManager, SubscriberFailure, Subscription,
    SubscriptionGuard, SubscriptionId,
};

pub use traceviewer_settings::{Config, LoggingSettings, SettingsError, SettingsManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - Console output, pretty or JSON lines
/// - RUST_LOG environment variable support, falling back to `settings.level`
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;

    if settings.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_level(true)
            .with_thread_names(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Load settings, start logging and install the configured signal bus
///
/// This is the startup sequence of the application: after it returns,
/// [`current_manager`] hands out the bus built from the loaded settings.
pub fn bootstrap(settings: &SettingsManager) -> anyhow::Result<SignalManager> {
    init_logging(&settings.config().logging)?;
    let manager = settings.install_signal_manager();
    tracing::info!(
        manager = %manager.instance_id(),
        version = VERSION,
        build = BUILD_DATE,
        signals = SignalKind::ALL.len(),
        "Signal bus ready"
    );
    Ok(manager)
}
