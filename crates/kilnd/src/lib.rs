//! Bootstrap logic for the Kiln host daemon.
//!
//! The daemon brings up the platform in a fixed sequence: resolve the
//! layered settings store, install structured telemetry, decide whether
//! this run happens in safe mode, then drive the plugin bootstrap
//! coordination provided by [`kiln_plugins`]. Bootstrap either completes
//! or aborts the process with a fatal error; nothing is retried at this
//! layer.
//!
//! Safe mode can be requested on the command line or through the
//! `server.start_once_in_safe_mode` setting. While it is active a
//! [`kiln_plugins::SafeModeValidator`] is attached to the loader, which
//! keeps user-installed plugins from enabling for the run.

pub mod bootstrap;
pub mod cli;
pub mod telemetry;

pub use bootstrap::{BootstrapError, Host, bootstrap_with};
pub use cli::Cli;
pub use telemetry::{TelemetryError, TelemetryHandle};
