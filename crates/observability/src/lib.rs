//! Logging and tracing setup shared by the dryrun binaries.
//!
//! One call to [`init`] installs a `tracing` subscriber made of:
//!
//! - an `EnvFilter` (from the config, `RUST_LOG`, or `info`)
//! - an optional stderr `fmt` layer
//! - an optional OTLP exporter when an endpoint is configured
//! - an optional [`LogSink`] that receives every formatted line, used by the
//!   TUI's runtime log screen
//!
//! ```no_run
//! use dryrun_observability::{init, ObservabilityConfig};
//!
//! let config = ObservabilityConfig::new("dryrun")
//!     .with_log_level("dryrun=debug,info")
//!     .with_console(false);
//! init(config)?;
//! tracing::info!("ready");
//! # Ok::<(), dryrun_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_SERVICE_NAME` - service name
//! - `OTEL_SERVICE_VERSION` - service version
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint; export is off when unset
//! - `DRYRUN_LOG` or `OTEL_LOG_LEVEL` or `RUST_LOG` - log filter

pub mod config;
pub mod error;
pub mod spans;
pub mod telemetry;
pub mod tui_log_layer;

pub use config::{LogSink, ObservabilityConfig};
pub use error::ObservabilityError;
pub use spans::{record_duration, record_error};
pub use telemetry::{init, init_from_env, shutdown};
