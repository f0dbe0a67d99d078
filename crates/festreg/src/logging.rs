//! Diagnostics for the registration desk.
//!
//! The store reports inserts, updates, deletes, and rejected writes through
//! `tracing`. Command results are printed on stdout, so diagnostics go to
//! stderr and stay at warnings unless `-v` or `RUST_LOG` asks for more.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much diagnostic output the binary shows, picked by `-q` and `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `-q`: errors only.
    Quiet,
    /// No flag: rejected writes and other warnings.
    #[default]
    Normal,
    /// `-v`: every store operation, plus database open and schema setup.
    Verbose,
    /// `-vv`: everything.
    Trace,
}

impl Verbosity {
    /// The most detailed level let through at this verbosity.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// `EnvFilter` directive used when `RUST_LOG` is unset, e.g. `festreg=warn`.
    #[must_use]
    pub fn directive(self) -> String {
        format!("festreg={}", self.level().as_str().to_ascii_lowercase())
    }
}

/// Install the stderr subscriber.
///
/// A set `RUST_LOG` wins over `verbosity`. Later calls are no-ops.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .try_init();
}
