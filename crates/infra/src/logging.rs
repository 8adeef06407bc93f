//! Log output for applications embedding the client.
//!
//! The library crates only emit `tracing` events. Nothing is printed until
//! the application installs a subscriber, either its own or the one from
//! [`init`].

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither `RUST_LOG` nor an explicit directive is given.
pub const DEFAULT_FILTER: &str = "corezoid=warn,corezoid_core=warn,corezoid_infra=warn";

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` wins over `filter`; `filter` wins over [`DEFAULT_FILTER`].
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init(filter: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
