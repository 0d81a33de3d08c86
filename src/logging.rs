//! Logging setup
//!
//! Filter directives come from `ECS_ATLAS_LOG` (e.g. `ecs_atlas_core=debug`).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV_VAR: &str = "ECS_ATLAS_LOG";

/// Install the global subscriber
///
/// `default_directive` applies when the variable is unset or invalid. Safe to
/// call more than once; only the first call installs anything.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}
