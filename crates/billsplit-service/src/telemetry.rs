//! Logging setup for processes embedding the settlement service.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,billsplit=debug";

/// Installs a global fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops. Returns whether this
/// call installed the subscriber.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        assert!(!init_tracing());
    }
}
