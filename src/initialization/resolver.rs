//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::DNS_TIMEOUT_SECS;

/// Initializes the resolver used to look up the target host once per
/// evaluation.
///
/// Uses hickory's default upstream configuration with short timeouts, so an
/// unresponsive resolver surfaces as a resolution error well inside the
/// evaluation deadline. `ndots` is 0 to keep search domains from being
/// appended to the user's input.
pub fn init_resolver() -> Arc<TokioAsyncResolver> {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = 2;
    opts.ndots = 0;

    Arc::new(TokioAsyncResolver::tokio(ResolverConfig::default(), opts))
}
