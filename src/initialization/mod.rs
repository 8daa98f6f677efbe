//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of an
//! analyzer:
//! - Logger
//! - rustls crypto provider
//! - DNS resolver
//! - HTTP client for the HSTS check

mod client;
mod logger;
mod resolver;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use client::init_hsts_client;
pub use logger::init_logger_with;
pub use resolver::init_resolver;

/// Initializes the crypto provider for TLS operations.
///
/// Installs `ring` as the process-wide default for `rustls`, which the HSTS
/// client relies on. Probes build their own configurations from an explicit
/// provider and do not depend on this.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}
