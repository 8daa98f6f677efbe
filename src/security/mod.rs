//! HTTP-level security checks.
//!
//! Currently only the Strict-Transport-Security header, read with a single
//! request to the probed origin.

mod hsts;

pub use hsts::{fetch_hsts, parse_hsts_header, HstsPolicy, HstsStatus};
