//! Cipher and protocol analysis.
//!
//! Pure functions over probe output:
//! - `analyze_cipher` scores the negotiated cipher suite
//! - `analyze_protocols` scores the protocol support matrix
//! - `protocol_details` summarises the supplementary handshake flags
//! - `build_recommendations` flattens every finding into one prioritized list
//!
//! The two scorers share no state and never suspend.

mod cipher;
mod details;
mod protocol;
mod recommendations;
mod types;

pub use cipher::{analyze_cipher, CipherProperties};
pub use details::protocol_details;
pub use protocol::analyze_protocols;
pub use recommendations::build_recommendations;
pub use types::{
    CipherAnalysis, CipherDetails, FindingCategory, ProtocolAnalysis, ProtocolDetails,
    Recommendation,
};
