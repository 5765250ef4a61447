//! Common types module for the order chaincode.
//!
//! This module defines the record format, the composite key scheme and the
//! invocation response shared by every chaincode crate.

/// Order record codec.
pub mod codec;
/// Composite key construction for the shared key space.
pub mod key;
/// The order record.
pub mod order;
/// Self-registering implementation trait.
pub mod registry;
/// Uniform invocation response.
pub mod response;
/// Key namespaces used in the ledger state.
pub mod storage;
/// Configuration validation types for backend configuration tables.
pub mod validation;

pub use codec::{decode_order, encode_order, ValidationError};
pub use key::{build_key, split_key, KeyError};
pub use order::Order;
pub use registry::ImplementationRegistry;
pub use response::{Response, Status};
pub use storage::Namespace;
pub use validation::*;
