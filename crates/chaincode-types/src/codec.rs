//! JSON codec for order records.
//!
//! Decoding checks structure only: field types, timestamp format and the
//! integer range of `amount`. Business rules such as a non-empty id are
//! enforced later, when the ledger key is built.

use crate::Order;
use thiserror::Error;

/// Error returned when input bytes do not describe an order.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// The bytes are not JSON of the expected shape.
	#[error("Failed to unmarshal order: {0}")]
	Malformed(#[from] serde_json::Error),
}

/// Parses JSON bytes into an [`Order`].
pub fn decode_order(bytes: &[u8]) -> Result<Order, ValidationError> {
	Ok(serde_json::from_slice(bytes)?)
}

/// Serializes an [`Order`] to JSON bytes.
///
/// Absent optional fields are written as `null`.
pub fn encode_order(order: &Order) -> Result<Vec<u8>, ValidationError> {
	Ok(serde_json::to_vec(order)?)
}
