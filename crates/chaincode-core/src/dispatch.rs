//! Operation names accepted by the chaincode.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned for an operation name the chaincode does not support.
#[derive(Debug, Error, PartialEq, Eq)]
#[error(
	"Unknown operation, expecting 'Health', 'StoreOrder', or 'GetOrder'. Instead, got: '{0}'"
)]
pub struct DispatchError(pub String);

/// The fixed set of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Liveness check.
	Health,
	/// Validate and store an order.
	StoreOrder,
	/// Read the stored bytes of an order.
	GetOrder,
}

impl Operation {
	pub fn as_str(&self) -> &'static str {
		match self {
			Operation::Health => "Health",
			Operation::StoreOrder => "StoreOrder",
			Operation::GetOrder => "GetOrder",
		}
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Operation {
	type Err = DispatchError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Health" => Ok(Operation::Health),
			"StoreOrder" => Ok(Operation::StoreOrder),
			"GetOrder" => Ok(Operation::GetOrder),
			other => Err(DispatchError(other.to_string())),
		}
	}
}
