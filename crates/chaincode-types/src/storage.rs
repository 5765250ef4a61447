//! Namespaces partitioning the ledger key space.

use std::fmt;

/// Namespaces under which records are keyed.
///
/// The namespace is the first part of every composite key, so records of
/// different kinds never collide even when their ids do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
	/// Order records, keyed by order id.
	Orders,
}

impl Namespace {
	/// Returns the string written into composite keys.
	pub fn as_str(&self) -> &'static str {
		match self {
			Namespace::Orders => "orders",
		}
	}
}

impl fmt::Display for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
