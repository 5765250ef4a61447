//! The order record stored by the chaincode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An order as submitted by a client application.
///
/// The timestamps and `approved` are optional: an absent or `null` value is
/// distinct from `false` or from any timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier; the only component of the record's ledger key.
	#[serde(default)]
	pub id: String,
	/// Free-form label.
	#[serde(default)]
	pub name: String,
	/// Creation time supplied by the caller.
	#[serde(default, deserialize_with = "rfc3339::deserialize")]
	pub created_ts: Option<DateTime<Utc>>,
	/// Approval decision, if one has been made.
	#[serde(default)]
	pub approved: Option<bool>,
	/// Review time, if the order has been reviewed.
	#[serde(default, deserialize_with = "rfc3339::deserialize")]
	pub reviewed_ts: Option<DateTime<Utc>>,
	/// Order amount in the smallest unit.
	#[serde(default)]
	pub amount: u64,
}

/// Strict RFC 3339 timestamps: `T` between date and time, `Z` or a numeric
/// offset, no whitespace.
mod rfc3339 {
	use chrono::{DateTime, Utc};
	use serde::{de, Deserialize, Deserializer};

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Option::<String>::deserialize(deserializer)?
			.map(|raw| parse(&raw).map_err(de::Error::custom))
			.transpose()
	}

	pub(super) fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
		let bytes = raw.as_bytes();
		if bytes.get(10) != Some(&b'T')
			|| raw.ends_with('z')
			|| raw.bytes().any(|b| b.is_ascii_whitespace())
		{
			return Err(format!("timestamp {:?} is not RFC 3339", raw));
		}

		DateTime::parse_from_rfc3339(raw)
			.map(|ts| ts.with_timezone(&Utc))
			.map_err(|e| format!("timestamp {:?} is not RFC 3339: {}", raw, e))
	}
}
