//! Composite keys for the shared ledger key space.
//!
//! A composite key is laid out as `\0namespace\0component\0...component\0`.
//! The separator may not appear inside the namespace or any component, so
//! two different inputs never produce the same key.

use thiserror::Error;

/// Separator placed before the namespace and after every part of the key.
pub const SEPARATOR: char = '\u{0}';

/// Highest code point; reserved by ledgers for open-ended range scans.
const MAX_CODE_POINT: char = '\u{10FFFF}';

/// Errors that can occur while building or splitting a composite key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
	/// A namespace or component cannot be encoded.
	#[error("Failed to generate composite key [{}]: {}", .components.join(","), .reason)]
	InvalidComponent {
		components: Vec<String>,
		reason: String,
	},
	/// The string was not produced by [`build_key`].
	#[error("Malformed composite key {0:?}")]
	Malformed(String),
}

/// Builds the composite key for `components` inside `namespace`.
///
/// Fails if the namespace or a component is empty, or contains the
/// separator or the reserved maximum code point.
pub fn build_key<S: AsRef<str>>(namespace: &str, components: &[S]) -> Result<String, KeyError> {
	let invalid = |reason: String| KeyError::InvalidComponent {
		components: components.iter().map(|c| c.as_ref().to_string()).collect(),
		reason,
	};

	check_part(namespace).map_err(|e| invalid(format!("namespace {}", e)))?;

	let mut key = String::with_capacity(
		2 + namespace.len()
			+ components
				.iter()
				.map(|c| c.as_ref().len() + 1)
				.sum::<usize>(),
	);
	key.push(SEPARATOR);
	key.push_str(namespace);
	key.push(SEPARATOR);

	for (index, component) in components.iter().enumerate() {
		let component = component.as_ref();
		check_part(component).map_err(|e| invalid(format!("component {} {}", index, e)))?;
		key.push_str(component);
		key.push(SEPARATOR);
	}

	Ok(key)
}

/// Splits a composite key back into its namespace and components.
pub fn split_key(key: &str) -> Result<(String, Vec<String>), KeyError> {
	let malformed = || KeyError::Malformed(key.to_string());

	let inner = key
		.strip_prefix(SEPARATOR)
		.and_then(|rest| rest.strip_suffix(SEPARATOR))
		.ok_or_else(malformed)?;

	let mut parts = inner.split(SEPARATOR);
	let namespace = parts.next().filter(|ns| !ns.is_empty()).ok_or_else(malformed)?;

	let mut components = Vec::new();
	for part in parts {
		if part.is_empty() {
			return Err(malformed());
		}
		components.push(part.to_string());
	}

	Ok((namespace.to_string(), components))
}

fn check_part(part: &str) -> Result<(), &'static str> {
	if part.is_empty() {
		return Err("must not be empty");
	}
	if part.contains(SEPARATOR) {
		return Err("must not contain U+0000");
	}
	if part.contains(MAX_CODE_POINT) {
		return Err("must not contain U+10FFFF");
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_layout() {
		let key = build_key("orders", &["abc"]).unwrap();
		assert_eq!(key, "\u{0}orders\u{0}abc\u{0}");
	}

	#[test]
	fn test_deterministic() {
		let id = "d3ae8bb4-10ce-40a2-9a15-35bc6399df68";
		assert_eq!(
			build_key("orders", &[id]).unwrap(),
			build_key("orders", &[id]).unwrap()
		);
	}

	#[test]
	fn test_distinct_ids_distinct_keys() {
		let a = build_key("orders", &["order-1"]).unwrap();
		let b = build_key("orders", &["order-2"]).unwrap();
		assert_ne!(a, b);
	}

	#[test]
	fn test_no_concatenation_collisions() {
		// Naive joining would map both of these to "ordersab".
		let split = build_key("orders", &["a", "b"]).unwrap();
		let joined = build_key("orders", &["ab"]).unwrap();
		assert_ne!(split, joined);

		let shifted = build_key("ordersa", &["b"]).unwrap();
		assert_ne!(shifted, split);
		assert_ne!(shifted, joined);
	}

	#[test]
	fn test_rejects_empty_parts() {
		let err = build_key("orders", &[""]).unwrap_err();
		assert!(matches!(err, KeyError::InvalidComponent { .. }));
		assert!(err.to_string().contains("must not be empty"));

		assert!(build_key("", &["abc"]).is_err());
		assert!(build_key("orders", &["abc", ""]).is_err());
	}

	#[test]
	fn test_rejects_reserved_characters() {
		assert!(build_key("orders", &["a\u{0}b"]).is_err());
		assert!(build_key("orders", &["a\u{10FFFF}"]).is_err());
		assert!(build_key("ord\u{0}ers", &["a"]).is_err());
	}

	#[test]
	fn test_error_lists_components() {
		let err = build_key("orders", &["first", ""]).unwrap_err();
		assert_eq!(
			err,
			KeyError::InvalidComponent {
				components: vec!["first".to_string(), String::new()],
				reason: "component 1 must not be empty".to_string(),
			}
		);
		assert!(err.to_string().contains("[first,]"));
	}

	#[test]
	fn test_split_inverts_build() {
		let key = build_key("orders", &["a", "b c", "ü"]).unwrap();
		let (namespace, components) = split_key(&key).unwrap();
		assert_eq!(namespace, "orders");
		assert_eq!(components, vec!["a", "b c", "ü"]);

		let empty: [&str; 0] = [];
		let prefix = build_key("orders", &empty).unwrap();
		assert_eq!(split_key(&prefix).unwrap(), ("orders".to_string(), vec![]));
	}

	#[test]
	fn test_split_rejects_plain_strings() {
		for key in ["orders:abc", "", "\u{0}", "\u{0}\u{0}", "\u{0}orders\u{0}\u{0}abc\u{0}"] {
			assert!(split_key(key).is_err(), "{:?} accepted", key);
		}
	}
}
