//! Uniform response returned by every invocation.

/// Outcome of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	Ok,
	Error,
}

impl Status {
	/// Numeric status code reported to the caller.
	pub fn code(&self) -> u16 {
		match self {
			Status::Ok => 200,
			Status::Error => 500,
		}
	}
}

/// Response produced for a single invocation.
///
/// Successful responses carry a payload and no message; failed responses
/// carry a human-readable message and an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
	pub status: Status,
	pub message: String,
	pub payload: Vec<u8>,
}

impl Response {
	/// Creates a successful response carrying `payload`.
	pub fn success(payload: impl Into<Vec<u8>>) -> Self {
		Self {
			status: Status::Ok,
			message: String::new(),
			payload: payload.into(),
		}
	}

	/// Creates a failed response carrying `message`.
	pub fn error(message: impl Into<String>) -> Self {
		Self {
			status: Status::Error,
			message: message.into(),
			payload: Vec::new(),
		}
	}

	pub fn is_ok(&self) -> bool {
		self.status == Status::Ok
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_constructors() {
		let ok = Response::success("Ok");
		assert!(ok.is_ok());
		assert_eq!(ok.status.code(), 200);
		assert_eq!(ok.payload, b"Ok");
		assert!(ok.message.is_empty());

		let err = Response::error("boom");
		assert!(!err.is_ok());
		assert_eq!(err.status.code(), 500);
		assert_eq!(err.message, "boom");
		assert!(err.payload.is_empty());
	}
}
