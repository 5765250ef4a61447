//! Liveness check.

/// Payload returned by a healthy chaincode.
pub const HEALTHY: &[u8] = b"Ok";

/// Handler for the `Health` operation.
///
/// Arguments are ignored and the ledger is never touched.
#[derive(Debug, Default, Clone, Copy)]
pub struct HealthHandler;

impl HealthHandler {
	pub fn check(&self) -> Vec<u8> {
		tracing::info!("Chaincode is healthy");
		HEALTHY.to_vec()
	}
}
