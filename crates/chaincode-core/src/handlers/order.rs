//! Order handler for storing and reading order records.
//!
//! Orders are validated on the way in and stored as the exact bytes the
//! client sent. Reads return the stored bytes without decoding them.

use crate::ChaincodeError;
use chaincode_storage::LedgerStore;
use chaincode_types::{build_key, decode_order, split_key, KeyError, Namespace};
use std::sync::Arc;
use tracing::{instrument, Span};

/// Handler for the `StoreOrder` and `GetOrder` operations.
pub struct OrderHandler {
	ledger: Arc<dyn LedgerStore>,
}

impl OrderHandler {
	pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
		Self { ledger }
	}

	/// Validates `input` as an order and stores it under the order's key.
	///
	/// Nothing is written unless the input decodes and its id forms a valid
	/// key. At most one write is issued.
	#[instrument(skip_all, fields(order_id = tracing::field::Empty))]
	pub async fn store(&self, input: &[u8]) -> Result<(), ChaincodeError> {
		tracing::info!(
			order = %String::from_utf8_lossy(input),
			"Order submitted"
		);

		let order = decode_order(input)?;
		Span::current().record("order_id", order.id.as_str());

		let key = order_key(&order.id)?;

		self.ledger
			.put_state(&key, input.to_vec())
			.await
			.map_err(|source| ChaincodeError::Storage {
				action: "store",
				id: order.id.clone(),
				source,
			})?;

		tracing::info!("Order stored");
		Ok(())
	}

	/// Returns the bytes stored for the order `id`.
	///
	/// An order that was never stored yields an empty payload.
	#[instrument(skip_all, fields(order_id = %String::from_utf8_lossy(id)))]
	pub async fn get(&self, id: &[u8]) -> Result<Vec<u8>, ChaincodeError> {
		let id = std::str::from_utf8(id).map_err(|_| KeyError::InvalidComponent {
			components: vec![String::from_utf8_lossy(id).into_owned()],
			reason: "component 0 is not valid UTF-8".to_string(),
		})?;

		let key = order_key(id)?;

		let stored = self
			.ledger
			.get_state(&key)
			.await
			.map_err(|source| ChaincodeError::Storage {
				action: "read",
				id: id.to_string(),
				source,
			})?;

		match stored {
			Some(bytes) => {
				tracing::info!(bytes = bytes.len(), "Order read");
				Ok(bytes)
			},
			None => {
				tracing::info!("No order stored");
				Ok(Vec::new())
			},
		}
	}
}

fn order_key(id: &str) -> Result<String, KeyError> {
	let key = build_key(Namespace::Orders.as_str(), &[id])?;
	let (namespace, components) = split_key(&key)?;
	tracing::debug!(%namespace, ?components, key = ?key, "Composite key");
	Ok(key)
}
