//! Core of the order chaincode.
//!
//! [`OrderChaincode`] receives one invocation at a time (an operation name
//! plus byte arguments), routes it to the matching handler and turns the
//! outcome into a uniform [`Response`]. All persistent state lives in the
//! [`LedgerStore`] it was built with.

use chaincode_storage::{LedgerStore, StorageError};
use chaincode_types::{KeyError, Response, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, Span};

pub mod dispatch;
pub mod handlers;

pub use dispatch::{DispatchError, Operation};
use handlers::{HealthHandler, OrderHandler};

/// Errors that can occur while handling an invocation.
#[derive(Debug, Error)]
pub enum ChaincodeError {
	/// The operation name is not supported.
	#[error(transparent)]
	Dispatch(#[from] DispatchError),
	/// The input is not a well-formed order.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// The ledger key could not be built.
	#[error(transparent)]
	Key(#[from] KeyError),
	/// The ledger rejected a read or write.
	#[error("Failed to {action} order data for id '{id}': {source}")]
	Storage {
		action: &'static str,
		id: String,
		source: StorageError,
	},
}

/// The order chaincode.
///
/// Holds no state between invocations; it can be shared behind an `Arc`
/// and invoked concurrently.
pub struct OrderChaincode {
	health: HealthHandler,
	orders: OrderHandler,
	/// Logging context every invocation runs in.
	span: Span,
}

impl OrderChaincode {
	/// Creates a chaincode over `ledger` logging under a `chaincode` span.
	pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
		Self::with_span(ledger, tracing::info_span!("chaincode"))
	}

	/// Creates a chaincode over `ledger` logging under `span`.
	pub fn with_span(ledger: Arc<dyn LedgerStore>, span: Span) -> Self {
		Self {
			health: HealthHandler,
			orders: OrderHandler::new(ledger),
			span,
		}
	}

	/// Instantiation hook. There is nothing to initialize.
	pub fn init(&self) -> Response {
		self.span.in_scope(|| tracing::info!("Chaincode initialized"));
		Response::success(Vec::new())
	}

	/// Handles one invocation.
	///
	/// `args[0]` is the operation's input; further arguments are ignored.
	/// A missing argument is treated as empty input. Every error becomes an
	/// error response carrying its message.
	pub async fn invoke(&self, function: &str, args: &[Vec<u8>]) -> Response {
		let span = tracing::info_span!(parent: &self.span, "invoke", operation = %function);

		async {
			match self.dispatch(function, args).await {
				Ok(payload) => Response::success(payload),
				Err(e) => {
					tracing::error!(error = %e, "Invocation failed");
					Response::error(e.to_string())
				},
			}
		}
		.instrument(span)
		.await
	}

	async fn dispatch(&self, function: &str, args: &[Vec<u8>]) -> Result<Vec<u8>, ChaincodeError> {
		let input = args.first().map(Vec::as_slice).unwrap_or_default();

		match function.parse::<Operation>()? {
			Operation::Health => Ok(self.health.check()),
			Operation::StoreOrder => {
				self.orders.store(input).await?;
				Ok(Vec::new())
			},
			Operation::GetOrder => self.orders.get(input).await,
		}
	}
}
