//! HTTP host for chaincode invocations.
//!
//! Exposes the chaincode to local clients:
//! - `POST /invoke` with `{"function": "...", "args": ["..."]}`
//! - `GET /health`
//!
//! Both answer with the invocation response as JSON, using the response
//! status as the HTTP status.

use axum::{
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Json},
	routing::{get, post},
	Router,
};
use chaincode_config::ApiConfig;
use chaincode_core::{OrderChaincode, Operation};
use chaincode_types::Response;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state for the HTTP host.
#[derive(Clone)]
pub struct AppState {
	pub chaincode: Arc<OrderChaincode>,
}

/// Body of `POST /invoke`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeRequest {
	pub function: String,
	#[serde(default)]
	pub args: Vec<String>,
}

/// JSON rendering of an invocation response.
///
/// The payload is rendered as UTF-8, replacing invalid sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResponse {
	pub status: u16,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub message: String,
	pub payload: String,
}

impl From<Response> for InvokeResponse {
	fn from(response: Response) -> Self {
		Self {
			status: response.status.code(),
			message: response.message,
			payload: String::from_utf8_lossy(&response.payload).into_owned(),
		}
	}
}

impl IntoResponse for InvokeResponse {
	fn into_response(self) -> axum::response::Response {
		let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self)).into_response()
	}
}

/// Builds the router serving `chaincode`.
pub fn router(chaincode: Arc<OrderChaincode>) -> Router {
	Router::new()
		.route("/invoke", post(handle_invoke))
		.route("/health", get(handle_health))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive()),
		)
		.with_state(AppState { chaincode })
}

/// Serves invocations until Ctrl+C is received.
pub async fn start_server(
	api_config: ApiConfig,
	chaincode: Arc<OrderChaincode>,
) -> Result<(), Box<dyn std::error::Error>> {
	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Chaincode invocation endpoint listening on {}", bind_address);

	axum::serve(listener, router(chaincode))
		.with_graceful_shutdown(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::warn!(error = %e, "Failed to listen for shutdown signal");
			}
		})
		.await?;

	Ok(())
}

/// Handles POST /invoke requests.
async fn handle_invoke(
	State(state): State<AppState>,
	Json(request): Json<InvokeRequest>,
) -> InvokeResponse {
	let args: Vec<Vec<u8>> = request.args.into_iter().map(String::into_bytes).collect();
	state
		.chaincode
		.invoke(&request.function, &args)
		.await
		.into()
}

/// Handles GET /health requests.
async fn handle_health(State(state): State<AppState>) -> InvokeResponse {
	state
		.chaincode
		.invoke(Operation::Health.as_str(), &[])
		.await
		.into()
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::{to_bytes, Body};
	use axum::http::Request;
	use chaincode_storage::implementations::memory::MemoryStorage;
	use tower::ServiceExt;

	fn app() -> Router {
		router(Arc::new(OrderChaincode::new(Arc::new(MemoryStorage::new()))))
	}

	async fn invoke(app: &Router, body: serde_json::Value) -> (StatusCode, InvokeResponse) {
		let request = Request::builder()
			.method("POST")
			.uri("/invoke")
			.header("content-type", "application/json")
			.body(Body::from(body.to_string()))
			.unwrap();

		let response = app.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		(status, serde_json::from_slice(&bytes).unwrap())
	}

	#[tokio::test]
	async fn test_health_route() {
		let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
		let response = app().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);

		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let body: InvokeResponse = serde_json::from_slice(&bytes).unwrap();
		assert_eq!(body.payload, "Ok");
		assert!(body.message.is_empty());
	}

	#[tokio::test]
	async fn test_store_and_get_over_http() {
		let app = app();
		let order = r#"{"id":"o-1","name":"n","createdTs":"2021-01-01T00:00:00Z","amount":7}"#;

		let (status, body) = invoke(
			&app,
			serde_json::json!({"function": "StoreOrder", "args": [order]}),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body.payload, "");

		let (status, body) =
			invoke(&app, serde_json::json!({"function": "GetOrder", "args": ["o-1"]})).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body.payload, order);
	}

	#[tokio::test]
	async fn test_errors_map_to_500() {
		let app = app();

		let (status, body) = invoke(&app, serde_json::json!({"function": "Nope"})).await;
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body.status, 500);
		assert!(body.message.contains("StoreOrder"));

		let (status, body) = invoke(
			&app,
			serde_json::json!({"function": "StoreOrder", "args": ["not json"]}),
		)
		.await;
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert!(body.message.starts_with("Failed to unmarshal order"));
	}

	#[test]
	fn test_response_conversion() {
		let ok: InvokeResponse = Response::success(b"Ok".to_vec()).into();
		assert_eq!(
			ok,
			InvokeResponse {
				status: 200,
				message: String::new(),
				payload: "Ok".to_string(),
			}
		);

		let lossy: InvokeResponse = Response::success(vec![0x66, 0xff]).into();
		assert_eq!(lossy.payload, "f\u{FFFD}");
	}
}
