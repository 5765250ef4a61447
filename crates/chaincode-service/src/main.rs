//! Main entry point for the order chaincode host.
//!
//! Loads the configuration, opens the configured ledger state backend and
//! serves chaincode invocations over HTTP until interrupted.

use chaincode_config::Config;
use chaincode_core::OrderChaincode;
use chaincode_storage::LedgerStore;
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod server;

/// Command-line arguments for the chaincode host.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, env = "CHAINCODE_CONFIG", default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	// RUST_LOG wins over --log-level when set.
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.chaincode.id);

	let ledger = build_ledger(&config)?;
	let span = tracing::info_span!("chaincode", id = %config.chaincode.id);
	let chaincode = Arc::new(OrderChaincode::with_span(ledger, span));

	let init = chaincode.init();
	if !init.is_ok() {
		return Err(format!("Chaincode init failed: {}", init.message).into());
	}

	server::start_server(config.api.clone(), chaincode).await?;

	tracing::info!("Stopped chaincode host");
	Ok(())
}

/// Creates the primary ledger state backend named in the configuration.
fn build_ledger(config: &Config) -> Result<Arc<dyn LedgerStore>, Box<dyn std::error::Error>> {
	let factories: HashMap<_, _> = chaincode_storage::get_all_implementations()
		.into_iter()
		.collect();

	let name = config.storage.primary.as_str();
	let factory = factories
		.get(name)
		.ok_or_else(|| format!("Unknown storage implementation '{}'", name))?;
	let table = config
		.storage
		.primary_config()
		.ok_or_else(|| format!("Missing configuration for storage '{}'", name))?;

	let ledger = factory(table)?;
	tracing::info!(component = "storage", implementation = %name, "Loaded");

	Ok(Arc::from(ledger))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_build_file_ledger() {
		let dir = tempfile::tempdir().unwrap();
		let config: Config = format!(
			r#"
[chaincode]
id = "orders-cc"

[storage]
primary = "file"
[storage.implementations.file]
storage_path = "{}"
"#,
			dir.path().display()
		)
		.parse()
		.unwrap();

		let chaincode = OrderChaincode::new(build_ledger(&config).unwrap());
		let order = br#"{"id":"o-1","createdTs":"2021-01-01T00:00:00Z"}"#.to_vec();
		assert!(chaincode.invoke("StoreOrder", &[order.clone()]).await.is_ok());

		// A second host over the same directory sees the stored order.
		let reopened = OrderChaincode::new(build_ledger(&config).unwrap());
		let res = reopened.invoke("GetOrder", &[b"o-1".to_vec()]).await;
		assert_eq!(res.payload, order);
	}

	#[test]
	fn test_unknown_storage_implementation() {
		let config: Config = r#"
[chaincode]
id = "orders-cc"

[storage]
primary = "redis"
[storage.implementations.redis]
"#
		.parse()
		.unwrap();

		let err = build_ledger(&config).err().unwrap();
		assert!(err.to_string().contains("Unknown storage implementation 'redis'"));
	}

	#[test]
	fn test_args_defaults() {
		let args = Args::parse_from(["chaincode"]);
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}
}
