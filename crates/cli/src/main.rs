mod dry_run;

use anyhow::{Context, Result};
use clap::Parser;
use gasfill_common::names::methods;
use gasfill_config::{Arguments, Command};
use gasfill_providers::{HttpTransport, RpcRequest, wrap_provider};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::dry_run::DryRunTransport;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set the tracing subscriber")?;

    let args = Arguments::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed building the runtime")?
        .block_on(run(args))
}

async fn run(args: Arguments) -> Result<()> {
    let configuration = args.gas_configuration()?;
    let transport = HttpTransport::connect(&args.rpc_url).await?;
    info!(rpc_url = %args.rpc_url, "Connected to the node");

    match args.command {
        Command::Fill { transaction } => {
            let provider = wrap_provider(DryRunTransport::new(transport), &configuration)?;
            let filled = provider
                .request(send_transaction(transaction))
                .await
                .context("Failed to fill in the transaction")?;
            println!("{}", serde_json::to_string_pretty(&filled)?);
        }
        Command::Send { transaction } => {
            let provider = wrap_provider(transport, &configuration)?;
            let hash = provider
                .request(send_transaction(transaction))
                .await
                .context("Failed to send the transaction")?;
            info!(%hash, "Sent the transaction");
            println!("{}", transaction_hash(&hash)?);
        }
    }

    Ok(())
}

fn send_transaction(transaction: serde_json::Map<String, Value>) -> RpcRequest {
    RpcRequest::new(methods::SEND_TRANSACTION, vec![Value::Object(transaction)])
}

fn transaction_hash(result: &Value) -> Result<&str> {
    result
        .as_str()
        .with_context(|| format!("The node returned {result} instead of a transaction hash"))
}
