//! The configuration of the gas provider chain and of the `gasfill` command line interface.

use std::{
    fmt::Display,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::primitives::U256;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gasfill_common::{GasMultiplier, from_quantity};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

#[derive(Debug, Parser, Clone)]
#[command(name = "gasfill")]
pub struct Arguments {
    /// The JSON-RPC endpoint of the node to talk to.
    #[arg(long = "rpc-url", short, default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// A JSON file holding the gas configuration.
    ///
    /// When given, it replaces all of the gas options passed on the command line.
    #[arg(long = "config", short)]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub gas: GasConfiguration,

    #[command(subcommand)]
    pub command: Command,
}

impl Arguments {
    /// Resolves the gas configuration to use, preferring the config file over the command line.
    pub fn gas_configuration(&self) -> Result<GasConfiguration> {
        let configuration = match &self.config_file {
            Some(path) => GasConfiguration::from_file(path)?,
            None => self.gas.clone(),
        };
        configuration.validate()?;
        Ok(configuration)
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Runs the transaction through the gas providers and prints it instead of sending it.
    Fill {
        /// The transaction object, as JSON.
        #[arg(long = "transaction", short, value_parser = parse_transaction)]
        transaction: Map<String, Value>,
    },
    /// Runs the transaction through the gas providers and sends it with `eth_sendTransaction`.
    Send {
        /// The transaction object, as JSON.
        #[arg(long = "transaction", short, value_parser = parse_transaction)]
        transaction: Map<String, Value>,
    },
}

fn parse_transaction(value: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(value) {
        Ok(Value::Object(transaction)) => Ok(transaction),
        Ok(_) => Err("the transaction must be a JSON object".to_owned()),
        Err(error) => Err(format!("invalid transaction JSON: {error}")),
    }
}

/// How the provider chain fills in gas limits and gas prices.
///
/// The JSON form mirrors the network configuration used by Hardhat:
///
/// ```json
/// { "gas": "auto", "gasPrice": 1000000000, "gasMultiplier": 1.5 }
/// ```
#[derive(Clone, Debug, PartialEq, Args, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GasConfiguration {
    /// The gas limit given to transactions that don't specify one: `auto` or a fixed amount.
    #[arg(long = "gas", default_value = "auto")]
    pub gas: GasSetting,

    /// The gas price given to transactions that don't specify one: `auto` or a fixed amount.
    #[arg(long = "gas-price", default_value = "auto")]
    pub gas_price: GasSetting,

    /// The factor applied to gas estimates when `gas` is `auto`.
    #[arg(long = "gas-multiplier", default_value_t = 1.0)]
    pub gas_multiplier: f64,

    /// Probe the node for the legacy Ganache (TestRPC) backend and pad its gas estimates.
    #[arg(long = "detect-ganache", default_value_t = true, action = clap::ArgAction::Set)]
    pub detect_ganache: bool,
}

impl Default for GasConfiguration {
    fn default() -> Self {
        Self {
            gas: GasSetting::Auto,
            gas_price: GasSetting::Auto,
            gas_multiplier: 1.0,
            detect_ganache: true,
        }
    }
}

impl GasConfiguration {
    /// Reads the configuration from a JSON file. Missing fields take their default values.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open the gas configuration {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse the gas configuration {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.multiplier()?;
        Ok(())
    }

    pub fn multiplier(&self) -> Result<GasMultiplier> {
        GasMultiplier::new(self.gas_multiplier).context("Invalid gas configuration")
    }
}

/// Either let the providers work the value out, or use a fixed one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GasSetting {
    #[default]
    Auto,
    Fixed(U256),
}

impl FromStr for GasSetting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let value = if s.starts_with("0x") {
            from_quantity(s)?
        } else if s.is_empty() || !s.bytes().all(|byte| byte.is_ascii_digit()) {
            anyhow::bail!("Unsupported gas setting '{s}': expected 'auto' or a number")
        } else {
            U256::from_str_radix(s, 10).map_err(|_| {
                anyhow::anyhow!("Unsupported gas setting '{s}': too large for 256 bits")
            })?
        };
        Ok(Self::Fixed(value))
    }
}

impl Display for GasSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(value) => value.fmt(f),
        }
    }
}

impl Serialize for GasSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GasSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Going through `Value` keeps numbers larger than `u64` intact.
        let setting = match Value::deserialize(deserializer)? {
            Value::String(string) => string.parse(),
            Value::Number(number) => number.to_string().parse(),
            other => Err(anyhow::anyhow!(
                "Unsupported gas setting {other}: expected 'auto' or a number"
            )),
        };
        setting.map_err(serde::de::Error::custom)
    }
}
