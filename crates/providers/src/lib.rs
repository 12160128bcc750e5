//! Provider wrappers that sit between a caller and a JSON-RPC transport and fill in the gas limit
//! and fee fields of outgoing `eth_sendTransaction` requests.
//!
//! Every wrapper implements [`JsonRpcProvider`] and owns the provider it forwards to, so a chain is
//! built by nesting them, innermost first:
//!
//! ```rust,ignore
//! let transport = HttpTransport::connect("http://127.0.0.1:8545").await?;
//! let provider = AutomaticGasProvider::new(
//!     AutomaticGasPriceProvider::new(GanacheGasMultiplierProvider::new(transport)),
//!     GasMultiplier::new(1.5)?,
//! );
//! ```
//!
//! [`wrap_provider`] builds the same chain out of a [`GasConfiguration`].
//!
//! [`GasConfiguration`]: gasfill_config::GasConfiguration

mod automatic_gas;
mod automatic_gas_price;
mod chain;
mod error;
mod fixed;
mod ganache;
mod gas_estimation;
mod provider;
mod request;
mod transport;

#[cfg(test)]
mod testing;

pub use automatic_gas::*;
pub use automatic_gas_price::*;
pub use chain::*;
pub use error::*;
pub use fixed::*;
pub use ganache::*;
pub use gas_estimation::*;
pub use provider::*;
pub use request::*;
pub use transport::*;
