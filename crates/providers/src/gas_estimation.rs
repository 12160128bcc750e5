use alloy::primitives::U256;
pub use gasfill_common::{GasMultiplier, GasMultiplierError};
use gasfill_common::{
    names::{fields, methods},
    quantity_from_value, to_quantity,
};
use serde_json::{Value, json};
use tokio::sync::OnceCell;
use tracing::{debug, instrument, trace};

use crate::{JsonRpcProvider, ProviderError, ProviderResult, RpcRequest};

// The block gas limit is scaled down by 95/100 before estimates are clamped to it.
const BLOCK_GAS_LIMIT_NUMERATOR: u64 = 95;
const BLOCK_GAS_LIMIT_DENOMINATOR: u64 = 100;

/// Multiplies gas estimates and keeps them under the block gas limit.
///
/// The block gas limit is fetched the first time it's needed and then reused for the lifetime of
/// the estimator.
#[derive(Debug, Default)]
pub struct MultipliedGasEstimator {
    multiplier: GasMultiplier,
    block_gas_limit: OnceCell<U256>,
}

impl MultipliedGasEstimator {
    pub fn new(multiplier: GasMultiplier) -> Self {
        Self {
            multiplier,
            block_gas_limit: OnceCell::new(),
        }
    }

    pub fn multiplier(&self) -> GasMultiplier {
        self.multiplier
    }

    /// Estimates the gas of the transaction in `params` through `provider` and applies the
    /// multiplier to the estimate.
    ///
    /// The result is always below the block gas limit. When the node reports an execution error
    /// (the transaction would revert) the block gas limit is returned so that the transaction can
    /// still be sent and fail on-chain.
    #[instrument(level = "debug", skip_all, fields(multiplier = self.multiplier.value()))]
    pub async fn estimate<P>(&self, provider: &P, params: Vec<Value>) -> ProviderResult<Value>
    where
        P: JsonRpcProvider + ?Sized,
    {
        let estimate = match provider
            .request(RpcRequest::new(methods::ESTIMATE_GAS, params))
            .await
        {
            Ok(estimate) => estimate,
            Err(error) if error.is_execution_error() => {
                let block_gas_limit = self.block_gas_limit(provider).await?;
                debug!(
                    %error,
                    %block_gas_limit,
                    "Gas estimation failed with an execution error, using the block gas limit"
                );
                return Ok(Value::String(to_quantity(block_gas_limit)));
            }
            Err(error) => return Err(error),
        };

        if self.multiplier.is_one() {
            return Ok(estimate);
        }

        let estimate = quantity_from_value(&estimate)?;
        let block_gas_limit = self.block_gas_limit(provider).await?;
        let multiplied = self.multiplier.apply(estimate);
        let gas = if multiplied >= block_gas_limit {
            block_gas_limit.saturating_sub(U256::from(1u64))
        } else {
            multiplied
        };
        trace!(%estimate, %multiplied, %gas, "Multiplied the gas estimate");

        Ok(Value::String(to_quantity(gas)))
    }

    /// The latest block's gas limit scaled by 95/100, fetched once and cached.
    pub async fn block_gas_limit<P>(&self, provider: &P) -> ProviderResult<U256>
    where
        P: JsonRpcProvider + ?Sized,
    {
        self.block_gas_limit
            .get_or_try_init(|| async {
                let block = provider
                    .request(RpcRequest::new(
                        methods::GET_BLOCK_BY_NUMBER,
                        vec![json!("latest"), json!(false)],
                    ))
                    .await?;
                let gas_limit = block.get(fields::GAS_LIMIT).ok_or(
                    ProviderError::MalformedResponse {
                        method: methods::GET_BLOCK_BY_NUMBER,
                        reason: "the latest block has no gasLimit",
                    },
                )?;
                let gas_limit = quantity_from_value(gas_limit)?;
                let scaled = gas_limit.saturating_mul(U256::from(BLOCK_GAS_LIMIT_NUMERATOR))
                    / U256::from(BLOCK_GAS_LIMIT_DENOMINATOR);
                debug!(%gas_limit, block_gas_limit = %scaled, "Cached the block gas limit");
                Ok::<_, ProviderError>(scaled)
            })
            .await
            .copied()
    }
}
