use std::sync::atomic::{AtomicBool, Ordering};

use alloy::primitives::U256;
use futures::future::BoxFuture;
use gasfill_common::{
    names::{fields, methods},
    quantity_from_value, to_quantity,
};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument, trace};

use crate::{JsonRpcProvider, ProviderError, ProviderResult, ProviderWrapper, RpcRequest};

/// The number of consecutive full blocks the suggested max fee should survive.
///
/// The base fee grows by at most 1/8 per block, so paying `9^(W-1) / 8^(W-1)` times the next base
/// fee keeps the transaction includable if the next `W - 1` blocks are all full.
pub const MAX_FULL_BLOCKS_PREFERENCE: u32 = 3;

/// The reward percentile of the latest block used as the suggested priority fee.
pub const REWARD_PERCENTILE: f64 = 0.5;

const BASE_FEE_GROWTH_NUMERATOR: u64 = 9u64.pow(MAX_FULL_BLOCKS_PREFERENCE - 1);
const BASE_FEE_GROWTH_DENOMINATOR: u64 = 8u64.pow(MAX_FULL_BLOCKS_PREFERENCE - 1);

/// EIP-1559 fees suggested from the node's fee history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSuggestion {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

/// Fills in the fee fields of transactions that don't fully specify them.
///
/// EIP-1559 fees are suggested from `eth_feeHistory`. Once the node fails to answer that, it's
/// considered not to support it and the provider sticks to `eth_gasPrice` for the rest of its
/// lifetime. Fields the caller set are never overwritten.
#[derive(Debug)]
pub struct AutomaticGasPriceProvider<P> {
    inner: P,
    fee_history_unsupported: AtomicBool,
}

impl<P> AutomaticGasPriceProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            fee_history_unsupported: AtomicBool::new(false),
        }
    }
}

impl<P: JsonRpcProvider> AutomaticGasPriceProvider<P> {
    /// Suggests EIP-1559 fees, or [`None`] if the node doesn't support `eth_feeHistory`.
    #[instrument(level = "debug", skip(self))]
    pub async fn suggest_fees(&self) -> Option<FeeSuggestion> {
        if self.fee_history_unsupported.load(Ordering::Relaxed) {
            return None;
        }

        match self.fee_history_suggestion().await {
            Ok(suggestion) => Some(suggestion),
            Err(error) => {
                debug!(
                    %error,
                    "eth_feeHistory failed, falling back to legacy gas prices from now on"
                );
                self.fee_history_unsupported.store(true, Ordering::Relaxed);
                None
            }
        }
    }

    async fn fee_history_suggestion(&self) -> ProviderResult<FeeSuggestion> {
        let malformed = |reason| ProviderError::MalformedResponse {
            method: methods::FEE_HISTORY,
            reason,
        };

        let response = self
            .inner
            .request(RpcRequest::new(
                methods::FEE_HISTORY,
                vec![json!("0x1"), json!("latest"), json!([REWARD_PERCENTILE])],
            ))
            .await?;

        let next_base_fee = response
            .get(fields::BASE_FEE_PER_GAS)
            .and_then(|base_fees| base_fees.get(1))
            .ok_or_else(|| malformed("missing the next block's base fee"))?;
        let reward = response
            .get(fields::REWARD)
            .and_then(|rewards| rewards.get(0))
            .and_then(|percentiles| percentiles.get(0))
            .ok_or_else(|| malformed("missing the latest block's reward"))?;

        let next_base_fee = quantity_from_value(next_base_fee)?;
        let max_fee_per_gas = next_base_fee.saturating_mul(U256::from(BASE_FEE_GROWTH_NUMERATOR))
            / U256::from(BASE_FEE_GROWTH_DENOMINATOR);

        Ok(FeeSuggestion {
            max_fee_per_gas,
            max_priority_fee_per_gas: quantity_from_value(reward)?,
        })
    }

    async fn gas_price(&self) -> ProviderResult<U256> {
        let gas_price = self
            .inner
            .request(RpcRequest::new(methods::GAS_PRICE, vec![]))
            .await?;
        Ok(quantity_from_value(&gas_price)?)
    }

    async fn fill_fees(&self, request: &mut RpcRequest) -> ProviderResult<()> {
        let Some(transaction) = request.transaction() else {
            return Ok(());
        };
        if transaction.contains_key(fields::GAS_PRICE)
            || (transaction.contains_key(fields::MAX_FEE_PER_GAS)
                && transaction.contains_key(fields::MAX_PRIORITY_FEE_PER_GAS))
        {
            return Ok(());
        }
        let max_fee_per_gas = optional_quantity(transaction, fields::MAX_FEE_PER_GAS)?;
        let max_priority_fee_per_gas =
            optional_quantity(transaction, fields::MAX_PRIORITY_FEE_PER_GAS)?;

        let suggestion = match self.suggest_fees().await {
            Some(suggestion) => suggestion,
            None if max_fee_per_gas.is_none() && max_priority_fee_per_gas.is_none() => {
                let gas_price = self.gas_price().await?;
                trace!(%gas_price, "Setting the legacy gas price");
                set_quantity(request, fields::GAS_PRICE, gas_price);
                return Ok(());
            }
            None => {
                let gas_price = self.gas_price().await?;
                FeeSuggestion {
                    max_fee_per_gas: gas_price,
                    max_priority_fee_per_gas: gas_price,
                }
            }
        };

        let max_priority_fee_per_gas =
            max_priority_fee_per_gas.unwrap_or(suggestion.max_priority_fee_per_gas);
        let mut max_fee_per_gas = max_fee_per_gas.unwrap_or(suggestion.max_fee_per_gas);
        if max_fee_per_gas < max_priority_fee_per_gas {
            max_fee_per_gas = max_fee_per_gas.saturating_add(max_priority_fee_per_gas);
        }

        trace!(
            %max_fee_per_gas,
            %max_priority_fee_per_gas,
            "Setting the EIP-1559 fees"
        );
        set_quantity(request, fields::MAX_FEE_PER_GAS, max_fee_per_gas);
        set_quantity(
            request,
            fields::MAX_PRIORITY_FEE_PER_GAS,
            max_priority_fee_per_gas,
        );
        Ok(())
    }
}

fn optional_quantity(
    transaction: &Map<String, Value>,
    field: &str,
) -> ProviderResult<Option<U256>> {
    transaction
        .get(field)
        .map(quantity_from_value)
        .transpose()
        .map_err(Into::into)
}

fn set_quantity(request: &mut RpcRequest, field: &str, value: U256) {
    if let Some(transaction) = request.transaction_mut() {
        transaction.insert(field.to_owned(), Value::String(to_quantity(value)));
    }
}

impl<P: JsonRpcProvider> ProviderWrapper for AutomaticGasPriceProvider<P> {
    type Inner = P;

    fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: JsonRpcProvider> JsonRpcProvider for AutomaticGasPriceProvider<P> {
    fn request(&self, mut request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        Box::pin(async move {
            self.fill_fees(&mut request).await?;
            self.forward(request).await
        })
    }
}
