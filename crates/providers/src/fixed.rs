use alloy::primitives::U256;
use futures::future::BoxFuture;
use gasfill_common::{names::fields, to_quantity};
use serde_json::Value;
use tracing::trace;

use crate::{JsonRpcProvider, ProviderResult, ProviderWrapper, RpcRequest};

/// Gives transactions that don't specify a gas limit a fixed one.
#[derive(Debug)]
pub struct FixedGasProvider<P> {
    inner: P,
    gas_limit: U256,
}

impl<P> FixedGasProvider<P> {
    pub fn new(inner: P, gas_limit: U256) -> Self {
        Self { inner, gas_limit }
    }
}

impl<P: JsonRpcProvider> ProviderWrapper for FixedGasProvider<P> {
    type Inner = P;

    fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: JsonRpcProvider> JsonRpcProvider for FixedGasProvider<P> {
    fn request(&self, mut request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        if let Some(transaction) = request.transaction_mut() {
            if !transaction.contains_key(fields::GAS) {
                trace!(gas = %self.gas_limit, "Setting the fixed gas limit");
                transaction.insert(
                    fields::GAS.to_owned(),
                    Value::String(to_quantity(self.gas_limit)),
                );
            }
        }
        self.forward(request)
    }
}

/// Gives transactions that don't specify any fee field a fixed legacy gas price.
///
/// A transaction carrying any one of `gasPrice`, `maxFeePerGas` or `maxPriorityFeePerGas` is left
/// alone so legacy and EIP-1559 fields never end up mixed.
#[derive(Debug)]
pub struct FixedGasPriceProvider<P> {
    inner: P,
    gas_price: U256,
}

impl<P> FixedGasPriceProvider<P> {
    pub fn new(inner: P, gas_price: U256) -> Self {
        Self { inner, gas_price }
    }
}

impl<P: JsonRpcProvider> ProviderWrapper for FixedGasPriceProvider<P> {
    type Inner = P;

    fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: JsonRpcProvider> JsonRpcProvider for FixedGasPriceProvider<P> {
    fn request(&self, mut request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        if let Some(transaction) = request.transaction_mut() {
            let has_fee_field = [
                fields::GAS_PRICE,
                fields::MAX_FEE_PER_GAS,
                fields::MAX_PRIORITY_FEE_PER_GAS,
            ]
            .into_iter()
            .any(|field| transaction.contains_key(field));

            if !has_fee_field {
                trace!(gas_price = %self.gas_price, "Setting the fixed gas price");
                transaction.insert(
                    fields::GAS_PRICE.to_owned(),
                    Value::String(to_quantity(self.gas_price)),
                );
            }
        }
        self.forward(request)
    }
}
