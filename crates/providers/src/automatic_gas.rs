use futures::future::BoxFuture;
use gasfill_common::names::fields;
use serde_json::Value;
use tracing::debug;

use crate::{
    GasMultiplier, JsonRpcProvider, MultipliedGasEstimator, ProviderResult, ProviderWrapper,
    RpcRequest,
};

/// Gives transactions that don't specify a gas limit the node's estimate, scaled by a multiplier.
#[derive(Debug)]
pub struct AutomaticGasProvider<P> {
    inner: P,
    estimator: MultipliedGasEstimator,
}

impl<P> AutomaticGasProvider<P> {
    pub fn new(inner: P, multiplier: GasMultiplier) -> Self {
        Self {
            inner,
            estimator: MultipliedGasEstimator::new(multiplier),
        }
    }
}

impl<P: JsonRpcProvider> ProviderWrapper for AutomaticGasProvider<P> {
    type Inner = P;

    fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: JsonRpcProvider> JsonRpcProvider for AutomaticGasProvider<P> {
    fn request(&self, mut request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        Box::pin(async move {
            let needs_gas = request
                .transaction()
                .is_some_and(|transaction| !transaction.contains_key(fields::GAS));

            if needs_gas {
                let gas = self
                    .estimator
                    .estimate(&self.inner, request.params.clone())
                    .await?;
                debug!(%gas, "Setting the estimated gas limit");
                if let Some(transaction) = request.transaction_mut() {
                    transaction.insert(fields::GAS.to_owned(), gas);
                }
            }

            self.forward(request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedProvider;

    fn send_transaction(transaction: Value) -> RpcRequest {
        RpcRequest::new("eth_sendTransaction", vec![transaction])
    }

    #[tokio::test]
    async fn missing_gas_is_estimated() {
        // Arrange
        let node =
            Arc::new(ScriptedProvider::new().with_response("eth_estimateGas", json!("0x5208")));
        let provider = AutomaticGasProvider::new(node.clone(), GasMultiplier::ONE);
        let transaction = json!({ "to": "0x0000000000000000000000000000000000000002" });

        // Act
        provider
            .request(send_transaction(transaction.clone()))
            .await
            .unwrap();

        // Assert
        assert_eq!(
            node.requests_for("eth_estimateGas")[0].params,
            vec![transaction]
        );
        assert_eq!(
            node.last_sent_transaction().get("gas"),
            Some(&json!("0x5208"))
        );
    }

    #[tokio::test]
    async fn estimates_are_multiplied() {
        // Arrange
        let node = Arc::new(
            ScriptedProvider::new()
                .with_response("eth_estimateGas", json!("0x5208"))
                .with_block_gas_limit(30_000_000),
        );
        let provider = AutomaticGasProvider::new(node.clone(), GasMultiplier::whole(2));

        // Act
        provider.request(send_transaction(json!({}))).await.unwrap();

        // Assert
        assert_eq!(
            node.last_sent_transaction().get("gas"),
            Some(&json!("0xa410"))
        );
    }

    #[tokio::test]
    async fn transactions_with_gas_are_untouched() {
        // Arrange
        let node =
            Arc::new(ScriptedProvider::new().with_response("eth_estimateGas", json!("0x5208")));
        let provider = AutomaticGasProvider::new(node.clone(), GasMultiplier::whole(3));
        let transaction = json!({ "gas": "0x10", "data": "0xdeadbeef" });

        // Act
        provider
            .request(send_transaction(transaction.clone()))
            .await
            .unwrap();

        // Assert
        assert_eq!(node.call_count("eth_estimateGas"), 0);
        assert_eq!(Value::Object(node.last_sent_transaction()), transaction);
    }

    #[tokio::test]
    async fn estimation_failures_abort_the_send() {
        let node = Arc::new(
            ScriptedProvider::new().with_error(
                "eth_estimateGas",
                -32000,
                "gas required exceeds allowance",
            ),
        );
        let provider = AutomaticGasProvider::new(node.clone(), GasMultiplier::ONE);

        let result = provider.request(send_transaction(json!({}))).await;

        assert!(result.is_err());
        assert_eq!(node.call_count("eth_sendTransaction"), 0);
    }

    #[tokio::test]
    async fn reverting_transactions_get_the_block_gas_limit() {
        let node = Arc::new(
            ScriptedProvider::new()
                .with_error("eth_estimateGas", -32015, "execution error")
                .with_block_gas_limit(10_000_000),
        );
        let provider = AutomaticGasProvider::new(node.clone(), GasMultiplier::ONE);

        provider.request(send_transaction(json!({}))).await.unwrap();

        assert_eq!(
            node.last_sent_transaction().get("gas"),
            Some(&json!("0x90f560"))
        );
    }
}
