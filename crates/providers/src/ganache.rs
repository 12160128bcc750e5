use futures::future::BoxFuture;
use gasfill_common::names::methods;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    GasMultiplier, JsonRpcProvider, MultipliedGasEstimator, ProviderError, ProviderResult,
    ProviderWrapper, RpcRequest,
};

/// Legacy Ganache (TestRPC) underestimates gas, so its estimates are multiplied by this factor.
pub const GANACHE_GAS_MULTIPLIER: GasMultiplier = GasMultiplier::whole(5);

const GANACHE_CLIENT_VERSION_MARKER: &str = "TestRPC";

/// Pads the gas estimates of legacy Ganache nodes.
///
/// The node is identified through `web3_clientVersion` the first time a gas estimate is requested
/// and the answer is kept for the lifetime of the provider.
#[derive(Debug)]
pub struct GanacheGasMultiplierProvider<P> {
    inner: P,
    estimator: MultipliedGasEstimator,
    is_ganache: OnceCell<bool>,
}

impl<P> GanacheGasMultiplierProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            estimator: MultipliedGasEstimator::new(GANACHE_GAS_MULTIPLIER),
            is_ganache: OnceCell::new(),
        }
    }
}

impl<P: JsonRpcProvider> GanacheGasMultiplierProvider<P> {
    pub async fn is_ganache(&self) -> ProviderResult<bool> {
        self.is_ganache
            .get_or_try_init(|| async {
                let version = self
                    .inner
                    .request(RpcRequest::new(methods::CLIENT_VERSION, vec![]))
                    .await?;
                let is_ganache = version
                    .as_str()
                    .is_some_and(|version| version.contains(GANACHE_CLIENT_VERSION_MARKER));
                debug!(%version, is_ganache, "Identified the node");
                Ok::<_, ProviderError>(is_ganache)
            })
            .await
            .copied()
    }
}

impl<P: JsonRpcProvider> ProviderWrapper for GanacheGasMultiplierProvider<P> {
    type Inner = P;

    fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: JsonRpcProvider> JsonRpcProvider for GanacheGasMultiplierProvider<P> {
    fn request(&self, request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        Box::pin(async move {
            if request.is(methods::ESTIMATE_GAS) && self.is_ganache().await? {
                return self.estimator.estimate(&self.inner, request.params).await;
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

    fn estimate_gas() -> RpcRequest {
        RpcRequest::new("eth_estimateGas", vec![json!({ "data": "0x" })])
    }

    fn node(client_version: &str) -> Arc<ScriptedProvider> {
        Arc::new(
            ScriptedProvider::new()
                .with_response("web3_clientVersion", json!(client_version))
                .with_response("eth_estimateGas", json!("0x5208"))
                .with_block_gas_limit(30_000_000),
        )
    }

    #[tokio::test]
    async fn ganache_estimates_are_multiplied_by_five() {
        // Arrange
        let node = node("EthereumJS TestRPC/v2.1.0/ethereum-js");
        let provider = GanacheGasMultiplierProvider::new(node.clone());

        // Act
        let first = provider.request(estimate_gas()).await.unwrap();
        let second = provider.request(estimate_gas()).await.unwrap();

        // Assert
        assert_eq!(first, json!("0x19a28"));
        assert_eq!(second, json!("0x19a28"));
        assert_eq!(node.call_count("web3_clientVersion"), 1);
        assert_eq!(node.call_count("eth_getBlockByNumber"), 1);
    }

    #[tokio::test]
    async fn other_nodes_get_raw_estimates() {
        // Arrange
        let node = node("Geth/v1.13.14-stable/linux-amd64/go1.21.7");
        let provider = GanacheGasMultiplierProvider::new(node.clone());

        // Act
        let first = provider.request(estimate_gas()).await.unwrap();
        let second = provider.request(estimate_gas()).await.unwrap();

        // Assert
        assert_eq!(first, json!("0x5208"));
        assert_eq!(second, json!("0x5208"));
        assert_eq!(node.call_count("web3_clientVersion"), 1);
        assert_eq!(node.call_count("eth_getBlockByNumber"), 0);
    }

    #[tokio::test]
    async fn other_methods_do_not_probe_the_node() {
        let node = node("EthereumJS TestRPC/v2.1.0/ethereum-js");
        let provider = GanacheGasMultiplierProvider::new(node.clone());

        let version = provider
            .request(RpcRequest::new("web3_clientVersion", vec![]))
            .await
            .unwrap();

        assert_eq!(version, json!("EthereumJS TestRPC/v2.1.0/ethereum-js"));
        assert_eq!(node.call_count("web3_clientVersion"), 1);
        assert!(provider.is_ganache.get().is_none());
    }

    #[tokio::test]
    async fn failed_probes_are_retried() {
        let node = Arc::new(
            ScriptedProvider::new().with_error("web3_clientVersion", -32000, "node is syncing"),
        );
        let provider = GanacheGasMultiplierProvider::new(node.clone());

        assert!(provider.request(estimate_gas()).await.is_err());
        assert!(provider.request(estimate_gas()).await.is_err());
        assert_eq!(node.call_count("web3_clientVersion"), 2);
        assert_eq!(node.call_count("eth_estimateGas"), 0);
    }
}
