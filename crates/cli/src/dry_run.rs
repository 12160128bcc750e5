use futures::future::BoxFuture;
use gasfill_common::names::methods;
use gasfill_providers::{JsonRpcProvider, ProviderResult, ProviderWrapper, RpcRequest};
use serde_json::Value;
use tracing::debug;

/// Answers `eth_sendTransaction` with the transaction object it was given instead of sending it.
///
/// Every other request, including the ones the gas providers make, reaches the node.
pub struct DryRunTransport<P> {
    inner: P,
}

impl<P> DryRunTransport<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: JsonRpcProvider> ProviderWrapper for DryRunTransport<P> {
    type Inner = P;

    fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: JsonRpcProvider> JsonRpcProvider for DryRunTransport<P> {
    fn request(&self, request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        if !request.is(methods::SEND_TRANSACTION) {
            return self.forward(request);
        }
        debug!("Holding back eth_sendTransaction");
        let transaction = request.params.into_iter().next().unwrap_or(Value::Null);
        Box::pin(async move { Ok(transaction) })
    }
}
