use alloy::rpc::client::{ClientBuilder, RpcClient};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::trace;

use crate::{JsonRpcProvider, ProviderError, ProviderResult, RpcRequest};

/// The innermost provider of a chain: sends requests to a node over alloy's RPC client.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: RpcClient,
}

impl HttpTransport {
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let client = ClientBuilder::default()
            .connect(rpc_url)
            .await
            .with_context(|| format!("Failed to construct the RPC client for {rpc_url}"))?;
        Ok(Self::new(client))
    }

    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }
}

impl JsonRpcProvider for HttpTransport {
    fn request(&self, request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        let RpcRequest { method, params } = request;
        trace!(%method, "Sending request to the node");
        let call = self.client.request::<_, Value>(method, params);
        Box::pin(async move { call.await.map_err(ProviderError::from) })
    }
}
