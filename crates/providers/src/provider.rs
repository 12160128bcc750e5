use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::{ProviderResult, RpcRequest};

/// Anything that can answer a JSON-RPC request: a transport, or a wrapper around another provider.
pub trait JsonRpcProvider: Send + Sync {
    fn request(&self, request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>>;
}

impl<P: JsonRpcProvider + ?Sized> JsonRpcProvider for &P {
    fn request(&self, request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        (**self).request(request)
    }
}

impl<P: JsonRpcProvider + ?Sized> JsonRpcProvider for Box<P> {
    fn request(&self, request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        (**self).request(request)
    }
}

impl<P: JsonRpcProvider + ?Sized> JsonRpcProvider for Arc<P> {
    fn request(&self, request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        (**self).request(request)
    }
}

/// A provider that decorates another one.
///
/// Requests a wrapper doesn't act on should go through [`ProviderWrapper::forward`] untouched.
pub trait ProviderWrapper {
    type Inner: JsonRpcProvider;

    fn inner(&self) -> &Self::Inner;

    fn forward(&self, request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        self.inner().request(request)
    }
}
