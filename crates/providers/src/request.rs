use gasfill_common::names::methods;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON-RPC request as it travels through the provider chain.
///
/// Providers take the request by value and may rewrite the transaction object in the first
/// parameter before forwarding it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    pub fn is(&self, method: &str) -> bool {
        self.method == method
    }

    /// The first positional parameter, if there is one.
    pub fn first_param(&self) -> Option<&Value> {
        self.params.first()
    }

    /// The transaction object of an `eth_sendTransaction` request.
    ///
    /// Returns [`None`] for every other method and when the first parameter is missing or isn't a
    /// JSON object.
    pub fn transaction(&self) -> Option<&Map<String, Value>> {
        if !self.is(methods::SEND_TRANSACTION) {
            return None;
        }
        self.first_param().and_then(Value::as_object)
    }

    pub fn transaction_mut(&mut self) -> Option<&mut Map<String, Value>> {
        if !self.is(methods::SEND_TRANSACTION) {
            return None;
        }
        self.params.first_mut().and_then(Value::as_object_mut)
    }
}
