//! An in-memory provider for tests that answers from a script and records what it was asked.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use alloy::primitives::U256;
use futures::future::BoxFuture;
use gasfill_common::to_quantity;
use serde_json::{Map, Value, json};

use crate::{JsonRpcProvider, ProviderError, ProviderResult, RpcRequest};

pub const TRANSACTION_HASH: &str =
    "0xabababababababababababababababababababababababababababababababab";

type Responder = Arc<dyn Fn(&RpcRequest) -> ProviderResult<Value> + Send + Sync>;

pub struct ScriptedProvider {
    responders: HashMap<String, Responder>,
    requests: Mutex<Vec<RpcRequest>>,
}

impl ScriptedProvider {
    /// A provider that only knows how to answer `eth_sendTransaction`.
    pub fn new() -> Self {
        Self {
            responders: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
        .with_response("eth_sendTransaction", json!(TRANSACTION_HASH))
    }

    pub fn with_responder(
        mut self,
        method: &str,
        responder: impl Fn(&RpcRequest) -> ProviderResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.responders
            .insert(method.to_owned(), Arc::new(responder));
        self
    }

    pub fn with_response(self, method: &str, response: Value) -> Self {
        self.with_responder(method, move |_| Ok(response.clone()))
    }

    pub fn with_error(self, method: &str, code: i64, message: &str) -> Self {
        let message = message.to_owned();
        self.with_responder(method, move |_| Err(ProviderError::rpc(code, message.clone())))
    }

    pub fn with_block_gas_limit(self, gas_limit: u64) -> Self {
        self.with_response(
            "eth_getBlockByNumber",
            json!({
                "number": "0x10",
                "gasLimit": to_quantity(U256::from(gas_limit)),
            }),
        )
    }

    pub fn requests(&self) -> Vec<RpcRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, method: &str) -> Vec<RpcRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.is(method))
            .collect()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.requests_for(method).len()
    }

    /// The transaction objects of every `eth_sendTransaction` that reached this provider.
    pub fn sent_transactions(&self) -> Vec<Map<String, Value>> {
        self.requests_for("eth_sendTransaction")
            .iter()
            .filter_map(|request| request.transaction().cloned())
            .collect()
    }

    pub fn last_sent_transaction(&self) -> Map<String, Value> {
        self.sent_transactions()
            .pop()
            .expect("No transaction was sent")
    }
}

impl JsonRpcProvider for ScriptedProvider {
    fn request(&self, request: RpcRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        self.requests.lock().unwrap().push(request.clone());
        let response = match self.responders.get(&request.method) {
            Some(responder) => responder(&request),
            None => Err(ProviderError::rpc(
                -32601,
                format!("the method {} does not exist/is not available", request.method),
            )),
        };
        Box::pin(async move { response })
    }
}
