use alloy::transports::{RpcError, TransportError};
use gasfill_common::{GasMultiplierError, QuantityError};
use serde_json::Value;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request never got a well-formed JSON-RPC response.
    #[error(transparent)]
    Transport(TransportError),

    /// The node answered with a JSON-RPC error object.
    #[error("{message} (code {code})")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    #[error(transparent)]
    MalformedQuantity(#[from] QuantityError),

    /// The node answered successfully but the result lacks a field the providers rely on.
    #[error("malformed {method} response: {reason}")]
    MalformedResponse {
        method: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    InvalidGasMultiplier(#[from] GasMultiplierError),
}

impl ProviderError {
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Whether the error reports that the transaction reverted during gas estimation.
    ///
    /// Nodes don't agree on an error code for this, so the message is matched instead.
    pub fn is_execution_error(&self) -> bool {
        let message = match self {
            Self::Rpc { message, .. } => message.to_lowercase(),
            other => other.to_string().to_lowercase(),
        };
        message.contains("execution error")
    }
}

impl From<TransportError> for ProviderError {
    fn from(error: TransportError) -> Self {
        match error {
            RpcError::ErrorResp(payload) => Self::Rpc {
                code: payload.code,
                message: payload.message.into_owned(),
                data: payload
                    .data
                    .and_then(|data| serde_json::from_str(data.get()).ok()),
            },
            other => Self::Transport(other),
        }
    }
}
