//! Names of the JSON-RPC methods and transaction object fields the providers act on.

pub mod methods {
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const ESTIMATE_GAS: &str = "eth_estimateGas";
    pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
    pub const GAS_PRICE: &str = "eth_gasPrice";
    pub const FEE_HISTORY: &str = "eth_feeHistory";
    pub const CLIENT_VERSION: &str = "web3_clientVersion";
}

pub mod fields {
    pub const GAS: &str = "gas";
    pub const GAS_PRICE: &str = "gasPrice";
    pub const MAX_FEE_PER_GAS: &str = "maxFeePerGas";
    pub const MAX_PRIORITY_FEE_PER_GAS: &str = "maxPriorityFeePerGas";

    /// Block object field holding the block's gas limit.
    pub const GAS_LIMIT: &str = "gasLimit";

    /// Fee history response fields.
    pub const BASE_FEE_PER_GAS: &str = "baseFeePerGas";
    pub const REWARD: &str = "reward";
}
