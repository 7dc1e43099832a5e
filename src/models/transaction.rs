use serde::{Deserialize, Serialize};

/// A transaction touching a queried address, projected from a scanned block.
///
/// `value` and `gas_price` are passed through exactly as the node sent them;
/// the integer fields are decoded from hex quantities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub from: String,
    /// Empty for contract creation
    pub to: String,
    pub value: String,
    pub block_number: u64,
    pub gas: u64,
    pub gas_price: String,
    pub hash: String,
    pub nonce: u64,
    /// Block timestamp, seconds since the Unix epoch
    pub timestamp: u64,
}

impl Transaction {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_empty()
    }
}
