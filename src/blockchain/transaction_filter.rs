use crate::blockchain::block_scanner::ScannedBlock;
use crate::blockchain::hex::hex_to_int;
use crate::blockchain::rpc_client::RawTransaction;
use crate::error::DecodeError;
use crate::logging::LogContext;
use crate::models::Transaction;

/// Selects the transactions sent from or to one address.
///
/// Comparison is a case-sensitive exact string match. Checksummed and
/// lowercase spellings of the same account do not match each other.
pub struct TransactionFilter {
    address: String,
}

impl TransactionFilter {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into() }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn matches(&self, transaction: &RawTransaction) -> bool {
        transaction.from == self.address || transaction.to.as_deref() == Some(self.address.as_str())
    }

    /// Project a raw transaction and its enclosing block into a `Transaction`.
    pub fn project(transaction: &RawTransaction, block: &ScannedBlock) -> Result<Transaction, DecodeError> {
        Ok(Transaction {
            from: transaction.from.clone(),
            to: transaction.to.clone().unwrap_or_default(),
            value: transaction.value.clone(),
            block_number: block.number,
            gas: hex_to_int(&transaction.gas)?,
            gas_price: transaction.gas_price.clone(),
            hash: transaction.hash.clone(),
            nonce: hex_to_int(&transaction.nonce)?,
            timestamp: block.timestamp,
        })
    }

    /// Matching transactions, block by block in the given order, then in
    /// source order within each block.
    ///
    /// A matching transaction whose quantities fail to decode is logged and
    /// dropped; it does not affect the others.
    pub fn filter_blocks(&self, blocks: &[ScannedBlock]) -> Vec<Transaction> {
        let mut transactions = Vec::new();

        for block in blocks {
            for raw in block.transactions.iter().filter(|tx| self.matches(tx)) {
                match Self::project(raw, block) {
                    Ok(transaction) => transactions.push(transaction),
                    Err(e) => {
                        LogContext::new("transaction_filter", "project")
                            .with_block_number(block.number)
                            .with_transaction_hash(&raw.hash)
                            .with_address(&self.address)
                            .warn(&format!("Dropping undecodable transaction: {}", e));
                    }
                }
            }
        }

        transactions
    }
}

/// Convenience wrapper over [`TransactionFilter::filter_blocks`]
pub fn transactions_for_address(address: &str, blocks: &[ScannedBlock]) -> Vec<Transaction> {
    TransactionFilter::new(address).filter_blocks(blocks)
}
