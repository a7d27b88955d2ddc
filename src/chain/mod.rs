pub mod aptos_client;
pub mod signer;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use aptos_client::AptosClient;
pub use signer::{LocalSigner, TransactionSigner};
pub use types::{
    AccountResource, ChainEvent, EntryFunctionPayload, EventFilter, PendingTransaction,
    RawTransaction, TransactionReceipt, UserTransaction,
};

use crate::error::Result;
use serde_json::Value;

/// Ledger, faucet and indexer operations the game backend relies on.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Fails with `AppError::AccountNotFound` for accounts that were never created.
    async fn get_account_resources(&self, address: &str) -> Result<Vec<AccountResource>>;

    /// Requests a faucet credit and returns the faucet transaction hashes.
    async fn fund_account(&self, address: &str, amount: u64) -> Result<Vec<String>>;

    async fn view(
        &self,
        function: &str,
        type_arguments: Vec<String>,
        arguments: Vec<Value>,
    ) -> Result<Vec<Value>>;

    async fn build_transaction(
        &self,
        sender: &str,
        payload: EntryFunctionPayload,
    ) -> Result<RawTransaction>;

    async fn sign_and_submit(
        &self,
        signer: &dyn TransactionSigner,
        transaction: RawTransaction,
    ) -> Result<PendingTransaction>;

    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionReceipt>;

    async fn get_events(&self, filter: &EventFilter) -> Result<Vec<ChainEvent>>;

    async fn get_transaction_by_version(&self, version: u64) -> Result<UserTransaction>;
}
