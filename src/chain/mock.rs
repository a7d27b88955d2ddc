// In-memory ledger used by service tests.

use super::{
    signer::{LocalSigner, TransactionSigner},
    types::{
        AccountResource, ChainEvent, EntryFunctionPayload, EventFilter, PendingTransaction,
        RawTransaction, TransactionReceipt, UserTransaction,
    },
    ChainClient,
};
use crate::{
    constants::{APTOS_COIN_STORE, VM_STATUS_SUCCESS},
    error::{AppError, Result},
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy)]
pub enum BalanceReply {
    Missing,
    Octas(u64),
}

#[derive(Default)]
struct MockState {
    balances: Vec<BalanceReply>,
    resource_calls: usize,
    fund_calls: Vec<(String, u64)>,
    fund_error: Option<(bool, String)>,
    view_replies: HashMap<String, Vec<Value>>,
    view_error: Option<String>,
    vm_status: HashMap<String, String>,
    submit_errors: HashMap<String, String>,
    submitted: Vec<(String, Vec<Value>)>,
    pending: HashMap<String, String>,
    events: Vec<ChainEvent>,
    event_filters: Vec<EventFilter>,
}

// `0xcafe::RockPaperScissors::start_game` -> `start_game`
fn short_name(function: &str) -> String {
    function.rsplit("::").next().unwrap_or(function).to_string()
}

pub fn test_signer() -> LocalSigner {
    LocalSigner::from_private_key_hex(&"44".repeat(32)).expect("static test key")
}

#[derive(Default)]
pub struct MockChain {
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successive balance lookups walk this list; the last entry repeats.
    pub fn with_balances(self, balances: Vec<BalanceReply>) -> Self {
        self.state.lock().unwrap().balances = balances;
        self
    }

    pub fn with_fund_error(self, message: &str) -> Self {
        self.state.lock().unwrap().fund_error = Some((false, message.to_string()));
        self
    }

    pub fn with_fund_timeout(self, message: &str) -> Self {
        self.state.lock().unwrap().fund_error = Some((true, message.to_string()));
        self
    }

    pub fn with_view(self, function: &str, values: Vec<Value>) -> Self {
        self.state
            .lock()
            .unwrap()
            .view_replies
            .insert(function.to_string(), values);
        self
    }

    pub fn with_view_error(self, message: &str) -> Self {
        self.state.lock().unwrap().view_error = Some(message.to_string());
        self
    }

    pub fn with_vm_status(self, function: &str, status: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .vm_status
            .insert(function.to_string(), status.to_string());
        self
    }

    pub fn with_submit_error(self, function: &str, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .submit_errors
            .insert(function.to_string(), message.to_string());
        self
    }

    /// Bank events numbered `1..=count`, already newest first.
    pub fn with_bank_events(self, count: u64) -> Self {
        let events = (1..=count)
            .map(|i| ChainEvent {
                transaction_version: i,
                account_address: crate::constants::EVENT_ACCOUNT_ADDRESS.to_string(),
                indexed_type: "0xcafe::RockPaperScissors::Event".to_string(),
                data: serde_json::json!({
                    "caller": "0xplayer",
                    "type": (i - 1) % 4 + 1,
                    "amount": (i * 1_000).to_string(),
                }),
            })
            .collect();
        self.state.lock().unwrap().events = events;
        self
    }

    pub fn fund_calls(&self) -> Vec<(String, u64)> {
        self.state.lock().unwrap().fund_calls.clone()
    }

    pub fn resource_calls(&self) -> usize {
        self.state.lock().unwrap().resource_calls
    }

    /// Short names of the entry functions submitted so far, in order.
    pub fn submitted(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .submitted
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn submitted_arguments(&self, function: &str) -> Option<Vec<Value>> {
        self.state
            .lock()
            .unwrap()
            .submitted
            .iter()
            .find(|(name, _)| name == function)
            .map(|(_, args)| args.clone())
    }

    pub fn event_filters(&self) -> Vec<EventFilter> {
        self.state.lock().unwrap().event_filters.clone()
    }
}

#[async_trait::async_trait]
impl ChainClient for MockChain {
    async fn get_account_resources(&self, address: &str) -> Result<Vec<AccountResource>> {
        let mut state = self.state.lock().unwrap();
        let index = state.resource_calls.min(state.balances.len().saturating_sub(1));
        state.resource_calls += 1;
        match state.balances.get(index).copied() {
            None | Some(BalanceReply::Missing) => Err(AppError::AccountNotFound(format!(
                "Account not found by Address({})",
                address
            ))),
            Some(BalanceReply::Octas(value)) => Ok(vec![AccountResource {
                resource_type: APTOS_COIN_STORE.to_string(),
                data: serde_json::json!({ "coin": { "value": value.to_string() } }),
            }]),
        }
    }

    async fn fund_account(&self, address: &str, amount: u64) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.fund_calls.push((address.to_string(), amount));
        match &state.fund_error {
            Some((true, message)) => Err(AppError::TransactionTimeout(message.clone())),
            Some((false, message)) => Err(AppError::Faucet(message.clone())),
            None => Ok(vec![format!("0xfund{}", state.fund_calls.len())]),
        }
    }

    async fn view(
        &self,
        function: &str,
        _type_arguments: Vec<String>,
        _arguments: Vec<Value>,
    ) -> Result<Vec<Value>> {
        let state = self.state.lock().unwrap();
        if let Some(message) = &state.view_error {
            return Err(AppError::ChainRPC(message.clone()));
        }
        Ok(state
            .view_replies
            .get(&short_name(function))
            .cloned()
            .unwrap_or_default())
    }

    async fn build_transaction(
        &self,
        sender: &str,
        payload: EntryFunctionPayload,
    ) -> Result<RawTransaction> {
        let state = self.state.lock().unwrap();
        if let Some(message) = state.submit_errors.get(&short_name(&payload.function)) {
            return Err(AppError::ChainRPC(message.clone()));
        }
        Ok(RawTransaction {
            sender: sender.to_string(),
            sequence_number: state.submitted.len() as u64,
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 1_700_000_060,
            payload,
        })
    }

    async fn sign_and_submit(
        &self,
        signer: &dyn TransactionSigner,
        transaction: RawTransaction,
    ) -> Result<PendingTransaction> {
        assert_eq!(signer.address(), transaction.sender);
        let mut state = self.state.lock().unwrap();
        let name = short_name(&transaction.payload.function);
        state
            .submitted
            .push((name.clone(), transaction.payload.arguments.clone()));
        let hash = format!("0xtxn{}", state.submitted.len());
        state.pending.insert(hash.clone(), name);
        Ok(PendingTransaction { hash })
    }

    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionReceipt> {
        let state = self.state.lock().unwrap();
        let name = state
            .pending
            .get(hash)
            .ok_or_else(|| AppError::ChainRPC(format!("Transaction not found by Transaction hash({})", hash)))?;
        let vm_status = state
            .vm_status
            .get(name)
            .cloned()
            .unwrap_or_else(|| VM_STATUS_SUCCESS.to_string());
        Ok(TransactionReceipt {
            hash: hash.to_string(),
            version: 1,
            success: vm_status == VM_STATUS_SUCCESS,
            vm_status,
        })
    }

    async fn get_events(&self, filter: &EventFilter) -> Result<Vec<ChainEvent>> {
        let mut state = self.state.lock().unwrap();
        state.event_filters.push(filter.clone());
        Ok(state
            .events
            .iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect())
    }

    async fn get_transaction_by_version(&self, version: u64) -> Result<UserTransaction> {
        Ok(UserTransaction {
            hash: format!("0xtx{}", version),
            version,
            timestamp_micros: 1_700_000_000_000_000 + version * 1_000_000,
        })
    }
}
