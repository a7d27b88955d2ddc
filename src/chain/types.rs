use crate::constants::{APTOS_COIN_STORE, VM_STATUS_SUCCESS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reads a u64 that the node may encode either as a JSON string or a number.
pub fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_u64(),
        _ => None,
    }
}

// Move u64 values travel as decimal strings on the REST API.
pub(crate) mod u64_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        super::value_as_u64(&raw)
            .ok_or_else(|| D::Error::custom(format!("expected u64, got {raw}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: Value,
}

impl AccountResource {
    pub fn coin_value(&self) -> Option<u64> {
        self.data.get("coin")?.get("value").and_then(value_as_u64)
    }
}

/// APT held in the account's coin store, zero when the store is absent.
pub fn apt_balance_octas(resources: &[AccountResource]) -> u64 {
    resources
        .iter()
        .find(|r| r.resource_type == APTOS_COIN_STORE)
        .and_then(AccountResource::coin_value)
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

impl EntryFunctionPayload {
    pub fn new(function: String, arguments: Vec<Value>) -> Self {
        Self {
            payload_type: "entry_function_payload".to_string(),
            function,
            type_arguments: Vec::new(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub sender: String,
    #[serde(with = "u64_string")]
    pub sequence_number: u64,
    #[serde(with = "u64_string")]
    pub max_gas_amount: u64,
    #[serde(with = "u64_string")]
    pub gas_unit_price: u64,
    #[serde(with = "u64_string")]
    pub expiration_timestamp_secs: u64,
    pub payload: EntryFunctionPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionSignature {
    #[serde(rename = "type")]
    pub signature_type: String,
    pub public_key: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitTransactionRequest {
    #[serde(flatten)]
    pub transaction: RawTransaction,
    pub signature: TransactionSignature,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub hash: String,
    #[serde(with = "u64_string")]
    pub version: u64,
    pub success: bool,
    pub vm_status: String,
}

impl TransactionReceipt {
    pub fn is_success(&self) -> bool {
        self.vm_status == VM_STATUS_SUCCESS
    }
}

/// Node-side view of any transaction as returned by `/transactions/by_*`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionEnvelope {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub hash: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl TransactionEnvelope {
    pub fn is_pending(&self) -> bool {
        self.tx_type == "pending_transaction"
    }

    pub fn into_receipt(self) -> TransactionReceipt {
        TransactionReceipt {
            version: self
                .version
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            success: self.success.unwrap_or(false),
            vm_status: self.vm_status.unwrap_or_default(),
            hash: self.hash,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserTransaction {
    pub hash: String,
    pub version: u64,
    /// Commit time in microseconds since the epoch.
    pub timestamp_micros: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventFilter {
    pub offset: u64,
    pub limit: u64,
    pub order_by: String,
    pub descending: bool,
    pub account_address: String,
    pub indexed_type: String,
}

impl EventFilter {
    /// Newest-first filter over the events a module emits under `account_address`.
    pub fn newest_first(account_address: &str, indexed_type: &str, offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            order_by: "transaction_block_height".to_string(),
            descending: true,
            account_address: account_address.to_string(),
            indexed_type: indexed_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainEvent {
    #[serde(with = "u64_string")]
    pub transaction_version: u64,
    #[serde(default)]
    pub account_address: String,
    #[serde(default)]
    pub indexed_type: String,
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apt_balance_reads_coin_store_value() {
        let resources = vec![
            AccountResource {
                resource_type: "0x1::account::Account".to_string(),
                data: serde_json::json!({ "sequence_number": "3" }),
            },
            AccountResource {
                resource_type: APTOS_COIN_STORE.to_string(),
                data: serde_json::json!({ "coin": { "value": "250000" } }),
            },
        ];
        assert_eq!(apt_balance_octas(&resources), 250_000);
    }

    #[test]
    fn apt_balance_defaults_to_zero_without_store() {
        assert_eq!(apt_balance_octas(&[]), 0);
    }

    #[test]
    fn raw_transaction_serializes_u64_as_strings() {
        let raw = RawTransaction {
            sender: "0x1".to_string(),
            sequence_number: 7,
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 1_700_000_060,
            payload: EntryFunctionPayload::new("0x1::m::f".to_string(), vec![]),
        };
        let json = serde_json::to_value(&raw).expect("serializable");
        assert_eq!(json["sequence_number"], "7");
        assert_eq!(json["payload"]["type"], "entry_function_payload");
    }

    #[test]
    fn chain_event_accepts_numeric_version() {
        let event: ChainEvent = serde_json::from_value(serde_json::json!({
            "transaction_version": 42,
            "data": { "caller": "0xa", "type": 1, "amount": "5" }
        }))
        .expect("valid event");
        assert_eq!(event.transaction_version, 42);
    }

    #[test]
    fn envelope_into_receipt_parses_version() {
        let envelope: TransactionEnvelope = serde_json::from_value(serde_json::json!({
            "type": "user_transaction",
            "hash": "0xabc",
            "version": "99",
            "success": true,
            "vm_status": VM_STATUS_SUCCESS
        }))
        .expect("valid envelope");
        let receipt = envelope.into_receipt();
        assert_eq!(receipt.version, 99);
        assert!(receipt.is_success());
    }
}
