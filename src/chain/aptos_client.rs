use super::{
    signer::TransactionSigner,
    types::{
        AccountResource, ChainEvent, EntryFunctionPayload, EventFilter, PendingTransaction,
        RawTransaction, SubmitTransactionRequest, TransactionEnvelope, TransactionReceipt,
        TransactionSignature, UserTransaction,
    },
    ChainClient,
};
use crate::{
    config::Config,
    constants::{DEFAULT_MAX_GAS_AMOUNT, DEFAULT_TX_EXPIRATION_SECS, TX_POLL_INTERVAL_MILLIS},
    error::{AppError, Result},
};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::time::{sleep, Duration, Instant};
use url::Url;

const ACCOUNT_NOT_FOUND: &str = "account_not_found";

const EVENTS_QUERY: &str = "query getEvents($where_condition: events_bool_exp, $offset: Int, $limit: Int, $order_by: [events_order_by!]) { events(where: $where_condition, offset: $offset, limit: $limit, order_by: $order_by) { account_address creation_number data event_index sequence_number transaction_block_height transaction_version type indexed_type } }";

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn events_query_variables(filter: &EventFilter) -> Value {
    let direction = if filter.descending { "desc" } else { "asc" };
    let mut order_by = serde_json::Map::new();
    order_by.insert(filter.order_by.clone(), Value::from(direction));
    serde_json::json!({
        "where_condition": {
            "account_address": { "_eq": filter.account_address },
            "indexed_type": { "_eq": filter.indexed_type }
        },
        "offset": filter.offset,
        "limit": filter.limit,
        "order_by": [order_by]
    })
}

fn decode_signing_message(encoded: &str) -> Result<Vec<u8>> {
    hex::decode(encoded.trim().trim_start_matches("0x"))
        .map_err(|e| AppError::ChainRPC(format!("Invalid signing message: {}", e)))
}

#[derive(Debug, Deserialize)]
struct NodeErrorBody {
    message: String,
    #[serde(default)]
    error_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    #[serde(with = "super::types::u64_string")]
    sequence_number: u64,
}

#[derive(Debug, Deserialize)]
struct GasEstimate {
    gas_estimate: u64,
}

#[derive(Debug, Serialize)]
struct ViewRequest<'a> {
    function: &'a str,
    type_arguments: Vec<String>,
    arguments: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct FundRequest<'a> {
    address: &'a str,
    amount: u64,
}

#[derive(Debug, Deserialize)]
struct FundResponse {
    txn_hashes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct EventsData {
    events: Vec<ChainEvent>,
}

/// Aptos REST, faucet and indexer client
pub struct AptosClient {
    node_url: String,
    faucet_url: String,
    indexer_url: String,
    tx_wait_timeout: Duration,
    client: reqwest::Client,
}

impl AptosClient {
    pub fn new(
        node_url: String,
        faucet_url: String,
        indexer_url: String,
        tx_wait_timeout: Duration,
    ) -> Self {
        Self {
            node_url,
            faucet_url,
            indexer_url,
            tx_wait_timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        for raw in [
            &config.aptos_node_url,
            &config.aptos_faucet_url,
            &config.aptos_indexer_url,
        ] {
            Url::parse(raw)
                .map_err(|e| AppError::Internal(format!("Invalid URL {}: {}", raw, e)))?;
        }
        Ok(Self::new(
            config.aptos_node_url.clone(),
            config.aptos_faucet_url.clone(),
            config.aptos_indexer_url.clone(),
            Duration::from_secs(config.tx_wait_timeout_secs),
        ))
    }

    fn node(&self, path: &str) -> String {
        join_url(&self.node_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AppError::ChainRPC(e.to_string()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::ChainRPC(e.to_string()))?;
        match serde_json::from_str::<NodeErrorBody>(&text) {
            Ok(body) if body.error_code.as_deref() == Some(ACCOUNT_NOT_FOUND) => {
                Err(AppError::AccountNotFound(body.message))
            }
            Ok(body) => Err(AppError::ChainRPC(format!("{}: {}", status, body.message))),
            Err(_) => Err(AppError::ChainRPC(format!("{}: {}", status, text))),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ChainRPC(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ChainRPC(e.to_string()))?;
        Self::decode(response).await
    }

    // Returns `None` while the node does not know the hash yet.
    async fn get_transaction_by_hash(&self, hash: &str) -> Result<Option<TransactionEnvelope>> {
        let response = self
            .client
            .get(self.node(&format!("transactions/by_hash/{}", hash)))
            .send()
            .await
            .map_err(|e| AppError::ChainRPC(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).await.map(Some)
    }
}

#[async_trait::async_trait]
impl ChainClient for AptosClient {
    async fn get_account_resources(&self, address: &str) -> Result<Vec<AccountResource>> {
        self.get_json(&self.node(&format!("accounts/{}/resources", address)))
            .await
    }

    async fn fund_account(&self, address: &str, amount: u64) -> Result<Vec<String>> {
        let url = join_url(&self.faucet_url, "fund");
        let funded: FundResponse = self
            .post_json(&url, &FundRequest { address, amount })
            .await
            .map_err(|e| match e {
                AppError::ChainRPC(msg) => AppError::Faucet(msg),
                other => other,
            })?;

        for hash in &funded.txn_hashes {
            let receipt = self.wait_for_transaction(hash).await?;
            if !receipt.success {
                return Err(AppError::Faucet(format!(
                    "Faucet transaction {} failed: {}",
                    hash, receipt.vm_status
                )));
            }
        }
        tracing::debug!("Faucet credited {} octas to {}", amount, address);
        Ok(funded.txn_hashes)
    }

    async fn view(
        &self,
        function: &str,
        type_arguments: Vec<String>,
        arguments: Vec<Value>,
    ) -> Result<Vec<Value>> {
        let request = ViewRequest {
            function,
            type_arguments,
            arguments,
        };
        self.post_json(&self.node("view"), &request).await
    }

    async fn build_transaction(
        &self,
        sender: &str,
        payload: EntryFunctionPayload,
    ) -> Result<RawTransaction> {
        let account: AccountInfo = self
            .get_json(&self.node(&format!("accounts/{}", sender)))
            .await?;
        let gas: GasEstimate = self.get_json(&self.node("estimate_gas_price")).await?;
        let expiration = chrono::Utc::now().timestamp() + DEFAULT_TX_EXPIRATION_SECS;

        Ok(RawTransaction {
            sender: sender.to_string(),
            sequence_number: account.sequence_number,
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: gas.gas_estimate,
            expiration_timestamp_secs: expiration.max(0) as u64,
            payload,
        })
    }

    async fn sign_and_submit(
        &self,
        signer: &dyn TransactionSigner,
        transaction: RawTransaction,
    ) -> Result<PendingTransaction> {
        let encoded: String = self
            .post_json(&self.node("transactions/encode_submission"), &transaction)
            .await?;
        let message = decode_signing_message(&encoded)?;

        let request = SubmitTransactionRequest {
            transaction,
            signature: TransactionSignature {
                signature_type: "ed25519_signature".to_string(),
                public_key: signer.public_key_hex(),
                signature: signer.sign(&message),
            },
        };
        let pending: PendingTransaction =
            self.post_json(&self.node("transactions"), &request).await?;
        tracing::debug!("Submitted transaction {}", pending.hash);
        Ok(pending)
    }

    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionReceipt> {
        let deadline = Instant::now() + self.tx_wait_timeout;

        loop {
            if let Some(envelope) = self.get_transaction_by_hash(hash).await? {
                if !envelope.is_pending() {
                    return Ok(envelope.into_receipt());
                }
            }
            if Instant::now() >= deadline {
                return Err(AppError::TransactionTimeout(format!(
                    "Transaction {} timed out in pending state after {} seconds",
                    hash,
                    self.tx_wait_timeout.as_secs()
                )));
            }
            sleep(Duration::from_millis(TX_POLL_INTERVAL_MILLIS)).await;
        }
    }

    async fn get_events(&self, filter: &EventFilter) -> Result<Vec<ChainEvent>> {
        let request = serde_json::json!({
            "query": EVENTS_QUERY,
            "variables": events_query_variables(filter),
        });
        let response: GraphQlResponse<EventsData> =
            self.post_json(&self.indexer_url, &request).await?;

        if let Some(first) = response.errors.first() {
            return Err(AppError::ChainRPC(format!("Indexer error: {}", first.message)));
        }
        Ok(response.data.map(|d| d.events).unwrap_or_default())
    }

    async fn get_transaction_by_version(&self, version: u64) -> Result<UserTransaction> {
        let envelope: TransactionEnvelope = self
            .get_json(&self.node(&format!("transactions/by_version/{}", version)))
            .await?;
        let timestamp_micros = envelope
            .timestamp
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0);

        Ok(UserTransaction {
            hash: envelope.hash,
            version,
            timestamp_micros,
        })
    }
}
