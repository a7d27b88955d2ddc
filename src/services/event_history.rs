use crate::{
    chain::{types::value_as_u64, ChainClient, ChainEvent, EventFilter},
    config::Config,
    constants::{EVENTS_PAGE_SIZE, EVENT_ACCOUNT_ADDRESS, EVENT_STRUCT},
    error::{AppError, Result},
    models::{BankEvent, EventKind, EventPage},
};
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use std::sync::Arc;

// `type` may arrive as a number or a string, `amount` as a u64 string.
fn event_field_u64(event: &ChainEvent, field: &str) -> u64 {
    event.data.get(field).and_then(value_as_u64).unwrap_or(0)
}

/// Paged bank ledger read from the indexer, newest first.
pub struct EventHistoryService {
    chain: Arc<dyn ChainClient>,
    indexed_type: String,
    page_size: u64,
}

impl EventHistoryService {
    pub fn new(chain: Arc<dyn ChainClient>, config: &Config) -> Self {
        Self {
            chain,
            indexed_type: config.module_function(EVENT_STRUCT),
            page_size: EVENTS_PAGE_SIZE,
        }
    }

    /// Loads page `page` (zero based) and checks whether another one exists.
    pub async fn get_page(&self, page: u64) -> Result<EventPage> {
        self.load_page(page)
            .await
            .map_err(|e| AppError::fetching("events", e))
    }

    async fn load_page(&self, page: u64) -> Result<EventPage> {
        let offset = page.saturating_mul(self.page_size);
        let events = self.fetch(offset, self.page_size).await?;

        let events = try_join_all(events.into_iter().map(|event| self.enrich(event))).await?;

        let next_offset = page.saturating_add(1).saturating_mul(self.page_size);
        let has_next = !self.fetch(next_offset, 1).await?.is_empty();

        tracing::debug!(
            "Bank events page {}: {} events, has_next={}",
            page,
            events.len(),
            has_next
        );
        Ok(EventPage {
            page,
            events,
            has_next,
        })
    }

    async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<ChainEvent>> {
        let filter =
            EventFilter::newest_first(EVENT_ACCOUNT_ADDRESS, &self.indexed_type, offset, limit);
        self.chain.get_events(&filter).await
    }

    async fn enrich(&self, event: ChainEvent) -> Result<BankEvent> {
        let transaction = self
            .chain
            .get_transaction_by_version(event.transaction_version)
            .await?;

        let kind = EventKind::from_code(event_field_u64(&event, "type"));
        let caller = event
            .data
            .get("caller")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let timestamp = i64::try_from(transaction.timestamp_micros)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_micros)
            .unwrap_or_default();

        Ok(BankEvent {
            caller,
            kind,
            credit: kind.map(|k| k.is_credit()).unwrap_or(false),
            amount: event_field_u64(&event, "amount"),
            explorer_url: BankEvent::explorer_url_for(&transaction.hash),
            tx_hash: transaction.hash,
            timestamp,
        })
    }
}
