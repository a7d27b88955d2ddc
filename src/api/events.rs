use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::{ApiResponse, EventPage},
    services::EventHistoryService,
};

use super::{require_admin, AppState};

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub page: Option<u64>,
}

/// GET /api/v1/bank/events?page=N
pub async fn get_bank_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<ApiResponse<EventPage>>> {
    require_admin(&state)?;

    let service = EventHistoryService::new(state.chain.clone(), &state.config);
    let page = service.get_page(query.page.unwrap_or(0)).await?;

    Ok(Json(ApiResponse::success(page)))
}
