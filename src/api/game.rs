use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{ApiResponse, GameRecord, GameStats, PlayerMove},
    services::{BankService, GameSequencer, RoundSummary},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    #[serde(rename = "move")]
    pub player_move: PlayerMove,
    /// Bet in APT as typed by the player, e.g. "0.5".
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<GameRecord>,
    pub stats: GameStats,
}

/// GET /api/v1/games
pub async fn get_games(State(state): State<AppState>) -> Result<Json<ApiResponse<GamesResponse>>> {
    let service = BankService::new(state.chain.clone(), &state.config);
    let games = service.get_games(state.signer.address()).await?;
    let stats = service.game_stats(&games);

    Ok(Json(ApiResponse::success(GamesResponse { games, stats })))
}

/// POST /api/v1/games/play
pub async fn play(
    State(state): State<AppState>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<ApiResponse<RoundSummary>>> {
    let sequencer = GameSequencer::new(state.chain.clone(), &state.config);
    let _signing = state.signer_lock.lock().await;
    let summary = sequencer
        .play_round(
            state.signer.as_ref(),
            req.player_move,
            &req.amount,
            state.wallet_balance.as_ref(),
        )
        .await?;

    Ok(Json(ApiResponse::success(summary)))
}
