use crate::chain::types::u64_string;
use crate::constants::{DRAW_MULTIPLIER, EXPLORER_TX_URL, OCTAS_PER_APT, WIN_MULTIPLIER};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== GAME ====================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerMove {
    Rock = 1,
    Paper = 2,
    Scissors = 3,
}

impl TryFrom<u8> for PlayerMove {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerMove::Rock),
            2 => Ok(PlayerMove::Paper),
            3 => Ok(PlayerMove::Scissors),
            other => Err(format!("Invalid move {}; expected 1 (Rock), 2 (Paper) or 3 (Scissors)", other)),
        }
    }
}

impl From<PlayerMove> for u8 {
    fn from(value: PlayerMove) -> Self {
        value as u8
    }
}

impl PlayerMove {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerMove::Rock => "Rock",
            PlayerMove::Paper => "Paper",
            PlayerMove::Scissors => "Scissors",
        }
    }
}

/// One game as stored by the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub player: String,
    pub player_move: u8,
    pub computer_move: u8,
    pub result: u8,
    #[serde(with = "u64_string")]
    pub bet_amount: u64,
    #[serde(with = "u64_string")]
    pub timestamp: u64,
}

impl GameRecord {
    pub fn outcome(&self) -> GameOutcome {
        GameOutcome::from_result(self.result)
    }

    /// Net change in APT for the player.
    pub fn profit(&self) -> f64 {
        let multiplier = match self.outcome() {
            GameOutcome::Draw => DRAW_MULTIPLIER,
            GameOutcome::Won => WIN_MULTIPLIER,
            GameOutcome::Lost | GameOutcome::Undeclared => 0.0,
        };
        self.bet_amount as f64 * (multiplier - 1.0) / OCTAS_PER_APT as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Draw,
    Won,
    Lost,
    Undeclared,
}

impl GameOutcome {
    pub fn from_result(result: u8) -> Self {
        match result {
            1 => GameOutcome::Draw,
            2 => GameOutcome::Won,
            3 => GameOutcome::Lost,
            _ => GameOutcome::Undeclared,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            GameOutcome::Draw => Notice::info("Game Drawn"),
            GameOutcome::Won => Notice::success("You Won"),
            GameOutcome::Lost => Notice::error("You Lost"),
            GameOutcome::Undeclared => Notice::warning("Result Undeclared"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameStats {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub total_profit: f64,
}

impl GameStats {
    pub fn from_games(games: &[GameRecord]) -> Self {
        games.iter().fold(GameStats::default(), |mut stats, game| {
            match game.outcome() {
                GameOutcome::Won => stats.wins += 1,
                GameOutcome::Lost => stats.losses += 1,
                GameOutcome::Draw => stats.draws += 1,
                GameOutcome::Undeclared => {}
            }
            stats.total_profit += game.profit();
            stats
        })
    }
}

// ==================== BANK ====================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Deposit,
    Withdraw,
    Bet,
    Get,
}

impl EventKind {
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(EventKind::Deposit),
            2 => Some(EventKind::Withdraw),
            3 => Some(EventKind::Bet),
            4 => Some(EventKind::Get),
            _ => None,
        }
    }

    /// Money flowing into the bank.
    pub fn is_credit(&self) -> bool {
        matches!(self, EventKind::Deposit | EventKind::Bet)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BankEvent {
    pub caller: String,
    #[serde(rename = "type")]
    pub kind: Option<EventKind>,
    pub credit: bool,
    pub amount: u64,
    pub tx_hash: String,
    pub timestamp: DateTime<Utc>,
    pub explorer_url: String,
}

impl BankEvent {
    pub fn explorer_url_for(tx_hash: &str) -> String {
        format!("{}/{}?network=testnet", EXPLORER_TX_URL, tx_hash)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventPage {
    pub page: u64,
    pub events: Vec<BankEvent>,
    pub has_next: bool,
}

// ==================== NOTICES ====================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// User-facing alert produced by an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    #[serde(rename = "type")]
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FundingReason {
    LowBalance,
    NewAccount,
}

impl FundingReason {
    pub fn label(&self) -> &'static str {
        match self {
            FundingReason::LowBalance => "Low Balance",
            FundingReason::NewAccount => "New Account",
        }
    }
}

// ==================== API ====================
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
