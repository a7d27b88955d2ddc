pub mod game;

pub use game::{
    ApiResponse,
    BankEvent,
    EventKind,
    EventPage,
    FundingReason,
    GameOutcome,
    GameRecord,
    GameStats,
    Notice,
    PlayerMove,
};
