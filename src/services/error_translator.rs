use crate::{constants::GAME_MODULE, error::AppError};

const MOVE_ABORT: &str = "Move abort";

/// Message for a known contract abort code.
pub fn abort_message(code: u64) -> Option<&'static str> {
    match code {
        401 => Some("Insufficient funds in Bank"),
        402 => Some("Invalid input"),
        403 => Some("Unauthorized Access"),
        _ => None,
    }
}

// Accepts `401` and `0x191`, the two ways the node prints abort codes.
fn parse_abort_code(word: &str) -> Option<u64> {
    match word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => word.parse().ok(),
    }
}

/// Extracts the abort code from `Move abort ...::RockPaperScissors: <code>`.
pub fn extract_abort_code(text: &str) -> Option<u64> {
    let abort_at = text.find(MOVE_ABORT)?;
    let tail = &text[abort_at + MOVE_ABORT.len()..];

    let marker = format!("::{}: ", GAME_MODULE);
    let code_at = tail.rfind(&marker)? + marker.len();
    let word: String = tail[code_at..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if word.is_empty() {
        return None;
    }
    parse_abort_code(&word)
}

/// Replaces contract aborts with their domain message.
///
/// Unrecognised errors come back untouched. A recognised abort with an
/// unmapped code keeps the full original text as its message.
pub fn translate(error: AppError) -> AppError {
    let text = error.to_string();
    let Some(code) = extract_abort_code(&text) else {
        return error;
    };

    let message = abort_message(code)
        .map(str::to_string)
        .unwrap_or(text);
    tracing::debug!("Translated contract abort {} -> {}", code, message);

    AppError::DomainAbort {
        code,
        message,
        origin: error.origin(),
    }
}
