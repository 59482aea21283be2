use crum_sra::SraError;

use crate::poker_table::SeatId;

#[derive(Debug, thiserror::Error)]
pub enum PokerError {
    #[error(transparent)]
    Crypto(#[from] SraError),
    #[error("invalid table configuration: {0}")]
    Config(String),
    #[error("shared modulus is too small to hold encoded cards")]
    ModulusTooSmall,
    #[error("malformed deck: expected {expected} cards, got {actual}")]
    MalformedDeck { expected: usize, actual: usize },
    #[error("malformed hand from seat {seat}: expected {expected} cards, got {actual}")]
    MalformedHand {
        seat: SeatId,
        expected: usize,
        actual: usize,
    },
    #[error("value does not decode to a card")]
    InvalidCardCode,
    #[error("seat {0} is not at the table")]
    UnknownSeat(SeatId),
    #[error("payload codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl PokerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
