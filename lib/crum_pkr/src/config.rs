use std::time::Duration;

use crate::{error::PokerError, poker_deck::DECK_SIZE};

pub const TABLE_SIZE: usize = 12;
pub const MIN_PLAYERS: usize = 3;

pub const DEFAULT_PLAYER_COUNT: usize = 4;
pub const DEFAULT_BUY_IN: u64 = 1000;
pub const DEFAULT_HOLE_CARDS: usize = 2;
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Per-table settings, fixed for the lifetime of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    pub player_count: usize,
    pub buy_in: u64,
    pub hole_cards: usize,
    /// Pause between deck agreement and the decryption relay, and before
    /// winners are finalized.
    pub settle_delay: Duration,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYER_COUNT,
            buy_in: DEFAULT_BUY_IN,
            hole_cards: DEFAULT_HOLE_CARDS,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl TableConfig {
    pub fn with_players(player_count: usize) -> Self {
        Self {
            player_count,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), PokerError> {
        if !(MIN_PLAYERS..=TABLE_SIZE).contains(&self.player_count) {
            return Err(PokerError::config(format!(
                "player count {} outside {}..={}",
                self.player_count, MIN_PLAYERS, TABLE_SIZE
            )));
        }
        if self.hole_cards == 0 {
            return Err(PokerError::config("players need at least one hole card"));
        }
        if self.player_count * self.hole_cards > DECK_SIZE {
            return Err(PokerError::config("not enough cards to deal every seat"));
        }
        Ok(())
    }
}
