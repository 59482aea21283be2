//! Crumble (CRyptographic gaMBLE)
//!
//! Mental Poker (1979) implemented using Shamir–Rivest–Adleman (SRA) commutative encryption.
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

pub mod config;
pub mod error;
pub mod event_queue;
pub mod poker_bets;
pub mod poker_deck;
pub mod poker_events;
pub mod poker_game;
pub mod poker_hand;
pub mod poker_state;
pub mod poker_table;
pub mod transport;

pub use config::TableConfig;
pub use error::PokerError;
pub use event_queue::EventQueue;
pub use poker_events::GameEvent;
pub use poker_game::PokerNode;
pub use poker_state::GamePhase;
pub use poker_table::{PokerTable, Ring, SeatId};
pub use transport::{LocalHub, LocalLink, Transport};

#[cfg(test)]
pub mod tests;
