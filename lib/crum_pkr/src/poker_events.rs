//! Wire messages exchanged between nodes.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::{
    error::PokerError,
    poker_deck::{Card, decimal_vec},
    poker_table::SeatId,
};

/// Messages exchanged between nodes. The JSON form carries a `type` tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    PlayerJoined {
        seat: SeatId,
    },
    #[serde(rename = "REQ_ENCRYPT")]
    RequestEncrypt {
        from_seat: SeatId,
        #[serde(with = "decimal_vec")]
        deck: Vec<BigUint>,
    },
    ConsensusProposal {
        proposer: SeatId,
        value: String,
    },
    ConsensusPrevote {
        voter: SeatId,
        value: String,
    },
    ConsensusPrecommit {
        voter: SeatId,
        value: String,
    },
    #[serde(rename = "REQ_DECRYPT")]
    RequestDecrypt {
        relay_from: SeatId,
        original_sender: SeatId,
        #[serde(with = "decimal_vec")]
        hand: Vec<BigUint>,
    },
    ShowdownReadyAck {
        seat: SeatId,
    },
    Showdown {
        seat: SeatId,
        hand: Vec<Card>,
    },
}

impl GameEvent {
    pub const fn kind(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined { .. } => "PLAYER_JOINED",
            GameEvent::RequestEncrypt { .. } => "REQ_ENCRYPT",
            GameEvent::ConsensusProposal { .. } => "CONSENSUS_PROPOSAL",
            GameEvent::ConsensusPrevote { .. } => "CONSENSUS_PREVOTE",
            GameEvent::ConsensusPrecommit { .. } => "CONSENSUS_PRECOMMIT",
            GameEvent::RequestDecrypt { .. } => "REQ_DECRYPT",
            GameEvent::ShowdownReadyAck { .. } => "SHOWDOWN_READY_ACK",
            GameEvent::Showdown { .. } => "SHOWDOWN",
        }
    }

    pub fn to_json(&self) -> Result<String, PokerError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(payload: &str) -> Result<Self, PokerError> {
        Ok(serde_json::from_str(payload)?)
    }
}
