//! Crumble (CRyptographic gaMBLE)
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigUint;

use crate::{
    config::TableConfig,
    poker_bets::PokerBettingState,
    poker_deck::{Card, MaskedCards},
    poker_table::SeatId,
};

/// Stages of one hand, in the order a node passes through them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GamePhase {
    #[default]
    Setup,
    Encryption,
    EncConsensus,
    Decryption,
    Showdown,
    WinnerConsensus,
    Complete,
}

/// What a node knows about the hand in progress.
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) phase: GamePhase,
    pub(crate) current_seat: SeatId,
    pub(crate) betting: PokerBettingState,
    pub(crate) encrypted_deck: MaskedCards,
    pub(crate) encrypted_hands: BTreeMap<SeatId, Vec<BigUint>>,
    pub(crate) own_hand: Option<Vec<Card>>,
    pub(crate) relayed_senders: BTreeSet<SeatId>,
    pub(crate) showdown_ready: BTreeMap<SeatId, bool>,
    pub(crate) hand_revealed: bool,
    pub(crate) showdown_hands: BTreeMap<SeatId, Vec<Card>>,
    pub(crate) winners: Vec<SeatId>,
    pub(crate) winner_share: u64,
    pub(crate) winner_bitmap: String,
}

impl GameState {
    pub fn new(seat: SeatId, config: &TableConfig) -> Self {
        Self {
            phase: GamePhase::Setup,
            current_seat: seat,
            betting: PokerBettingState::new(config.player_count, config.buy_in),
            encrypted_deck: MaskedCards::default(),
            encrypted_hands: BTreeMap::new(),
            own_hand: None,
            relayed_senders: BTreeSet::new(),
            showdown_ready: BTreeMap::new(),
            hand_revealed: false,
            showdown_hands: BTreeMap::new(),
            winners: Vec::new(),
            winner_share: 0,
            winner_bitmap: String::new(),
        }
    }

    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    pub const fn current_seat(&self) -> SeatId {
        self.current_seat
    }

    pub const fn betting(&self) -> &PokerBettingState {
        &self.betting
    }

    pub const fn encrypted_deck(&self) -> &MaskedCards {
        &self.encrypted_deck
    }

    pub fn encrypted_hand(&self, seat: SeatId) -> Option<&[BigUint]> {
        self.encrypted_hands.get(&seat).map(Vec::as_slice)
    }

    pub fn own_hand(&self) -> Option<&[Card]> {
        self.own_hand.as_deref()
    }

    /// Original senders whose hands this node has stripped a layer from.
    pub const fn relayed_senders(&self) -> &BTreeSet<SeatId> {
        &self.relayed_senders
    }

    pub fn all_ready(&self) -> bool {
        !self.showdown_ready.is_empty() && self.showdown_ready.values().all(|ready| *ready)
    }

    pub const fn showdown_hands(&self) -> &BTreeMap<SeatId, Vec<Card>> {
        &self.showdown_hands
    }

    pub fn winners(&self) -> &[SeatId] {
        &self.winners
    }

    pub const fn winner_share(&self) -> u64 {
        self.winner_share
    }

    pub fn winner_bitmap(&self) -> &str {
        &self.winner_bitmap
    }
}
