//! Crumble (CRyptographic gaMBLE)
//!
//! Mental Poker (1979) implemented using Shamir–Rivest–Adleman (SRA) commutative encryption.
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use crum_bft::{ConsensusEngine, VoteOutcome};
use crum_sra::{KeyPair, SharedModulus};
use num_bigint::BigUint;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::TableConfig,
    error::PokerError,
    event_queue::EventQueue,
    poker_deck::{Card, MaskedCards, PokerDeck, max_encoded_card},
    poker_events::GameEvent,
    poker_hand::{decide_winners, winner_bitmap},
    poker_state::{GamePhase, GameState},
    poker_table::{Ring, SeatId},
    transport::Transport,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scheduled {
    DecryptionRelay,
    FinalizeWinners,
}

/// One player's node. Consumes events one at a time and reacts by
/// sending events to its peers.
///
/// The hand runs through [`GamePhase`] in order:
/// 1. The first seat shuffles and encrypts the deck, every other seat
///    adds its own layer and reshuffles on the way round the ring.
/// 2. The last seat proposes the result and the table votes on it.
/// 3. Each seat sends its hole cards round the ring, every seat
///    stripping its layer, and the owner strips the final one.
/// 4. Once all seats are ready, hands are revealed and winners decided.
pub struct PokerNode<R: Ring, T: Transport> {
    seat: SeatId,
    config: TableConfig,
    ring: Arc<R>,
    transport: T,
    keys: KeyPair,
    poker_deck: PokerDeck,
    consensus: ConsensusEngine,
    state: GameState,
    rng: StdRng,
    scheduled: Option<(Instant, Scheduled)>,
}

impl<R: Ring, T: Transport> PokerNode<R, T> {
    pub fn new(
        seat: SeatId,
        config: TableConfig,
        modulus: &SharedModulus,
        ring: Arc<R>,
        transport: T,
    ) -> Result<Self, PokerError> {
        Self::with_rng(seat, config, modulus, ring, transport, StdRng::from_entropy())
    }

    pub fn with_rng(
        seat: SeatId,
        config: TableConfig,
        modulus: &SharedModulus,
        ring: Arc<R>,
        transport: T,
        mut rng: StdRng,
    ) -> Result<Self, PokerError> {
        config.validate()?;
        if *modulus.n() <= max_encoded_card() {
            return Err(PokerError::ModulusTooSmall);
        }
        let keys = KeyPair::generate(modulus, &mut rng)?;
        let consensus = ConsensusEngine::new(seat);
        consensus.configure(config.player_count);

        Ok(Self {
            seat,
            state: GameState::new(seat, &config),
            config,
            ring,
            transport,
            keys,
            poker_deck: PokerDeck::new(),
            consensus,
            rng,
            scheduled: None,
        })
    }

    pub const fn seat(&self) -> SeatId {
        self.seat
    }

    pub const fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub const fn state(&self) -> &GameState {
        &self.state
    }

    pub const fn consensus(&self) -> &ConsensusEngine {
        &self.consensus
    }

    pub const fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn own_hand(&self) -> Option<&[Card]> {
        self.state.own_hand()
    }

    pub const fn encrypted_deck(&self) -> &MaskedCards {
        self.state.encrypted_deck()
    }

    pub fn winners(&self) -> &[SeatId] {
        self.state.winners()
    }

    pub fn winner_bitmap(&self) -> &str {
        self.state.winner_bitmap()
    }

    /// True while a delayed step is waiting for [`Self::tick`].
    pub const fn has_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Applies one inbound event. Events that do not fit the current
    /// phase are dropped; malformed payloads are logged and dropped.
    pub fn handle_event(&mut self, event: GameEvent) {
        let kind = event.kind();
        tracing::trace!(seat = self.seat, kind, "Event");

        let result = match event {
            GameEvent::PlayerJoined { seat } => self.on_player_joined(seat),
            GameEvent::RequestEncrypt { from_seat, deck } => self.on_request_encrypt(from_seat, deck),
            GameEvent::ConsensusProposal { proposer, value } => self.on_proposal(proposer, value),
            GameEvent::ConsensusPrevote { voter, value } => {
                let outcome = self.consensus.on_prevote(voter, value);
                self.apply_outcome(outcome)
            }
            GameEvent::ConsensusPrecommit { voter, value } => {
                let outcome = self.consensus.on_precommit(voter, value);
                self.apply_outcome(outcome)
            }
            GameEvent::RequestDecrypt {
                relay_from,
                original_sender,
                hand,
            } => self.on_request_decrypt(relay_from, original_sender, hand),
            GameEvent::ShowdownReadyAck { seat } => self.on_showdown_ready(seat),
            GameEvent::Showdown { seat, hand } => self.on_showdown(seat, hand),
        };

        if let Err(err) = result {
            tracing::warn!(seat = self.seat, kind, %err, "Dropping message");
        }
    }

    /// Runs a delayed step once its time has come.
    pub fn tick(&mut self, now: Instant) {
        let Some((due, task)) = self.scheduled else {
            return;
        };
        if now < due {
            return;
        }
        self.scheduled = None;

        let result = match task {
            Scheduled::DecryptionRelay => self.start_decryption_relay(),
            Scheduled::FinalizeWinners => {
                self.finalize_winners();
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::warn!(seat = self.seat, ?task, %err, "Scheduled step failed");
        }
    }

    /// Handles everything queued so far, then ticks. Returns the number of
    /// events handled.
    pub fn poll(&mut self, inbox: &EventQueue, now: Instant) -> usize {
        let events = inbox.drain();
        let handled = events.len();
        for event in events {
            self.handle_event(event);
        }
        self.tick(now);
        handled
    }

    /// Drains the inbox until the hand completes or `stop` is raised,
    /// sleeping for `idle` whenever there is nothing to do.
    pub fn run(&mut self, inbox: &EventQueue, idle: Duration, stop: &AtomicBool) {
        tracing::info!(seat = self.seat, "Node running");
        while !stop.load(Ordering::Acquire) && self.state.phase != GamePhase::Complete {
            if self.poll(inbox, Instant::now()) == 0 {
                thread::sleep(idle);
            }
        }
        tracing::info!(seat = self.seat, phase = ?self.state.phase, "Node stopped");
    }

    fn set_phase(&mut self, phase: GamePhase) {
        tracing::info!(seat = self.seat, from = ?self.state.phase, to = ?phase, "Phase change");
        self.state.phase = phase;
    }

    fn schedule(&mut self, task: Scheduled) {
        self.scheduled = Some((Instant::now() + self.config.settle_delay, task));
    }

    fn successor(&self) -> Result<SeatId, PokerError> {
        self.ring
            .successor_of(self.seat)
            .ok_or(PokerError::UnknownSeat(self.seat))
    }

    fn on_player_joined(&mut self, joined: SeatId) -> Result<(), PokerError> {
        tracing::debug!(seat = self.seat, joined, "Player joined");
        if self.state.phase != GamePhase::Setup || self.ring.count() != self.config.player_count {
            return Ok(());
        }
        if self.ring.position_of(self.seat).is_none() {
            return Err(PokerError::UnknownSeat(self.seat));
        }

        let seats = self.ring.seats();
        self.state.showdown_ready = seats.iter().map(|seat| (*seat, false)).collect();
        self.state.betting.seat_players(&seats);
        if let Some(first) = self.ring.first_seat() {
            self.state.current_seat = first;
        }
        self.consensus.configure(seats.len());
        self.set_phase(GamePhase::Encryption);

        if self.ring.first_seat() == Some(self.seat) {
            self.start_encryption()?;
        }
        Ok(())
    }

    fn start_encryption(&mut self) -> Result<(), PokerError> {
        let successor = self.successor()?;
        let mut deck = self.poker_deck.masked_cards();
        deck.shuffle(&mut self.rng);
        deck.mask(&self.keys);

        self.state.encrypted_deck = deck.clone();
        self.set_phase(GamePhase::EncConsensus);
        self.consensus.await_proposal();

        tracing::info!(seat = self.seat, successor, "Shuffled and encrypted the deck");
        self.transport.send_to(
            successor,
            GameEvent::RequestEncrypt {
                from_seat: self.seat,
                deck: deck.into_inner(),
            },
        );
        Ok(())
    }

    fn on_request_encrypt(&mut self, from_seat: SeatId, deck: Vec<BigUint>) -> Result<(), PokerError> {
        if self.state.phase != GamePhase::Encryption
            || self.ring.predecessor_of(self.seat) != Some(from_seat)
        {
            tracing::debug!(seat = self.seat, from_seat, "Ignoring encryption request");
            return Ok(());
        }

        let mut deck = MaskedCards::new(deck);
        deck.ensure_full_deck()?;
        deck.mask(&self.keys);
        deck.shuffle(&mut self.rng);
        self.state.encrypted_deck = deck.clone();
        self.set_phase(GamePhase::EncConsensus);

        if self.ring.last_seat() == Some(self.seat) {
            let value = deck.to_consensus_value()?;
            tracing::info!(
                seat = self.seat,
                fingerprint = %deck.fingerprint(),
                "Proposing encrypted deck"
            );
            if !self.consensus.propose(value.clone()) {
                tracing::warn!(seat = self.seat, "Consensus round already in progress");
                return Ok(());
            }
            self.transport.broadcast(GameEvent::ConsensusProposal {
                proposer: self.seat,
                value,
            });
        } else {
            let successor = self.successor()?;
            self.consensus.await_proposal();
            tracing::info!(seat = self.seat, successor, "Added encryption layer to the deck");
            self.transport.send_to(
                successor,
                GameEvent::RequestEncrypt {
                    from_seat: self.seat,
                    deck: deck.into_inner(),
                },
            );
        }
        Ok(())
    }

    fn on_proposal(&mut self, proposer: SeatId, value: String) -> Result<(), PokerError> {
        if self.state.phase != GamePhase::EncConsensus {
            tracing::debug!(seat = self.seat, proposer, "Ignoring proposal");
            return Ok(());
        }
        if self.ring.last_seat() != Some(proposer) {
            tracing::debug!(seat = self.seat, proposer, "Proposal from a seat other than the last");
            return Ok(());
        }
        let outcome = self.consensus.on_proposal(proposer, value);
        self.apply_outcome(outcome)
    }

    fn apply_outcome(&mut self, outcome: VoteOutcome) -> Result<(), PokerError> {
        match outcome {
            VoteOutcome::Ignored | VoteOutcome::Recorded => Ok(()),
            VoteOutcome::BroadcastPrevote(value) => {
                self.transport.broadcast(GameEvent::ConsensusPrevote {
                    voter: self.seat,
                    value,
                });
                Ok(())
            }
            VoteOutcome::BroadcastPrecommit(value) => {
                self.transport.broadcast(GameEvent::ConsensusPrecommit {
                    voter: self.seat,
                    value,
                });
                Ok(())
            }
            VoteOutcome::Committed(value) => self.on_deck_committed(&value),
            VoteOutcome::Aborted => {
                tracing::warn!(seat = self.seat, "Deck consensus failed, waiting for a new proposal");
                Ok(())
            }
        }
    }

    fn on_deck_committed(&mut self, value: &str) -> Result<(), PokerError> {
        if self.state.phase != GamePhase::EncConsensus {
            return Ok(());
        }
        let deck = MaskedCards::from_consensus_value(value)?;
        deck.ensure_full_deck()?;

        let hole_cards = self.config.hole_cards;
        let mut hands = BTreeMap::new();
        for (position, seat) in self.ring.seats().into_iter().enumerate() {
            let hand = deck
                .hole_cards(position, hole_cards)
                .ok_or(PokerError::MalformedHand {
                    seat,
                    expected: hole_cards,
                    actual: 0,
                })?;
            hands.insert(seat, hand);
        }

        tracing::info!(seat = self.seat, fingerprint = %deck.fingerprint(), "Deck agreed");
        self.state.encrypted_deck = deck;
        self.state.encrypted_hands = hands;
        self.set_phase(GamePhase::Decryption);
        self.schedule(Scheduled::DecryptionRelay);
        Ok(())
    }

    fn start_decryption_relay(&mut self) -> Result<(), PokerError> {
        let hand = self
            .state
            .encrypted_hands
            .get(&self.seat)
            .cloned()
            .ok_or(PokerError::UnknownSeat(self.seat))?;
        let successor = self.successor()?;

        tracing::debug!(seat = self.seat, successor, "Requesting decryption of own hand");
        self.transport.send_to(
            successor,
            GameEvent::RequestDecrypt {
                relay_from: self.seat,
                original_sender: self.seat,
                hand,
            },
        );
        Ok(())
    }

    fn on_request_decrypt(
        &mut self,
        relay_from: SeatId,
        original_sender: SeatId,
        hand: Vec<BigUint>,
    ) -> Result<(), PokerError> {
        if self.state.phase != GamePhase::Decryption
            || self.ring.predecessor_of(self.seat) != Some(relay_from)
        {
            tracing::debug!(seat = self.seat, relay_from, "Ignoring decryption request");
            return Ok(());
        }
        if self.state.relayed_senders.contains(&original_sender) {
            tracing::debug!(seat = self.seat, original_sender, "Hand already decrypted");
            return Ok(());
        }
        if hand.len() != self.config.hole_cards {
            return Err(PokerError::MalformedHand {
                seat: original_sender,
                expected: self.config.hole_cards,
                actual: hand.len(),
            });
        }

        let mut hand = MaskedCards::new(hand);
        hand.unmask(&self.keys);

        if original_sender == self.seat {
            let cards = self.poker_deck.decode_hand(hand.cards())?;
            let cards_str = cards
                .iter()
                .map(Card::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            tracing::info!(seat = self.seat, cards = %cards_str, "Own hand decrypted");
            self.state.own_hand = Some(cards);
        } else {
            let successor = self.successor()?;
            self.transport.send_to(
                successor,
                GameEvent::RequestDecrypt {
                    relay_from: self.seat,
                    original_sender,
                    hand: hand.into_inner(),
                },
            );
        }
        self.state.relayed_senders.insert(original_sender);

        if self.state.relayed_senders.len() == self.ring.count() {
            self.set_phase(GamePhase::Showdown);
            self.state.showdown_ready.insert(self.seat, true);
            self.transport
                .broadcast(GameEvent::ShowdownReadyAck { seat: self.seat });
            self.try_reveal_hand();
        }
        Ok(())
    }

    fn on_showdown_ready(&mut self, seat: SeatId) -> Result<(), PokerError> {
        let Some(ready) = self.state.showdown_ready.get_mut(&seat) else {
            tracing::debug!(seat = self.seat, from = seat, "Ignoring ready ack");
            return Ok(());
        };
        *ready = true;
        self.try_reveal_hand();
        Ok(())
    }

    fn try_reveal_hand(&mut self) {
        if self.state.phase != GamePhase::Showdown
            || self.state.hand_revealed
            || !self.state.all_ready()
        {
            return;
        }
        let Some(hand) = self.state.own_hand.clone() else {
            return;
        };

        tracing::info!(seat = self.seat, "All seats ready, revealing hand");
        self.state.hand_revealed = true;
        self.state.showdown_hands.insert(self.seat, hand.clone());
        self.transport.broadcast(GameEvent::Showdown {
            seat: self.seat,
            hand,
        });
        self.try_decide_winners();
    }

    fn on_showdown(&mut self, seat: SeatId, hand: Vec<Card>) -> Result<(), PokerError> {
        if self.ring.position_of(seat).is_none() {
            return Err(PokerError::UnknownSeat(seat));
        }
        if hand.len() != self.config.hole_cards {
            return Err(PokerError::MalformedHand {
                seat,
                expected: self.config.hole_cards,
                actual: hand.len(),
            });
        }
        if !hand.iter().all(Card::is_valid) {
            return Err(PokerError::InvalidCardCode);
        }

        self.state.showdown_hands.insert(seat, hand);
        self.try_decide_winners();
        Ok(())
    }

    fn try_decide_winners(&mut self) {
        if self.state.phase != GamePhase::Showdown
            || self.state.showdown_hands.len() != self.ring.count()
        {
            return;
        }

        let winners = decide_winners(&self.state.showdown_hands);
        let share = self.state.betting.award(&winners);
        let bitmap = winner_bitmap(&self.ring.seats(), &winners);
        tracing::info!(seat = self.seat, %bitmap, share, ?winners, "Winners decided");

        self.state.winners = winners;
        self.state.winner_share = share;
        self.state.winner_bitmap = bitmap;
        self.set_phase(GamePhase::WinnerConsensus);
        self.schedule(Scheduled::FinalizeWinners);
    }

    fn finalize_winners(&mut self) {
        if self.state.phase != GamePhase::WinnerConsensus {
            return;
        }
        tracing::info!(
            seat = self.seat,
            bitmap = %self.state.winner_bitmap,
            "Hand complete"
        );
        self.set_phase(GamePhase::Complete);
    }
}
