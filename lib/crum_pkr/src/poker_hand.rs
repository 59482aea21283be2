use std::collections::BTreeMap;

use crate::{poker_deck::Card, poker_table::SeatId};

/// Sum of card ranks, Ace counting as 1.
pub fn hand_score(hand: &[Card]) -> u32 {
    hand.iter().map(|card| u32::from(card.rank())).sum()
}

/// Seats sharing the best score, in seat order.
pub fn decide_winners(hands: &BTreeMap<SeatId, Vec<Card>>) -> Vec<SeatId> {
    let Some(best) = hands.values().map(|hand| hand_score(hand)).max() else {
        return Vec::new();
    };
    hands
        .iter()
        .filter(|(_, hand)| hand_score(hand) == best)
        .map(|(seat, _)| *seat)
        .collect()
}

/// One character per seat in ring order, `1` marking a winner.
pub fn winner_bitmap(seats: &[SeatId], winners: &[SeatId]) -> String {
    seats
        .iter()
        .map(|seat| if winners.contains(seat) { '1' } else { '0' })
        .collect()
}
