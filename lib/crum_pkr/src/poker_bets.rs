use std::collections::BTreeMap;

use crate::poker_table::SeatId;

/// Chip ledger for one hand. Every seat antes the buy-in, so the pot
/// starts at buy-in times player count.
#[derive(Clone, Debug)]
pub struct PokerBettingState {
    buy_in: u64,
    player_chips: BTreeMap<SeatId, u64>,
    current_bets: BTreeMap<SeatId, u64>,
    pot: u64,
}

impl PokerBettingState {
    pub fn new(num_players: usize, buy_in: u64) -> Self {
        Self {
            buy_in,
            player_chips: BTreeMap::new(),
            current_bets: BTreeMap::new(),
            pot: buy_in.saturating_mul(num_players as u64),
        }
    }

    /// Opens a stack of `buy_in` chips for each seat not seen before.
    pub fn seat_players(&mut self, seats: &[SeatId]) {
        for seat in seats {
            self.player_chips.entry(*seat).or_insert(self.buy_in);
            self.current_bets.entry(*seat).or_insert(0);
        }
    }

    pub fn chips_remaining(&self, seat: SeatId) -> u64 {
        self.player_chips.get(&seat).copied().unwrap_or(self.buy_in)
    }

    pub fn current_bet(&self, seat: SeatId) -> u64 {
        self.current_bets.get(&seat).copied().unwrap_or(0)
    }

    pub const fn pot(&self) -> u64 {
        self.pot
    }

    /// Splits the pot evenly between winners. The share is rounded down
    /// and any remainder stays in the pot.
    pub fn award(&mut self, winners: &[SeatId]) -> u64 {
        if winners.is_empty() {
            return 0;
        }
        let share = self.pot / winners.len() as u64;
        for seat in winners {
            *self.player_chips.entry(*seat).or_insert(self.buy_in) += share;
        }
        self.pot -= share * winners.len() as u64;
        self.current_bets.values_mut().for_each(|bet| *bet = 0);
        share
    }
}
