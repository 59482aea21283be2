//! Crumble (CRyptographic gaMBLE)
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

use parking_lot::RwLock;

pub type SeatId = crum_bft::NodeId;

/// Circular seating order. Encryption and decryption both travel it
/// from each seat to its successor.
pub trait Ring: Send + Sync {
    /// Seats in ring order.
    fn seats(&self) -> Vec<SeatId>;

    fn count(&self) -> usize {
        self.seats().len()
    }

    fn first_seat(&self) -> Option<SeatId> {
        self.seats().first().copied()
    }

    fn last_seat(&self) -> Option<SeatId> {
        self.seats().last().copied()
    }

    fn position_of(&self, seat: SeatId) -> Option<usize> {
        self.seats().iter().position(|s| *s == seat)
    }

    fn successor_of(&self, seat: SeatId) -> Option<SeatId> {
        let seats = self.seats();
        let pos = seats.iter().position(|s| *s == seat)?;
        seats.get((pos + 1) % seats.len()).copied()
    }

    fn predecessor_of(&self, seat: SeatId) -> Option<SeatId> {
        let seats = self.seats();
        let pos = seats.iter().position(|s| *s == seat)?;
        seats.get((pos + seats.len() - 1) % seats.len()).copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seat {
    pub id: SeatId,
    pub address: String,
}

/// Seats ordered by id, shared by every node on one host.
pub struct PokerTable {
    max_players: usize,
    seats: RwLock<Vec<Seat>>,
}

impl PokerTable {
    pub fn new(max_players: usize) -> Self {
        Self {
            max_players,
            seats: RwLock::new(Vec::new()),
        }
    }

    /// Returns false when the seat is taken or the table is full.
    pub fn join(&self, id: SeatId, address: impl Into<String>) -> bool {
        let mut seats = self.seats.write();
        if seats.len() >= self.max_players {
            return false;
        }
        match seats.binary_search_by_key(&id, |s| s.id) {
            Ok(_) => false,
            Err(index) => {
                seats.insert(
                    index,
                    Seat {
                        id,
                        address: address.into(),
                    },
                );
                true
            }
        }
    }

    pub fn address_of(&self, id: SeatId) -> Option<String> {
        self.seats
            .read()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.address.clone())
    }

}

impl Ring for PokerTable {
    fn seats(&self) -> Vec<SeatId> {
        self.seats.read().iter().map(|s| s.id).collect()
    }

    fn count(&self) -> usize {
        self.seats.read().len()
    }
}
