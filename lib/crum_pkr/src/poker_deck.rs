use std::fmt;

use alloy_primitives::{Keccak256, hex};
use crum_sra::KeyPair;
use num_bigint::BigUint;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::error::PokerError;

pub const DECK_SIZE: usize = 52;
pub const RANKS_PER_SUIT: u8 = 13;

/// Card codes start above this so every plaintext is a large integer.
pub fn encoding_offset() -> BigUint {
    BigUint::from(10u32).pow(38)
}

/// Largest plaintext a card can encode to. The shared modulus must exceed it.
pub fn max_encoded_card() -> BigUint {
    encoding_offset() + DECK_SIZE
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        };
        f.write_str(name)
    }
}

/// Rank runs 1 (Ace) to 13 (King).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    pub fn new(rank: u8, suit: Suit) -> Option<Self> {
        (1..=RANKS_PER_SUIT)
            .contains(&rank)
            .then_some(Self { rank, suit })
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Cards arriving over the wire are not checked on deserialization.
    pub fn is_valid(&self) -> bool {
        (1..=RANKS_PER_SUIT).contains(&self.rank)
    }

    /// Position in the canonical deck, 1..=52.
    pub fn number(&self) -> u32 {
        u32::from(self.suit.index()) * u32::from(RANKS_PER_SUIT) + u32::from(self.rank)
    }

    pub fn from_number(number: u32) -> Option<Self> {
        if !(1..=DECK_SIZE as u32).contains(&number) {
            return None;
        }
        let zero_based = number - 1;
        let suit = Suit::ALL[(zero_based / u32::from(RANKS_PER_SUIT)) as usize];
        let rank = (zero_based % u32::from(RANKS_PER_SUIT)) as u8 + 1;
        Self::new(rank, suit)
    }

    pub fn encode(&self) -> BigUint {
        encoding_offset() + self.number()
    }

    pub fn decode(value: &BigUint) -> Result<Self, PokerError> {
        let offset = encoding_offset();
        if *value <= offset {
            return Err(PokerError::InvalidCardCode);
        }
        let number = u32::try_from(&(value - offset)).map_err(|_| PokerError::InvalidCardCode)?;
        Self::from_number(number).ok_or(PokerError::InvalidCardCode)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            1 => "Ace",
            11 => "Jack",
            12 => "Queen",
            13 => "King",
            _ => return write!(f, "{} of {}", self.rank, self.suit),
        };
        write!(f, "{} of {}", rank, self.suit)
    }
}

/// The plaintext deck every node builds identically.
#[derive(Clone, Debug)]
pub struct PokerDeck {
    cards: Vec<Card>,
}

impl Default for PokerDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl PokerDeck {
    pub fn new() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|suit| (1..=RANKS_PER_SUIT).filter_map(move |rank| Card::new(rank, *suit)))
            .collect();
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn masked_cards(&self) -> MaskedCards {
        MaskedCards::new(self.cards.iter().map(Card::encode).collect())
    }

    pub fn decode_hand(&self, values: &[BigUint]) -> Result<Vec<Card>, PokerError> {
        values.iter().map(Card::decode).collect()
    }
}

/// Deck or hand under zero or more encryption layers.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskedCards {
    #[serde(with = "decimal_vec")]
    cards: Vec<BigUint>,
}

impl MaskedCards {
    pub fn new(cards: Vec<BigUint>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[BigUint] {
        &self.cards
    }

    pub fn into_inner(self) -> Vec<BigUint> {
        self.cards
    }

    pub fn mask(&mut self, keys: &KeyPair) {
        keys.mask_all(&mut self.cards);
    }

    pub fn unmask(&mut self, keys: &KeyPair) {
        keys.unmask_all(&mut self.cards);
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.shuffle(rng);
    }

    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        for card in &self.cards {
            hasher.update(card.to_bytes_be());
        }
        hasher.finalize().into()
    }

    pub fn fingerprint(&self) -> String {
        hex::encode(self.hash())
    }

    /// Hole cards of the seat at ring `position`.
    pub fn hole_cards(&self, position: usize, count: usize) -> Option<Vec<BigUint>> {
        let start = position.checked_mul(count)?;
        self.cards.get(start..start + count).map(<[BigUint]>::to_vec)
    }

    /// JSON array of decimal strings; this is the value nodes vote on.
    pub fn to_consensus_value(&self) -> Result<String, PokerError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_consensus_value(value: &str) -> Result<Self, PokerError> {
        Ok(serde_json::from_str(value)?)
    }

    pub fn ensure_full_deck(&self) -> Result<(), PokerError> {
        if self.cards.len() != DECK_SIZE {
            return Err(PokerError::MalformedDeck {
                expected: DECK_SIZE,
                actual: self.cards.len(),
            });
        }
        Ok(())
    }
}

/// Big integers travel as decimal strings.
pub mod decimal_vec {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| v.to_str_radix(10)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<BigUint>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| s.parse::<BigUint>().map_err(D::Error::custom))
            .collect()
    }
}
