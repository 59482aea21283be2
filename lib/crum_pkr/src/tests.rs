use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, atomic::AtomicBool},
    thread,
    time::{Duration, Instant},
};

use crum_bft::ConsensusStep;
use crum_sra::SharedModulus;
use itertools::Itertools;
use num_bigint::BigUint;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    EventQueue, GameEvent, GamePhase, LocalHub, LocalLink, PokerError, PokerNode, PokerTable, Ring,
    TableConfig, Transport,
    config::TABLE_SIZE,
    poker_bets::PokerBettingState,
    poker_deck::{Card, DECK_SIZE, MaskedCards, PokerDeck, Suit, encoding_offset, max_encoded_card},
    poker_hand::{decide_winners, hand_score, winner_bitmap},
};

type Node = PokerNode<PokerTable, LocalLink>;

fn mersenne(exponent: usize) -> BigUint {
    (BigUint::from(1u32) << exponent) - 1u32
}

fn test_modulus() -> SharedModulus {
    SharedModulus::from_primes(mersenne(89), mersenne(107)).unwrap()
}

fn instant_config(players: usize) -> TableConfig {
    TableConfig {
        settle_delay: Duration::ZERO,
        ..TableConfig::with_players(players)
    }
}

fn seat_table(players: u32, seed: u64) -> (Arc<LocalHub>, Vec<(Node, Arc<EventQueue>)>) {
    let hub = LocalHub::new(Arc::new(PokerTable::new(TABLE_SIZE)));
    let modulus = test_modulus();

    let links: Vec<_> = (1..=players)
        .map(|seat| {
            let (inbox, link) = hub.attach(seat, format!("127.0.0.1:{}", 7000 + seat)).unwrap();
            (seat, inbox, link)
        })
        .collect();

    let nodes = links
        .into_iter()
        .map(|(seat, inbox, link)| {
            let node = PokerNode::with_rng(
                seat,
                instant_config(players as usize),
                &modulus,
                hub.table().clone(),
                link,
                StdRng::seed_from_u64(seed + u64::from(seat)),
            )
            .unwrap();
            (node, inbox)
        })
        .collect();

    (hub, nodes)
}

/// Drains every inbox in seat order until the table goes quiet.
fn drain_until_quiet(nodes: &mut [(Node, Arc<EventQueue>)]) {
    loop {
        let mut handled = 0;
        for (node, inbox) in nodes.iter_mut() {
            for event in inbox.drain() {
                node.handle_event(event);
                handled += 1;
            }
        }
        if handled == 0 {
            return;
        }
    }
}

/// Lets the table settle, firing delayed steps only once no messages are
/// in flight.
fn play_out(nodes: &mut [(Node, Arc<EventQueue>)]) {
    for _ in 0..16 {
        drain_until_quiet(nodes);
        if !nodes.iter().any(|(node, _)| node.has_scheduled()) {
            return;
        }
        let now = Instant::now();
        for (node, _) in nodes.iter_mut() {
            node.tick(now);
        }
    }
}

#[test]
fn test_full_hand() {
    // --- 1. SETUP ---
    let (_hub, mut nodes) = seat_table(4, 7);

    // --- 2. ENCRYPTION AND DECK CONSENSUS ---
    drain_until_quiet(&mut nodes);
    for (node, _) in &nodes {
        assert_eq!(node.phase(), GamePhase::Decryption);
        assert_eq!(node.consensus().step(), ConsensusStep::Commit);
        assert!(node.own_hand().is_none());
    }

    let fingerprints: BTreeSet<_> = nodes
        .iter()
        .map(|(node, _)| node.encrypted_deck().hash())
        .collect();
    assert_eq!(fingerprints.len(), 1);
    assert_eq!(nodes[0].0.encrypted_deck().len(), DECK_SIZE);

    // Nothing in the agreed deck is a plaintext card
    let plain = PokerDeck::new().masked_cards();
    assert!(
        nodes[0]
            .0
            .encrypted_deck()
            .cards()
            .iter()
            .all(|card| !plain.cards().contains(card))
    );

    // --- 3. DECRYPTION, SHOWDOWN AND WINNERS ---
    play_out(&mut nodes);

    let mut hands = BTreeMap::new();
    for (node, _) in &nodes {
        assert_eq!(node.phase(), GamePhase::Complete);
        let hand = node.own_hand().unwrap().to_vec();
        assert_eq!(hand.len(), 2);
        assert!(hand.iter().all(Card::is_valid));
        hands.insert(node.seat(), hand);
    }

    // Nobody holds the same card
    let dealt: BTreeSet<_> = hands.values().flatten().collect();
    assert_eq!(dealt.len(), 8);

    let winners = decide_winners(&hands);
    let bitmap = winner_bitmap(&[1, 2, 3, 4], &winners);
    let share = 4000 / winners.len() as u64;
    for (node, _) in &nodes {
        assert_eq!(node.state().showdown_hands(), &hands);
        assert_eq!(node.winners(), winners.as_slice());
        assert_eq!(node.winner_bitmap(), bitmap);
        assert_eq!(node.state().winner_share(), share);
        for seat in 1..=4 {
            let expected = if winners.contains(&seat) { 1000 + share } else { 1000 };
            assert_eq!(node.state().betting().chips_remaining(seat), expected);
        }
    }
}

#[test]
fn test_three_player_table() {
    let (_hub, mut nodes) = seat_table(3, 99);
    play_out(&mut nodes);

    let cards = nodes
        .iter()
        .flat_map(|(node, _)| node.own_hand().unwrap().to_vec())
        .collect_vec();
    assert_eq!(cards.len(), 6);
    assert!(cards.iter().all_unique());

    let bitmaps = nodes
        .iter()
        .map(|(node, _)| node.winner_bitmap().to_string())
        .unique()
        .collect_vec();
    assert_eq!(bitmaps.len(), 1);
    assert_eq!(bitmaps[0].len(), 3);
    assert!(bitmaps[0].contains('1'));
}

#[test]
fn test_hands_follow_ring_position() {
    let (_hub, mut nodes) = seat_table(4, 3);
    drain_until_quiet(&mut nodes);

    // Every node carves the agreed deck the same way
    let deck = nodes[0].0.encrypted_deck().clone();
    for (node, _) in &nodes {
        for seat in 1..=4u32 {
            let position = (seat - 1) as usize;
            assert_eq!(
                node.state().encrypted_hand(seat).unwrap(),
                deck.hole_cards(position, 2).unwrap().as_slice()
            );
        }
    }
}

#[test]
fn test_setup_waits_for_full_table() {
    let hub = LocalHub::new(Arc::new(PokerTable::new(TABLE_SIZE)));
    let (inbox, link) = hub.attach(1, "a").unwrap();
    let mut node = PokerNode::with_rng(
        1,
        instant_config(4),
        &test_modulus(),
        hub.table().clone(),
        link,
        StdRng::seed_from_u64(1),
    )
    .unwrap();

    assert_eq!(node.poll(&inbox, Instant::now()), 1);
    assert_eq!(node.phase(), GamePhase::Setup);

    // Phase-inappropriate traffic is dropped
    node.handle_event(GameEvent::ConsensusProposal {
        proposer: 4,
        value: "[]".into(),
    });
    node.handle_event(GameEvent::ShowdownReadyAck { seat: 3 });
    assert_eq!(node.phase(), GamePhase::Setup);
    assert_eq!(node.consensus().step(), ConsensusStep::Idle);
    assert!(!node.state().all_ready());

    // Stopped before it starts
    node.run(&inbox, Duration::from_millis(1), &AtomicBool::new(true));
    assert_eq!(node.phase(), GamePhase::Setup);
}

#[test]
fn test_encryption_request_from_wrong_seat_is_dropped() {
    let (hub, mut nodes) = seat_table(4, 11);

    // Only seat 2 catches up on the joins
    let (second, second_inbox) = &mut nodes[1];
    second.poll(second_inbox, Instant::now());
    assert_eq!(second.phase(), GamePhase::Encryption);

    let deck = PokerDeck::new().masked_cards().into_inner();
    second.handle_event(GameEvent::RequestEncrypt {
        from_seat: 3,
        deck: deck.clone(),
    });
    assert_eq!(second.phase(), GamePhase::Encryption);

    second.handle_event(GameEvent::RequestEncrypt {
        from_seat: 1,
        deck: deck[..51].to_vec(),
    });
    assert_eq!(second.phase(), GamePhase::Encryption);

    second.handle_event(GameEvent::RequestEncrypt {
        from_seat: 1,
        deck,
    });
    assert_eq!(second.phase(), GamePhase::EncConsensus);
    assert_eq!(second.consensus().step(), ConsensusStep::WaitingForProposal);

    // Seat 3 got the re-encrypted deck
    let forwarded = nodes[2].1.drain();
    let Some(GameEvent::RequestEncrypt { from_seat, deck }) = forwarded.last() else {
        panic!("expected encryption request");
    };
    assert_eq!(*from_seat, 2);
    assert_eq!(deck.len(), DECK_SIZE);
    assert_eq!(hub.table().successor_of(2), Some(3));
}

#[test]
fn test_decryption_request_from_wrong_seat_is_dropped() {
    let (_hub, mut nodes) = seat_table(4, 5);
    drain_until_quiet(&mut nodes);

    let (third, third_inbox) = &mut nodes[2];
    let hand = third.state().encrypted_hand(1).unwrap().to_vec();

    third.handle_event(GameEvent::RequestDecrypt {
        relay_from: 1,
        original_sender: 1,
        hand: hand.clone(),
    });
    assert!(third.state().relayed_senders().is_empty());

    third.handle_event(GameEvent::RequestDecrypt {
        relay_from: 2,
        original_sender: 1,
        hand: hand[..1].to_vec(),
    });
    assert!(third.state().relayed_senders().is_empty());

    third.handle_event(GameEvent::RequestDecrypt {
        relay_from: 2,
        original_sender: 1,
        hand,
    });
    assert!(third.state().relayed_senders().contains(&1));
    assert!(third_inbox.is_empty());
    assert_eq!(nodes[3].1.len(), 1);
}

#[test]
fn test_bad_showdown_is_dropped() {
    let (_hub, mut nodes) = seat_table(4, 5);
    drain_until_quiet(&mut nodes);
    let (node, _) = &mut nodes[0];

    let payload = r#"{"type":"SHOWDOWN","seat":2,"hand":[{"rank":0,"suit":"Clubs"},{"rank":3,"suit":"Clubs"}]}"#;
    node.handle_event(GameEvent::from_json(payload).unwrap());

    let payload = r#"{"type":"SHOWDOWN","seat":9,"hand":[{"rank":2,"suit":"Clubs"},{"rank":3,"suit":"Clubs"}]}"#;
    node.handle_event(GameEvent::from_json(payload).unwrap());

    assert!(node.state().showdown_hands().is_empty());
}

#[test]
fn test_rejects_small_modulus_and_bad_config() {
    let hub = LocalHub::new(Arc::new(PokerTable::new(TABLE_SIZE)));
    let (_, link) = hub.attach(1, "a").unwrap();

    let small = SharedModulus::from_primes(mersenne(61), mersenne(31)).unwrap();
    let result = PokerNode::new(
        1,
        TableConfig::default(),
        &small,
        hub.table().clone(),
        link.clone(),
    );
    assert!(matches!(result, Err(PokerError::ModulusTooSmall)));

    let result = PokerNode::new(
        1,
        TableConfig::with_players(2),
        &test_modulus(),
        hub.table().clone(),
        link,
    );
    assert!(matches!(result, Err(PokerError::Config(_))));
}

/// Brings only seat 1 up to deck consensus: it shuffles, encrypts and
/// then waits for the last seat's proposal.
fn first_seat_awaiting_proposal(seed: u64) -> Vec<(Node, Arc<EventQueue>)> {
    let (_hub, mut nodes) = seat_table(4, seed);
    let (first, first_inbox) = &mut nodes[0];
    first.poll(first_inbox, Instant::now());
    assert_eq!(first.phase(), GamePhase::EncConsensus);
    assert_eq!(first.consensus().step(), ConsensusStep::WaitingForProposal);
    nodes
}

fn only_joins(inbox: &EventQueue) -> bool {
    inbox
        .drain()
        .iter()
        .all(|event| matches!(event, GameEvent::PlayerJoined { .. }))
}

#[test]
fn test_proposal_from_wrong_seat_is_ignored() {
    let mut nodes = first_seat_awaiting_proposal(21);
    let value = PokerDeck::new()
        .masked_cards()
        .to_consensus_value()
        .unwrap();

    nodes[0].0.handle_event(GameEvent::ConsensusProposal {
        proposer: 2,
        value,
    });
    assert_eq!(nodes[0].0.phase(), GamePhase::EncConsensus);
    assert_eq!(nodes[0].0.consensus().step(), ConsensusStep::WaitingForProposal);
    assert_eq!(nodes[0].0.consensus().proposer(), None);

    // No prevote went out
    assert!(only_joins(&nodes[2].1));
    assert!(only_joins(&nodes[3].1));
}

#[test]
fn test_precommit_disagreement_stalls_node() {
    let mut nodes = first_seat_awaiting_proposal(22);
    let (first, _) = &mut nodes[0];
    let agreed = PokerDeck::new()
        .masked_cards()
        .to_consensus_value()
        .unwrap();
    let mut other = PokerDeck::new().masked_cards().into_inner();
    other.reverse();
    let other = MaskedCards::new(other).to_consensus_value().unwrap();

    first.handle_event(GameEvent::ConsensusProposal {
        proposer: 4,
        value: agreed.clone(),
    });
    assert_eq!(first.consensus().step(), ConsensusStep::Prevote);

    for voter in [2, 3] {
        first.handle_event(GameEvent::ConsensusPrevote {
            voter,
            value: agreed.clone(),
        });
    }
    assert_eq!(first.consensus().step(), ConsensusStep::Precommit);

    for voter in [2, 3] {
        first.handle_event(GameEvent::ConsensusPrecommit {
            voter,
            value: other.clone(),
        });
    }
    assert_eq!(first.consensus().step(), ConsensusStep::Idle);
    assert!(!first.consensus().has_consensus());
    assert_eq!(first.phase(), GamePhase::EncConsensus);
    assert!(!first.has_scheduled());
    assert!(first.state().encrypted_hand(1).is_none());
}

#[test]
fn test_malformed_committed_deck_stalls_node() {
    for (seed, value) in [(23, "not json"), (24, r#"["1","2"]"#)] {
        let mut nodes = first_seat_awaiting_proposal(seed);
        let (first, _) = &mut nodes[0];

        first.handle_event(GameEvent::ConsensusProposal {
            proposer: 4,
            value: value.into(),
        });
        for voter in [2, 3] {
            first.handle_event(GameEvent::ConsensusPrevote {
                voter,
                value: value.into(),
            });
        }
        for voter in [2, 3] {
            first.handle_event(GameEvent::ConsensusPrecommit {
                voter,
                value: value.into(),
            });
        }

        // The table agreed, but the value is not a deck
        assert_eq!(first.consensus().step(), ConsensusStep::Commit);
        assert_eq!(first.phase(), GamePhase::EncConsensus);
        assert!(!first.has_scheduled());
        assert!(first.state().encrypted_hand(1).is_none());
        assert_eq!(first.encrypted_deck().len(), DECK_SIZE);
    }
}

#[test]
fn test_config_defaults_are_valid() {
    assert!(TableConfig::default().validate().is_ok());
    assert!(TableConfig::with_players(TABLE_SIZE).validate().is_ok());
}

#[test]
fn test_config_rejects_out_of_range_tables() {
    assert!(TableConfig::with_players(2).validate().is_err());
    assert!(TableConfig::with_players(TABLE_SIZE + 1).validate().is_err());

    let greedy = TableConfig {
        hole_cards: 5,
        ..TableConfig::with_players(12)
    };
    assert!(matches!(greedy.validate(), Err(PokerError::Config(_))));
}

#[test]
fn test_event_queue_across_threads() {
    let queue = Arc::new(EventQueue::new());
    let producers: Vec<_> = (1..=4)
        .map(|seat| {
            let queue = queue.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    queue.push(GameEvent::ShowdownReadyAck { seat });
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    assert_eq!(queue.len(), 100);

    let first = queue.try_pop().unwrap();
    assert!(matches!(first, GameEvent::ShowdownReadyAck { .. }));
    assert_eq!(queue.drain().len(), 99);
    assert!(queue.is_empty());
    assert!(queue.try_pop().is_none());
}

#[test]
fn test_pot_starts_with_antes() {
    let mut bets = PokerBettingState::new(4, 1000);
    bets.seat_players(&[1, 2, 3, 4]);
    assert_eq!(bets.pot(), 4000);
    assert_eq!(bets.chips_remaining(3), 1000);
    assert_eq!(bets.current_bet(3), 0);
}

#[test]
fn test_split_pot() {
    let mut bets = PokerBettingState::new(3, 1000);
    bets.seat_players(&[1, 2, 3]);
    assert_eq!(bets.pot(), 3000);

    let share = bets.award(&[1, 3]);
    assert_eq!(share, 1500);
    assert_eq!(bets.chips_remaining(1), 2500);
    assert_eq!(bets.chips_remaining(2), 1000);
    assert_eq!(bets.chips_remaining(3), 2500);
    assert_eq!(bets.pot(), 0);
    assert_eq!(bets.award(&[]), 0);
}

#[test]
fn test_deck_is_canonical() {
    let deck = PokerDeck::new();
    assert_eq!(deck.cards().len(), DECK_SIZE);
    assert_eq!(deck.cards()[0].to_string(), "Ace of Hearts");
    assert_eq!(deck.cards()[13].to_string(), "Ace of Diamonds");
    assert_eq!(deck.cards()[51].to_string(), "King of Spades");
    assert_eq!(deck.cards()[9].to_string(), "10 of Hearts");
}

#[test]
fn test_card_codes() {
    let ace = Card::new(1, Suit::Hearts).unwrap();
    assert_eq!(ace.encode(), encoding_offset() + 1u32);

    let king = Card::new(13, Suit::Spades).unwrap();
    assert_eq!(king.encode(), max_encoded_card());
    assert_eq!(Card::decode(&king.encode()).unwrap(), king);

    assert!(Card::new(0, Suit::Clubs).is_none());
    assert!(Card::new(14, Suit::Clubs).is_none());
    assert!(Card::decode(&encoding_offset()).is_err());
    assert!(Card::decode(&(max_encoded_card() + 1u32)).is_err());
    assert!(Card::decode(&BigUint::from(7u32)).is_err());
}

#[test]
fn test_consensus_value_is_decimal_json() {
    let cards = MaskedCards::new(vec![BigUint::from(11u32), BigUint::from(22u32)]);
    let value = cards.to_consensus_value().unwrap();
    assert_eq!(value, r#"["11","22"]"#);
    assert_eq!(MaskedCards::from_consensus_value(&value).unwrap(), cards);

    assert!(MaskedCards::from_consensus_value(r#"["11","x"]"#).is_err());
    assert!(MaskedCards::from_consensus_value("not json").is_err());
}

#[test]
fn test_hole_cards_by_position() {
    let cards = PokerDeck::new().masked_cards();
    let third = cards.hole_cards(2, 2).unwrap();
    assert_eq!(third, cards.cards()[4..6].to_vec());
    assert!(cards.hole_cards(26, 2).is_none());
}

#[test]
fn test_fingerprint_follows_order() {
    let cards = PokerDeck::new().masked_cards();
    let mut reversed = cards.clone().into_inner();
    reversed.reverse();
    let reversed = MaskedCards::new(reversed);
    assert_eq!(cards.hash(), PokerDeck::new().masked_cards().hash());
    assert_ne!(cards.hash(), reversed.hash());
    assert_eq!(cards.fingerprint().len(), 64);
}

fn clubs(ranks: &[u8]) -> Vec<Card> {
    ranks
        .iter()
        .map(|rank| Card::new(*rank, Suit::Clubs).unwrap())
        .collect()
}

#[test]
fn test_hand_scores_by_rank_sum() {
    assert_eq!(hand_score(&clubs(&[1, 13])), 14);
    assert_eq!(hand_score(&[]), 0);
}

#[test]
fn test_ties_share_the_win() {
    let hands = BTreeMap::from([
        (1, clubs(&[4, 6])),
        (2, clubs(&[3, 4])),
        (3, clubs(&[9, 1])),
        (4, clubs(&[2, 1])),
    ]);
    let winners = decide_winners(&hands);
    assert_eq!(winners, vec![1, 3]);
    assert_eq!(winner_bitmap(&[1, 2, 3, 4], &winners), "1010");

    assert!(decide_winners(&BTreeMap::new()).is_empty());
    assert_eq!(winner_bitmap(&[1, 2, 3], &[]), "000");
}

#[test]
fn test_wire_names() {
    let event = GameEvent::RequestEncrypt {
        from_seat: 2,
        deck: vec![BigUint::from(123u32)],
    };
    assert_eq!(
        event.to_json().unwrap(),
        r#"{"type":"REQ_ENCRYPT","from_seat":2,"deck":["123"]}"#
    );

    let event = GameEvent::ShowdownReadyAck { seat: 4 };
    assert_eq!(
        event.to_json().unwrap(),
        r#"{"type":"SHOWDOWN_READY_ACK","seat":4}"#
    );
    assert_eq!(event.kind(), "SHOWDOWN_READY_ACK");
}

#[test]
fn test_parses_showdown() {
    let payload = r#"{"type":"SHOWDOWN","seat":1,"hand":[{"rank":1,"suit":"Spades"},{"rank":12,"suit":"Hearts"}]}"#;
    let GameEvent::Showdown { seat, hand } = GameEvent::from_json(payload).unwrap() else {
        panic!("expected showdown");
    };
    assert_eq!(seat, 1);
    assert_eq!(hand[0], Card::new(1, Suit::Spades).unwrap());
    assert_eq!(hand[1].to_string(), "Queen of Hearts");
}

#[test]
fn test_rejects_malformed_payloads() {
    assert!(GameEvent::from_json(r#"{"type":"NOPE"}"#).is_err());
    assert!(GameEvent::from_json(r#"{"type":"REQ_DECRYPT","relay_from":1}"#).is_err());
    assert!(
        GameEvent::from_json(
            r#"{"type":"REQ_DECRYPT","relay_from":1,"original_sender":1,"hand":["12a"]}"#
        )
        .is_err()
    );
}

fn ring_of(ids: &[u32]) -> PokerTable {
    let table = PokerTable::new(12);
    for id in ids {
        assert!(table.join(*id, format!("127.0.0.1:{}", 9000 + id)));
    }
    table
}

#[test]
fn test_ring_wraps_around() {
    let table = ring_of(&[3, 1, 2, 4]);
    assert_eq!(table.seats(), vec![1, 2, 3, 4]);
    assert_eq!(table.first_seat(), Some(1));
    assert_eq!(table.last_seat(), Some(4));
    assert_eq!(table.successor_of(4), Some(1));
    assert_eq!(table.predecessor_of(1), Some(4));
    assert_eq!(table.successor_of(2), Some(3));
    assert_eq!(table.predecessor_of(3), Some(2));
    assert_eq!(table.position_of(3), Some(2));
    assert_eq!(table.successor_of(9), None);
}

#[test]
fn test_join_rejects_duplicates_and_overflow() {
    let table = PokerTable::new(3);
    assert!(table.join(1, "a"));
    assert!(!table.join(1, "b"));
    assert!(table.join(2, "b"));
    assert!(table.join(3, "c"));
    assert!(!table.join(4, "d"));
    assert_eq!(table.count(), 3);
    assert_eq!(table.address_of(1).as_deref(), Some("a"));

    let empty = PokerTable::new(4);
    assert_eq!(empty.first_seat(), None);
    assert_eq!(empty.last_seat(), None);
    assert_eq!(empty.count(), 0);
}

#[test]
fn test_join_is_announced_to_seated_nodes() {
    let hub = LocalHub::new(Arc::new(PokerTable::new(4)));
    let (first, _) = hub.attach(1, "a").unwrap();
    let (second, _) = hub.attach(2, "b").unwrap();

    assert_eq!(
        first.drain(),
        vec![
            GameEvent::PlayerJoined { seat: 1 },
            GameEvent::PlayerJoined { seat: 2 }
        ]
    );
    assert_eq!(second.drain(), vec![GameEvent::PlayerJoined { seat: 2 }]);
    assert!(hub.attach(2, "again").is_none());
}

#[test]
fn test_broadcast_skips_sender() {
    let hub = LocalHub::new(Arc::new(PokerTable::new(4)));
    let (q1, link1) = hub.attach(1, "a").unwrap();
    let (q2, _) = hub.attach(2, "b").unwrap();
    let (q3, _) = hub.attach(3, "c").unwrap();
    q1.drain();
    q2.drain();
    q3.drain();

    link1.broadcast(GameEvent::ShowdownReadyAck { seat: 1 });
    assert!(q1.is_empty());
    assert_eq!(q2.len(), 1);
    assert_eq!(q3.len(), 1);

    link1.send_to(3, GameEvent::ShowdownReadyAck { seat: 1 });
    assert_eq!(q2.len(), 1);
    assert_eq!(q3.len(), 2);

    link1.send_to(7, GameEvent::ShowdownReadyAck { seat: 1 });
    assert_eq!(link1.seat(), 1);
}
