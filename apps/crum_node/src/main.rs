//! Crumble (CRyptographic gaMBLE)
//!
//! Mental Poker (1979) implemented using Shamir–Rivest–Adleman (SRA) commutative encryption.
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use crum_pkr::{
    GamePhase, LocalHub, LocalLink, PokerNode, PokerTable, TableConfig,
    config::{DEFAULT_BUY_IN, DEFAULT_HOLE_CARDS, DEFAULT_PLAYER_COUNT, TABLE_SIZE},
};
use crum_sra::SharedModulus;
use itertools::Itertools;
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

const BASE_PORT: u32 = 7000;

type Node = PokerNode<PokerTable, LocalLink>;

#[derive(Parser, Debug)]
#[command(name = "crum_node")]
#[command(about = "Deal one hand of mental poker between nodes on this host")]
struct Args {
    /// Number of players at the table
    #[arg(short, long, default_value_t = DEFAULT_PLAYER_COUNT)]
    players: usize,

    /// Chips each player antes into the pot
    #[arg(long, default_value_t = DEFAULT_BUY_IN)]
    buy_in: u64,

    /// Pause before the decryption relay and before finalizing winners
    #[arg(long, default_value_t = 500)]
    settle_ms: u64,

    /// Shared modulus file (p, q and n on three lines)
    #[arg(short, long, env = "CRUM_KEY_FILE")]
    key_file: Option<PathBuf>,

    /// Prime size when no key file is given
    #[arg(long, default_value_t = 512)]
    prime_bits: u64,

    /// Sleep between polls of an empty inbox
    #[arg(long, default_value_t = 5)]
    idle_ms: u64,

    /// Give up if the hand has not completed by then
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

fn load_modulus(args: &Args) -> Result<SharedModulus> {
    match &args.key_file {
        Some(path) => SharedModulus::from_key_file(path)
            .with_context(|| format!("Failed to load key file {}", path.display())),
        None => {
            tracing::info!("Generating a {}-bit shared modulus", args.prime_bits * 2);
            Ok(SharedModulus::generate(args.prime_bits, &mut thread_rng()))
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = TableConfig {
        player_count: args.players,
        buy_in: args.buy_in,
        hole_cards: DEFAULT_HOLE_CARDS,
        settle_delay: Duration::from_millis(args.settle_ms),
    };
    config.validate()?;
    let modulus = load_modulus(&args)?;
    let idle = Duration::from_millis(args.idle_ms);

    let hub = LocalHub::new(Arc::new(PokerTable::new(TABLE_SIZE)));
    let stop = Arc::new(AtomicBool::new(false));

    let mut handles: Vec<JoinHandle<Node>> = Vec::with_capacity(config.player_count);
    for seat in 1..=config.player_count as u32 {
        let (inbox, link) = hub
            .attach(seat, format!("127.0.0.1:{}", BASE_PORT + seat))
            .with_context(|| format!("Seat {seat} is not available"))?;
        let mut node = PokerNode::new(seat, config.clone(), &modulus, hub.table().clone(), link)?;
        let stop = stop.clone();
        handles.push(thread::spawn(move || {
            node.run(&inbox, idle, &stop);
            node
        }));
    }

    let deadline = Instant::now() + Duration::from_secs(args.timeout_secs);
    while !handles.iter().all(JoinHandle::is_finished) {
        if Instant::now() >= deadline {
            tracing::warn!("Hand timed out, stopping nodes");
            stop.store(true, Ordering::Release);
            break;
        }
        thread::sleep(idle);
    }

    let nodes = handles
        .into_iter()
        .map(|handle| handle.join().map_err(|_| anyhow!("Node thread panicked")))
        .collect::<Result<Vec<_>>>()?;

    report(&nodes)
}

fn report(nodes: &[Node]) -> Result<()> {
    for node in nodes {
        let cards_str = node
            .own_hand()
            .map_or("_!".to_string(), |hand| hand.iter().join(", "));
        tracing::info!("Player {} cards: {}", node.seat(), cards_str);
    }

    if let Some(stalled) = nodes.iter().find(|node| node.phase() != GamePhase::Complete) {
        bail!(
            "Seat {} stalled in {:?}",
            stalled.seat(),
            stalled.phase()
        );
    }

    let Some(first) = nodes.first() else {
        bail!("No players");
    };
    let bitmap = first.winner_bitmap();
    if nodes.iter().any(|node| node.winner_bitmap() != bitmap) {
        bail!("Nodes disagree on the winners");
    }

    let betting = first.state().betting();
    for seat in first.winners() {
        tracing::info!(
            "Player {} wins {} chips, stack {}",
            seat,
            first.state().winner_share(),
            betting.chips_remaining(*seat)
        );
    }
    tracing::info!("Hand ended, winners {}", bitmap);
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cfg!(feature = "pure_output") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(false)
            .without_time()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

pub fn main() {
    init_logging();

    if let Err(err) = run(Args::parse()) {
        tracing::error!("Error: {:#}", err);
        std::process::exit(1);
    }
}
