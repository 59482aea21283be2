//! Crumble (CRyptographic gaMBLE)
//!
//! Writes a shared SRA modulus for every node at the table to load.
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crum_sra::SharedModulus;
use rand::{SeedableRng, rngs::StdRng};

#[derive(Parser, Debug)]
#[command(name = "generate_keys")]
#[command(about = "Generate the shared modulus key file")]
struct Args {
    /// Where to write p, q and n
    #[arg(short, long, default_value = "sra.key", env = "CRUM_KEY_FILE")]
    output: PathBuf,

    /// Size of each prime
    #[arg(long, default_value_t = 512)]
    prime_bits: u64,

    /// Seed for reproducible keys
    #[arg(long)]
    seed: Option<u64>,
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let modulus = SharedModulus::generate(args.prime_bits, &mut rng);
    fs::write(&args.output, modulus.to_key_file_string())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!(
        "Wrote {}-bit modulus to {}",
        modulus.bits(),
        args.output.display()
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run() {
        tracing::error!("generate_keys failed: {:#}", err);
        std::process::exit(1);
    }
}
