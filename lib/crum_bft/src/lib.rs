//! Crumble (CRyptographic gaMBLE)
//!
//! Three-phase quorum voting (propose, prevote, precommit) used by the table
//! to agree on one opaque value per decision.
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

pub mod engine;
pub mod types;

pub use engine::ConsensusEngine;
pub use types::{ConsensusStep, NodeId, VoteOutcome, quorum_for};
