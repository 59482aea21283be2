//! Crumble (CRyptographic gaMBLE)
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::types::{ConsensusStep, NodeId, VoteOutcome, quorum_for};

#[derive(Default, Debug)]
struct RoundState {
    step: ConsensusStep,
    proposal: Option<String>,
    proposer: Option<NodeId>,
    prevotes: BTreeMap<NodeId, String>,
    precommits: BTreeMap<NodeId, String>,
}

#[derive(Debug)]
struct EngineState {
    total_nodes: usize,
    quorum: usize,
    height: u64,
    round: RoundState,
}

impl EngineState {
    fn start_round(&mut self) {
        self.height += 1;
        self.round = RoundState::default();
    }

    /// Most-voted value among recorded prevotes, ties broken by the smaller value.
    fn leading_prevote(&self) -> Option<(String, usize)> {
        let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
        for value in self.round.prevotes.values() {
            *tally.entry(value.as_str()).or_default() += 1;
        }
        tally
            .into_iter()
            .fold(None, |best: Option<(&str, usize)>, (value, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((value, count)),
            })
            .map(|(value, count)| (value.to_string(), count))
    }
}

/// Propose → prevote → precommit → commit over a single opaque value.
///
/// Messages that arrive in the wrong step are dropped, never buffered.
/// Each voter holds at most one vote per step; a second vote overwrites the first.
pub struct ConsensusEngine {
    node_id: NodeId,
    state: Mutex<EngineState>,
}

impl ConsensusEngine {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            state: Mutex::new(EngineState {
                total_nodes: 0,
                quorum: 0,
                height: 0,
                round: RoundState::default(),
            }),
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Room size is only known once the table fills up.
    pub fn configure(&self, total_nodes: usize) {
        let mut state = self.state.lock();
        state.total_nodes = total_nodes;
        state.quorum = quorum_for(total_nodes);
        tracing::debug!(
            node = self.node_id,
            total_nodes,
            quorum = state.quorum,
            "consensus configured"
        );
    }

    pub fn total_nodes(&self) -> usize {
        self.state.lock().total_nodes
    }

    pub fn quorum(&self) -> usize {
        self.state.lock().quorum
    }

    pub fn height(&self) -> u64 {
        self.state.lock().height
    }

    pub fn step(&self) -> ConsensusStep {
        self.state.lock().round.step
    }

    pub fn proposer(&self) -> Option<NodeId> {
        self.state.lock().round.proposer
    }

    pub fn prevote_of(&self, voter: NodeId) -> Option<String> {
        self.state.lock().round.prevotes.get(&voter).cloned()
    }

    pub fn prevote_count(&self) -> usize {
        self.state.lock().round.prevotes.len()
    }

    pub fn precommit_count(&self) -> usize {
        self.state.lock().round.precommits.len()
    }

    /// Opens a fresh round and waits for someone else's proposal.
    pub fn await_proposal(&self) {
        let mut state = self.state.lock();
        state.start_round();
        state.round.step = ConsensusStep::WaitingForProposal;
        tracing::debug!(node = self.node_id, height = state.height, "waiting for proposal");
    }

    /// Opens a fresh round with this node as proposer and seeds its own prevote.
    ///
    /// Returns `false` when a round is already in flight.
    pub fn propose(&self, value: String) -> bool {
        let mut state = self.state.lock();
        if !matches!(
            state.round.step,
            ConsensusStep::Idle | ConsensusStep::WaitingForProposal
        ) {
            return false;
        }
        state.start_round();
        state.round.step = ConsensusStep::Prevote;
        state.round.proposer = Some(self.node_id);
        state.round.prevotes.insert(self.node_id, value.clone());
        state.round.proposal = Some(value);
        tracing::debug!(node = self.node_id, height = state.height, "proposed value");
        true
    }

    pub fn on_proposal(&self, proposer: NodeId, value: String) -> VoteOutcome {
        let mut state = self.state.lock();
        if state.round.step != ConsensusStep::WaitingForProposal {
            return VoteOutcome::Ignored;
        }
        state.round.step = ConsensusStep::Prevote;
        state.round.proposer = Some(proposer);
        state.round.prevotes.insert(self.node_id, value.clone());
        state.round.proposal = Some(value.clone());
        tracing::debug!(node = self.node_id, proposer, "accepted proposal");
        VoteOutcome::BroadcastPrevote(value)
    }

    pub fn on_prevote(&self, voter: NodeId, value: String) -> VoteOutcome {
        let mut state = self.state.lock();
        if state.round.step != ConsensusStep::Prevote {
            return VoteOutcome::Ignored;
        }
        state.round.prevotes.insert(voter, value);

        if state.round.prevotes.len() + 1 < state.total_nodes {
            return VoteOutcome::Recorded;
        }

        let Some((leading, count)) = state.leading_prevote() else {
            return VoteOutcome::Recorded;
        };
        if count < state.quorum {
            return VoteOutcome::Recorded;
        }

        let node_id = self.node_id;
        state.round.step = ConsensusStep::Precommit;
        state.round.proposal = Some(leading.clone());
        state.round.precommits.insert(node_id, leading.clone());
        tracing::debug!(node = node_id, votes = count, "prevote quorum reached");
        VoteOutcome::BroadcastPrecommit(leading)
    }

    pub fn on_precommit(&self, voter: NodeId, value: String) -> VoteOutcome {
        let mut state = self.state.lock();
        if state.round.step != ConsensusStep::Precommit {
            return VoteOutcome::Ignored;
        }
        state.round.precommits.insert(voter, value);

        if state.round.precommits.len() < state.quorum {
            return VoteOutcome::Recorded;
        }

        let Some(adopted) = state.round.proposal.clone() else {
            return VoteOutcome::Recorded;
        };
        let matching = state
            .round
            .precommits
            .values()
            .filter(|v| **v == adopted)
            .count();

        if matching >= state.quorum {
            state.round.step = ConsensusStep::Commit;
            tracing::debug!(node = self.node_id, height = state.height, "value committed");
            VoteOutcome::Committed(adopted)
        } else {
            tracing::warn!(
                node = self.node_id,
                height = state.height,
                matching,
                quorum = state.quorum,
                "precommits disagree, round aborted"
            );
            state.round = RoundState::default();
            VoteOutcome::Aborted
        }
    }

    pub fn has_consensus(&self) -> bool {
        self.state.lock().round.step == ConsensusStep::Commit
    }

    /// The agreed value, once [`Self::has_consensus`] holds.
    pub fn consensus_value(&self) -> Option<String> {
        let state = self.state.lock();
        match state.round.step {
            ConsensusStep::Commit => state.round.proposal.clone(),
            _ => None,
        }
    }
}
