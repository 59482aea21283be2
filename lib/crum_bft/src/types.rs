pub type NodeId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConsensusStep {
    #[default]
    Idle,
    WaitingForProposal,
    Prevote,
    Precommit,
    Commit,
}

/// What the caller has to do after feeding a message into the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Message arrived outside of its step and was dropped.
    Ignored,
    /// Vote stored, no transition.
    Recorded,
    BroadcastPrevote(String),
    BroadcastPrecommit(String),
    Committed(String),
    /// Precommit quorum reached without agreement; the round is back to idle.
    Aborted,
}

/// Simple majority: `floor(total / 2) + 1`.
pub const fn quorum_for(total_nodes: usize) -> usize {
    total_nodes / 2 + 1
}
