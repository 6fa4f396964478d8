use crate::core::Bid;

use super::{
    errors::IllegalActionError, game_state::Phase, resolution::Resolution, scoring::ScoreDelta,
};

/// What an agent can do on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgentAction {
    /// Raise to a new bid.
    Bid(Bid),
    /// Call the current bid and reveal the dice.
    Challenge,
}

impl AgentAction {
    pub const fn bid(quantity: u32, face: u8) -> Self {
        AgentAction::Bid(Bid::new(quantity, face))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStartPayload {
    pub num_players: usize,
    pub hand_size: usize,
    pub max_rounds: usize,
}

/// An action that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedActionPayload {
    pub idx: usize,
    pub action: AgentAction,
    /// How many illegal tries came before this one.
    pub retries: u32,
}

/// An action that was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IllegalActionPayload {
    pub idx: usize,
    pub action: AgentAction,
    pub reason: IllegalActionError,
    /// Whether the agent is going to be asked again.
    pub will_retry: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionPayload {
    pub bidder_idx: usize,
    pub challenger_idx: usize,
    pub resolution: Resolution,
}

/// Everything that can happen in a session, in the order historians see it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    GameStart(GameStartPayload),
    /// A new round is starting. The value is the zero based round index.
    RoundStart(usize),
    /// Every pool has been rolled.
    Rolled,
    PlayedAction(PlayedActionPayload),
    IllegalAction(IllegalActionPayload),
    /// A player forfeited the round after an illegal action.
    Forfeit(usize),
    Resolved(ResolutionPayload),
    Scored(ScoreDelta),
    PhaseAdvance(Phase),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid() {
        let a = AgentAction::bid(3, 4);
        assert_eq!(AgentAction::Bid(Bid::new(3, 4)), a);
        assert_ne!(AgentAction::Challenge, a);
    }
}
