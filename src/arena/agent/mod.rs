//! `Agent`s are the players in a Wild Perudo session. They decide whether
//! to raise the current bid or challenge it.
//!
//! Three kinds of player are provided:
//!
//! - `HumanAgent` relays every decision to an `ActionPrompter`.
//! - `ZeroOrderAgent` treats unseen dice as independent rolls.
//! - `TheoryOfMindAgent` also reasons about what the other players' bids
//!   say about their dice.
//!
//! The replay agents are there for deterministic tests.
mod decision;
mod human;
mod replay;
mod theory_of_mind;
mod zero_order;

use super::{
    action::AgentAction,
    errors::IllegalActionError,
    game_state::{GameState, PlayerView},
};

/// This is the trait that you need to implement in order to implement
/// different strategies. It's up to you to implement the logic and state.
pub trait Agent {
    /// This is the method that will be called by the game to get the action
    fn act(&mut self, id: &uuid::Uuid, view: &PlayerView) -> AgentAction;

    /// Called when the action returned from `act` was refused.
    ///
    /// The default does nothing.
    fn illegal_action(&mut self, _action: &AgentAction, _reason: &IllegalActionError) {}
}

/// AgentGenerator is a trait that is used to build agents for competitions
/// where each simulation needs a new agent.
pub trait AgentGenerator {
    /// This method is called before each session to build a new agent for
    /// `seat_idx`.
    fn generate(&self, seat_idx: usize, game_state: &GameState) -> Box<dyn Agent>;
}

pub trait CloneAgent: Agent {
    fn clone_box(&self) -> Box<dyn Agent>;
}

impl<T> CloneAgent for T
where
    T: 'static + Agent + Clone,
{
    fn clone_box(&self) -> Box<dyn Agent> {
        Box::new(self.clone())
    }
}

pub struct CloneAgentGenerator<T> {
    agent: T,
}

impl<T> CloneAgentGenerator<T>
where
    T: CloneAgent,
{
    pub fn new(agent: T) -> Self {
        CloneAgentGenerator { agent }
    }
}

impl<T> AgentGenerator for CloneAgentGenerator<T>
where
    T: CloneAgent,
{
    fn generate(&self, _seat_idx: usize, _game_state: &GameState) -> Box<dyn Agent> {
        self.agent.clone_box()
    }
}

pub use decision::{DecisionRule, SupportEstimate};
pub use human::{
    ActionPrompter, ChannelPrompter, DEFAULT_INVALID_INPUT_RETRIES, DEFAULT_PROMPT_TIMEOUT,
    FnPrompter, HumanAgent, IoPrompter, PromptChannel, PromptError, PromptRequest, forfeit_action,
    parse_action,
};
pub use replay::{SliceReplayAgent, VecReplayAgent};
pub use theory_of_mind::{TheoryOfMindAgent, TheoryOfMindAgentGenerator};
pub use zero_order::{ZeroOrderAgent, ZeroOrderAgentGenerator};
