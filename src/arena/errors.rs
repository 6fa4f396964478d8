use thiserror::Error;

use crate::core::WildPerudoError;

/// Why an agent's action was refused. These never end a session, the
/// simulation either asks the agent again or penalizes it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalActionError {
    #[error("Illegal bid: {0}")]
    IllegalBid(#[from] WildPerudoError),
    #[error("Can't challenge before anyone has bid")]
    IllegalChallenge,
}

/// Problems with how a session was set up. These are reported before any
/// dice are rolled.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Unsupported agent kind: {0}")]
    UnsupportedAgentKind(String),
    #[error("max_rounds must be positive")]
    NonPositiveMaxRounds,
    #[error("hand_size must be positive")]
    NonPositiveHandSize,
    #[error("At least two players are needed, found {0}")]
    TooFewPlayers(usize),
    #[error("Theory of mind order {order} is above the maximum of {max}")]
    TheoryOfMindOrderTooHigh { order: usize, max: usize },
    #[error("Confidence threshold must be within [0, 1], found {0}")]
    InvalidConfidenceThreshold(f64),
    #[error("Scoring rewards and penalties can't be negative")]
    NegativeScoring,
    #[error("Human player in seat {0} has no prompter")]
    MissingPrompter(usize),
    #[error("Expected {expected} agents, found {found}")]
    AgentCountMismatch { expected: usize, found: usize },
    #[error("Game state doesn't match the configuration")]
    GameStateMismatch,
    #[error("A game state or a session config is needed")]
    NeedGameState,
    #[error("Unable to parse configuration: {0}")]
    InvalidConfiguration(String),
}
