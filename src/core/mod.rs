//! This is the core module. It exports the dice, bids and probability
//! code that doesn't depend on how a game is run.

/// face.rs has the six sided die faces.
mod face;
/// Re-export Face
pub use self::face::{Face, NUM_FACES};

/// A player's hidden hand of dice.
mod dice_pool;
pub use self::dice_pool::DicePool;

/// Bids and the weighted wild ranking.
mod bid;
pub use self::bid::{Bid, BidRank, WildExchange};

/// Binomial helpers and support count distributions.
mod probability;
pub use self::probability::{SupportDistribution, binomial_pmf, binomial_tail};

/// Export the error type that everything in core uses.
mod error;
pub use self::error::WildPerudoError;
