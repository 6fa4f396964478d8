use thiserror::Error;

use super::Bid;

/// This is the core error type for the
/// wild perudo library. It uses `thiserror` to provide
/// readable error messages
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildPerudoError {
    #[error("Die faces must be between 1 and 6, found {0}")]
    InvalidFace(u8),
    #[error("Bids must claim at least one die")]
    ZeroQuantity,
    #[error("Bid {proposed} does not outrank the current bid {current}")]
    DoesNotOutrank { proposed: Bid, current: Bid },
    #[error("Dice pools need at least one die")]
    EmptyDicePool,
}
