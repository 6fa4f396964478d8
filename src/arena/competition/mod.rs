mod generators;
mod session_competition;
mod sim_iterator;

pub use generators::{CloneGameStateGenerator, RandomGameStateGenerator};
pub use session_competition::SessionCompetition;
pub use sim_iterator::StandardSimulationIterator;
