use thiserror::Error;

use super::{GameState, action::Action};

/// HistorianError is the error type for historian implementations.
#[derive(Error, Debug)]
pub enum HistorianError {
    #[error("Unable to record action")]
    UnableToRecordAction,
    #[error("Borrow Mut Error: {0}")]
    BorrowMutError(#[from] std::cell::BorrowMutError),
    #[error("Borrow Error: {0}")]
    BorrowError(#[from] std::cell::BorrowError),
}

/// Historians are a way for the simulation to record or notify of
/// actions while the session is progressing. This is useful for
/// logging, debugging, statistics or a replay system.
pub trait Historian {
    /// This method is called by the simulation when an action is received.
    ///
    /// # Arguments
    /// - `id` - The id of the simulation that the action was received on.
    /// - `game_state` - The game state after the action was played
    /// - `action` - The action that was played
    ///
    /// # Returns
    /// - `Ok(())` if the action was recorded successfully
    /// - `Err(HistorianError)` if there was an error recording the action.
    ///
    /// Returning an error will cause the historian to be dropped from the
    /// simulation, unless the simulation was built to panic instead.
    fn record_action(
        &mut self,
        id: &uuid::Uuid,
        game_state: &GameState,
        action: Action,
    ) -> Result<(), HistorianError>;
}

/// Builds a fresh historian for every simulation a competition runs.
pub trait HistorianGenerator {
    fn generate(&self, game_state: &GameState) -> Box<dyn Historian>;
}

/// A `HistorianGenerator` that hands out clones of a prototype.
pub struct CloneHistorianGenerator<T> {
    historian: T,
}

impl<T> CloneHistorianGenerator<T>
where
    T: Historian + Clone,
{
    pub fn new(historian: T) -> Self {
        CloneHistorianGenerator { historian }
    }
}

impl<T> HistorianGenerator for CloneHistorianGenerator<T>
where
    T: Historian + Clone + 'static,
{
    fn generate(&self, _game_state: &GameState) -> Box<dyn Historian> {
        Box::new(self.historian.clone())
    }
}

mod failing;
mod fn_historian;
mod null;
mod stats_tracking;
mod vec;

pub use failing::FailingHistorian;
pub use fn_historian::FnHistorian;
pub use null::NullHistorian;
pub use stats_tracking::{PlayerStats, StatsStorage, StatsTrackingHistorian};
pub use vec::{HistoryRecord, VecHistorian};
