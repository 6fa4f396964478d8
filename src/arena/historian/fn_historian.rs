use crate::arena::{GameState, action::Action};

use super::{Historian, HistorianError};

/// A historian that hands every action to a closure. This is
/// useful for testing and debugging.
#[derive(Debug, Clone)]
pub struct FnHistorian<F> {
    func: F,
}

impl<F: FnMut(&uuid::Uuid, &GameState, Action) -> Result<(), HistorianError>> FnHistorian<F> {
    /// Create a new `FnHistorian` with the provided function
    /// that will be called when an action is received on a simulation.
    pub fn new(f: F) -> Self {
        Self { func: f }
    }
}

impl<F: FnMut(&uuid::Uuid, &GameState, Action) -> Result<(), HistorianError>> Historian
    for FnHistorian<F>
{
    fn record_action(
        &mut self,
        id: &uuid::Uuid,
        game_state: &GameState,
        action: Action,
    ) -> Result<(), HistorianError> {
        (self.func)(id, game_state, action)
    }
}
