use crate::arena::{GameState, action::Action};

use super::{Historian, HistorianError};

/// A historian that will always fail to record an action
/// and will return an error.
///
/// This historian is useful for testing the behavior of the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingHistorian;

impl Historian for FailingHistorian {
    fn record_action(
        &mut self,
        _id: &uuid::Uuid,
        _game_state: &GameState,
        _action: Action,
    ) -> Result<(), HistorianError> {
        Err(HistorianError::UnableToRecordAction)
    }
}
