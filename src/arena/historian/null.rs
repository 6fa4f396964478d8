use crate::arena::{GameState, action::Action};

use super::{Historian, HistorianError};

/// A historian that accepts every action and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHistorian;

impl Historian for NullHistorian {
    fn record_action(
        &mut self,
        _id: &uuid::Uuid,
        _game_state: &GameState,
        _action: Action,
    ) -> Result<(), HistorianError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{
        arena::{SessionBuilder, scoring::ScoringRule},
        core::WildExchange,
    };

    use super::*;

    #[test]
    fn test_null_historian_is_kept() {
        let game_state = GameState::new(2, 5, 2, WildExchange::default(), ScoringRule::default());
        let mut sim = SessionBuilder::default()
            .game_state(game_state)
            .panic_on_historian_error(true)
            .historians(vec![Box::new(NullHistorian)])
            .build()
            .unwrap();
        sim.run(&mut StdRng::seed_from_u64(8));

        assert_eq!(1, sim.historians.len());
    }
}
