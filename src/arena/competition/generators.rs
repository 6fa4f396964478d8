use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::arena::GameState;

/// This is a simple generator that just clones the game state
/// every time it's called.
#[derive(Debug, Clone)]
pub struct CloneGameStateGenerator {
    game_state: GameState,
}

impl CloneGameStateGenerator {
    pub fn new(game_state: GameState) -> CloneGameStateGenerator {
        CloneGameStateGenerator { game_state }
    }
}

impl Iterator for CloneGameStateGenerator {
    type Item = GameState;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.game_state.clone())
    }
}

/// Clones a starting game state but puts the opening seat somewhere random,
/// so no seat gets to open the first round every session.
#[derive(Debug, Clone)]
pub struct RandomGameStateGenerator {
    game_state: GameState,
    rng: StdRng,
}

impl RandomGameStateGenerator {
    pub fn new(game_state: GameState, seed: u64) -> RandomGameStateGenerator {
        RandomGameStateGenerator {
            game_state,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Iterator for RandomGameStateGenerator {
    type Item = GameState;

    fn next(&mut self) -> Option<Self::Item> {
        let mut game_state = self.game_state.clone();
        game_state.opening_idx = self.rng.random_range(0..game_state.num_players.max(1));
        game_state.to_act_idx = game_state.opening_idx;
        Some(game_state)
    }
}
