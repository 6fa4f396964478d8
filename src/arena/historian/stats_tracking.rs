use std::{cell::RefCell, rc::Rc};

use super::{Historian, HistorianError};

use crate::arena::GameState;
use crate::arena::action::{Action, AgentAction, PlayedActionPayload, ResolutionPayload};

/// Counters for a single seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStats {
    /// Accepted actions of any kind.
    pub actions_count: usize,
    pub bid_count: usize,
    pub challenge_count: usize,
    /// Challenges where the bid turned out to be false.
    pub challenge_won_count: usize,
    /// Times this player's bid was challenged.
    pub challenged_count: usize,
    /// Times this player's bid was challenged and held.
    pub bid_held_count: usize,
    pub illegal_count: usize,
    pub forfeit_count: usize,
}

impl PlayerStats {
    /// The fraction of this player's challenges that were right.
    pub fn challenge_accuracy(&self) -> Option<f64> {
        (self.challenge_count > 0)
            .then(|| self.challenge_won_count as f64 / self.challenge_count as f64)
    }
}

/// Storage for tracking Wild Perudo player statistics, one entry per seat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsStorage {
    pub players: Vec<PlayerStats>,
    pub rounds_count: usize,
}

impl StatsStorage {
    pub fn new_with_num_players(num_players: usize) -> Self {
        Self {
            players: vec![PlayerStats::default(); num_players],
            rounds_count: 0,
        }
    }

    fn player_mut(&mut self, idx: usize) -> &mut PlayerStats {
        if idx >= self.players.len() {
            self.players.resize(idx + 1, PlayerStats::default());
        }
        &mut self.players[idx]
    }
}

/// A historian implementation that tracks bidding and challenge statistics
/// for every seat.
///
/// Clones share the same storage, so one set of counters can follow a
/// whole series of sessions.
#[derive(Default, Clone)]
pub struct StatsTrackingHistorian {
    storage: Rc<RefCell<StatsStorage>>,
}

impl StatsTrackingHistorian {
    pub fn get_storage(&self) -> Rc<RefCell<StatsStorage>> {
        self.storage.clone()
    }

    pub fn new_with_num_players(num_players: usize) -> Self {
        Self {
            storage: Rc::new(RefCell::new(StatsStorage::new_with_num_players(
                num_players,
            ))),
        }
    }

    fn record_played_action(&mut self, payload: PlayedActionPayload) -> Result<(), HistorianError> {
        let mut storage = self.storage.try_borrow_mut()?;
        let stats = storage.player_mut(payload.idx);
        stats.actions_count += 1;
        match payload.action {
            AgentAction::Bid(_) => stats.bid_count += 1,
            AgentAction::Challenge => stats.challenge_count += 1,
        }
        Ok(())
    }

    fn record_resolution(&mut self, payload: ResolutionPayload) -> Result<(), HistorianError> {
        let mut storage = self.storage.try_borrow_mut()?;
        let bidder = storage.player_mut(payload.bidder_idx);
        bidder.challenged_count += 1;
        if payload.resolution.success {
            bidder.bid_held_count += 1;
        } else {
            storage.player_mut(payload.challenger_idx).challenge_won_count += 1;
        }
        Ok(())
    }
}

impl Historian for StatsTrackingHistorian {
    fn record_action(
        &mut self,
        _id: &uuid::Uuid,
        _game_state: &GameState,
        action: Action,
    ) -> Result<(), HistorianError> {
        match action {
            Action::PlayedAction(payload) => self.record_played_action(payload),
            Action::Resolved(payload) => self.record_resolution(payload),
            Action::IllegalAction(payload) => {
                self.storage.try_borrow_mut()?.player_mut(payload.idx).illegal_count += 1;
                Ok(())
            }
            Action::Forfeit(idx) => {
                self.storage.try_borrow_mut()?.player_mut(idx).forfeit_count += 1;
                Ok(())
            }
            Action::RoundStart(_) => {
                self.storage.try_borrow_mut()?.rounds_count += 1;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{
        arena::{
            Agent, SessionBuilder, agent::VecReplayAgent, config::IllegalActionPolicy,
            scoring::ScoringRule,
        },
        core::WildExchange,
    };

    use super::*;

    fn game_state(max_rounds: usize) -> GameState {
        GameState::new(2, 5, max_rounds, WildExchange::default(), ScoringRule::default())
    }

    #[test]
    fn test_bid_then_challenge_counted() {
        let hist = Box::new(StatsTrackingHistorian::new_with_num_players(2));
        let storage = hist.get_storage();

        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(VecReplayAgent::new(vec![AgentAction::bid(1, 2)])),
            Box::new(VecReplayAgent::new(vec![])),
        ];

        let mut sim = SessionBuilder::default()
            .game_state(game_state(1))
            .agents(agents)
            .historians(vec![hist])
            .build()
            .unwrap();
        sim.run(&mut StdRng::seed_from_u64(1));

        let storage = storage.borrow();
        assert_eq!(1, storage.rounds_count);
        assert_eq!(1, storage.players[0].bid_count);
        assert_eq!(1, storage.players[0].challenged_count);
        assert_eq!(1, storage.players[1].challenge_count);
        assert_eq!(
            storage.players[0].bid_held_count + storage.players[1].challenge_won_count,
            1
        );
    }

    #[test]
    fn test_illegal_and_forfeit_counted() {
        let hist = Box::new(StatsTrackingHistorian::new_with_num_players(2));
        let storage = hist.get_storage();

        // Opening with a challenge is never legal.
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(VecReplayAgent::new(vec![])),
            Box::new(VecReplayAgent::new(vec![])),
        ];

        let mut sim = SessionBuilder::default()
            .game_state(game_state(2))
            .agents(agents)
            .illegal_action_policy(IllegalActionPolicy::Retry { max_retries: 1 })
            .historians(vec![hist])
            .build()
            .unwrap();
        sim.run(&mut StdRng::seed_from_u64(2));

        let storage = storage.borrow();
        assert_eq!(2, storage.rounds_count);
        for player in &storage.players {
            assert_eq!(2, player.illegal_count);
            assert_eq!(1, player.forfeit_count);
            assert_eq!(0, player.actions_count);
            assert_eq!(None, player.challenge_accuracy());
        }
    }

    #[test]
    fn test_clones_share_storage() {
        let hist = StatsTrackingHistorian::new_with_num_players(2);
        let storage = hist.get_storage();

        for seed in 0..3 {
            let mut sim = SessionBuilder::default()
                .game_state(game_state(2))
                .historians(vec![Box::new(hist.clone())])
                .build()
                .unwrap();
            sim.run(&mut StdRng::seed_from_u64(seed));
        }

        assert_eq!(6, storage.borrow().rounds_count);
    }

    #[test]
    fn test_grows_for_unknown_seats() {
        let mut storage = StatsStorage::default();
        storage.player_mut(3).bid_count += 1;
        assert_eq!(4, storage.players.len());
    }
}
