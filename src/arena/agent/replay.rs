use crate::arena::{action::AgentAction, game_state::PlayerView};

use super::Agent;

/// A replay agent that will replay a sequence of actions
/// from a vector. Once it runs out it challenges.
#[derive(Debug, Clone)]
pub struct VecReplayAgent {
    actions: Vec<AgentAction>,
    idx: usize,
    default: AgentAction,
}

impl VecReplayAgent {
    pub fn new(actions: Vec<AgentAction>) -> Self {
        Self {
            actions,
            idx: 0,
            default: AgentAction::Challenge,
        }
    }

    /// Play `default` once the actions run out.
    pub fn with_default(mut self, default: AgentAction) -> Self {
        self.default = default;
        self
    }
}

/// A replay agent that will replay a sequence of actions from a slice.
#[derive(Debug, Clone)]
pub struct SliceReplayAgent<'a> {
    actions: &'a [AgentAction],
    idx: usize,
    default: AgentAction,
}

impl<'a> SliceReplayAgent<'a> {
    pub fn new(actions: &'a [AgentAction]) -> Self {
        Self {
            actions,
            idx: 0,
            default: AgentAction::Challenge,
        }
    }
}

impl Agent for VecReplayAgent {
    fn act(&mut self, _id: &uuid::Uuid, _view: &PlayerView) -> AgentAction {
        let idx = self.idx;
        self.idx += 1;
        self.actions.get(idx).copied().unwrap_or(self.default)
    }
}

impl Agent for SliceReplayAgent<'_> {
    fn act(&mut self, _id: &uuid::Uuid, _view: &PlayerView) -> AgentAction {
        let idx = self.idx;
        self.idx += 1;
        self.actions.get(idx).copied().unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{
        arena::{
            Agent, GameState, SessionBuilder,
            action::AgentAction,
            agent::VecReplayAgent,
            config::IllegalActionPolicy,
            game_state::Phase,
            scoring::ScoringRule,
            test_util::assert_valid_game_state,
        },
        core::WildExchange,
    };

    fn game_state(num_players: usize, max_rounds: usize) -> GameState {
        GameState::new(
            num_players,
            5,
            max_rounds,
            WildExchange::default(),
            ScoringRule::default(),
        )
    }

    #[test_log::test]
    fn test_replay_single_round() {
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(VecReplayAgent::new(vec![AgentAction::bid(1, 2)])),
            Box::new(VecReplayAgent::new(vec![AgentAction::Challenge])),
        ];
        let mut rng = StdRng::seed_from_u64(421);

        let mut sim = SessionBuilder::default()
            .game_state(game_state(2, 1))
            .agents(agents)
            .build()
            .unwrap();
        sim.run(&mut rng);

        assert_eq!(Phase::Complete, sim.game_state.phase);
        assert_eq!(1, sim.game_state.round_idx);
        // Someone won the only exchange.
        assert_eq!(1, sim.game_state.scores().iter().sum::<i64>());
        assert_valid_game_state(&sim.game_state);
    }

    #[test_log::test]
    fn test_empty_challenge_is_penalized() {
        // The opener challenges with nothing on the table.
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(VecReplayAgent::new(vec![AgentAction::Challenge])),
            Box::new(VecReplayAgent::new(vec![])),
        ];
        let mut rng = StdRng::seed_from_u64(0);

        let mut sim = SessionBuilder::default()
            .game_state(game_state(2, 1))
            .agents(agents)
            .illegal_action_policy(IllegalActionPolicy::Penalize)
            .build()
            .unwrap();
        sim.run(&mut rng);

        assert_eq!(&[-1, 0], sim.game_state.scores());
        assert_eq!(Some(0), sim.game_state.forfeit_idx);
        assert_valid_game_state(&sim.game_state);
    }

    #[test_log::test]
    fn test_retry_then_legal() {
        // Two bad bids, then a good one. Player one always challenges.
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(VecReplayAgent::new(vec![
                AgentAction::bid(0, 3),
                AgentAction::bid(2, 7),
                AgentAction::bid(1, 1),
            ])),
            Box::new(VecReplayAgent::new(vec![])),
        ];
        let mut rng = StdRng::seed_from_u64(7);

        let mut sim = SessionBuilder::default()
            .game_state(game_state(2, 1))
            .agents(agents)
            .illegal_action_policy(IllegalActionPolicy::Retry { max_retries: 3 })
            .build()
            .unwrap();
        sim.run(&mut rng);

        assert_eq!(None, sim.game_state.forfeit_idx);
        assert!(sim.game_state.resolution.is_some());
        assert_eq!(1, sim.game_state.scores().iter().sum::<i64>());
    }

    #[test_log::test]
    fn test_retries_run_out() {
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(VecReplayAgent::new(vec![]).with_default(AgentAction::bid(0, 4))),
            Box::new(VecReplayAgent::new(vec![])),
        ];
        let mut rng = StdRng::seed_from_u64(7);

        let mut sim = SessionBuilder::default()
            .game_state(game_state(2, 2))
            .agents(agents)
            .illegal_action_policy(IllegalActionPolicy::Retry { max_retries: 2 })
            .illegal_action_penalty(3)
            .build()
            .unwrap();
        sim.run(&mut rng);

        // Round one: player zero opens and forfeits. Round two: player one
        // opens with nothing and challenges it, forfeiting as well.
        assert_eq!(&[-3, -3], sim.game_state.scores());
        assert_eq!(2, sim.game_state.round_idx);
    }
}
