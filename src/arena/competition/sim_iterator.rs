use crate::arena::{
    AgentGenerator, GameState, SessionBuilder, WildPerudoSimulation, config::IllegalActionPolicy,
    historian::HistorianGenerator,
};

/// Turns a stream of starting game states into ready to run simulations,
/// building fresh agents and historians for each one.
pub struct StandardSimulationIterator<G>
where
    G: Iterator<Item = GameState>,
{
    agent_generators: Vec<Box<dyn AgentGenerator>>,
    historian_generators: Vec<Box<dyn HistorianGenerator>>,
    game_state_iterator: G,
    illegal_action_policy: IllegalActionPolicy,
    illegal_action_penalty: i64,
}

impl<G> StandardSimulationIterator<G>
where
    G: Iterator<Item = GameState>,
{
    pub fn new(
        agent_generators: Vec<Box<dyn AgentGenerator>>,
        historian_generators: Vec<Box<dyn HistorianGenerator>>,
        game_state_iterator: G,
    ) -> StandardSimulationIterator<G> {
        StandardSimulationIterator {
            agent_generators,
            historian_generators,
            game_state_iterator,
            illegal_action_policy: IllegalActionPolicy::default(),
            illegal_action_penalty: 1,
        }
    }

    pub fn with_illegal_action_policy(mut self, policy: IllegalActionPolicy, penalty: i64) -> Self {
        self.illegal_action_policy = policy;
        self.illegal_action_penalty = penalty;
        self
    }

    fn generate(&mut self, game_state: GameState) -> Option<WildPerudoSimulation> {
        let agents = self
            .agent_generators
            .iter()
            .enumerate()
            .map(|(seat_idx, g)| g.generate(seat_idx, &game_state))
            .collect();
        let historians = self
            .historian_generators
            .iter()
            .map(|g| g.generate(&game_state))
            .collect();

        SessionBuilder::default()
            .agents(agents)
            .historians(historians)
            .game_state(game_state)
            .illegal_action_policy(self.illegal_action_policy)
            .illegal_action_penalty(self.illegal_action_penalty)
            .build()
            .ok()
    }
}

impl<G> Iterator for StandardSimulationIterator<G>
where
    G: Iterator<Item = GameState>,
{
    type Item = WildPerudoSimulation;

    fn next(&mut self) -> Option<Self::Item> {
        let game_state = self.game_state_iterator.next()?;
        self.generate(game_state)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        arena::{
            agent::ZeroOrderAgentGenerator, competition::CloneGameStateGenerator,
            scoring::ScoringRule,
        },
        core::WildExchange,
    };

    use super::*;

    #[test]
    fn test_static_simulation_generator() {
        let generators: Vec<Box<dyn AgentGenerator>> = vec![
            Box::new(ZeroOrderAgentGenerator::new(0.5, Some(1))),
            Box::new(ZeroOrderAgentGenerator::new(0.5, Some(2))),
            Box::new(ZeroOrderAgentGenerator::new(0.5, Some(3))),
        ];
        let game_state = GameState::new(3, 5, 2, WildExchange::default(), ScoringRule::default());
        let mut sim_gen = StandardSimulationIterator::new(
            generators,
            vec![],
            CloneGameStateGenerator::new(game_state),
        );

        let first = sim_gen
            .next()
            .expect("There should always be a first simulation");
        let second = sim_gen.next().expect("And a second");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_mismatched_generators_stop() {
        let generators: Vec<Box<dyn AgentGenerator>> =
            vec![Box::new(ZeroOrderAgentGenerator::new(0.5, Some(1)))];
        let game_state = GameState::new(3, 5, 2, WildExchange::default(), ScoringRule::default());
        let mut sim_gen = StandardSimulationIterator::new(
            generators,
            vec![],
            CloneGameStateGenerator::new(game_state),
        );
        assert!(sim_gen.next().is_none());
    }
}
