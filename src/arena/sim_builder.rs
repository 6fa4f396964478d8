use super::{
    Agent, GameState, WildPerudoSimulation,
    agent::{ActionPrompter, ZeroOrderAgent},
    config::{IllegalActionPolicy, SessionConfig},
    errors::ConfigurationError,
    historian::Historian,
};

fn build_agents(num_agents: usize) -> Vec<Box<dyn Agent>> {
    (0..num_agents)
        .map(|_| -> Box<dyn Agent> { Box::<ZeroOrderAgent>::default() })
        .collect()
}

/// # SessionBuilder
///
/// `SessionBuilder` is a builder to allow for complex configurations of a
/// Wild Perudo session played via agents. Either a `SessionConfig` or a
/// `GameState` is required, other fields are optional.
///
/// ## Setters
///
/// Each setter will set the optional value to the passed in value. Then
/// return the mutated builder.
///
/// When a config is given and no agents are, one agent is built per
/// `AgentKind` in the config. Human seats take the prompters in order. When
/// there's only a game state and no agents, every seat gets a
/// `ZeroOrderAgent`.
///
/// ## Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use wild_perudo::arena::SessionBuilder;
/// use wild_perudo::arena::config::{AgentKind, SessionConfig};
///
/// let config = SessionConfig::new(vec![AgentKind::ZeroOrder, AgentKind::TheoryOfMind(1)], 3);
/// let mut rng = StdRng::seed_from_u64(420);
/// let mut sim = SessionBuilder::default().config(config).build().unwrap();
///
/// let summary = sim.run(&mut rng);
/// assert_eq!(3, summary.rounds_played);
/// ```
#[derive(Default)]
pub struct SessionBuilder {
    config: Option<SessionConfig>,
    agents: Option<Vec<Box<dyn Agent>>>,
    prompters: Vec<Box<dyn ActionPrompter>>,
    historians: Vec<Box<dyn Historian>>,
    game_state: Option<GameState>,
    illegal_action_policy: Option<IllegalActionPolicy>,
    illegal_action_penalty: Option<i64>,
    panic_on_historian_error: bool,
}

impl SessionBuilder {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the agents for the simulation created by this builder.
    pub fn agents(mut self, agents: Vec<Box<dyn Agent>>) -> Self {
        self.agents = Some(agents);
        self
    }

    /// Prompters for the human seats in the config, in seat order.
    pub fn prompters(mut self, prompters: Vec<Box<dyn ActionPrompter>>) -> Self {
        self.prompters = prompters;
        self
    }

    /// Set the game state for the simulation created by this builder.
    pub fn game_state(mut self, game_state: GameState) -> Self {
        self.game_state = Some(game_state);
        self
    }

    /// Set the historians for the simulation created by this builder.
    pub fn historians(mut self, historians: Vec<Box<dyn Historian>>) -> Self {
        self.historians = historians;
        self
    }

    pub fn illegal_action_policy(mut self, policy: IllegalActionPolicy) -> Self {
        self.illegal_action_policy = Some(policy);
        self
    }

    pub fn illegal_action_penalty(mut self, penalty: i64) -> Self {
        self.illegal_action_penalty = Some(penalty);
        self
    }

    /// Panic instead of dropping a historian that fails.
    pub fn panic_on_historian_error(mut self, panic_on_historian_error: bool) -> Self {
        self.panic_on_historian_error = panic_on_historian_error;
        self
    }

    /// Given the fields already specified build any that are not specified
    /// and create a new `WildPerudoSimulation`.
    ///
    /// Everything is validated here, before any dice are rolled.
    pub fn build(self) -> Result<WildPerudoSimulation, ConfigurationError> {
        let config = match &self.config {
            Some(config) => {
                config.validate()?;
                Some(config)
            }
            None => None,
        };

        let game_state = match (self.game_state, config) {
            (Some(game_state), Some(config)) => {
                if game_state.num_players != config.agents.len()
                    || game_state.hand_size != config.hand_size
                    || game_state.max_rounds != config.max_rounds
                {
                    return Err(ConfigurationError::GameStateMismatch);
                }
                game_state
            }
            (Some(game_state), None) => game_state,
            (None, Some(config)) => GameState::from_config(config),
            (None, None) => return Err(ConfigurationError::NeedGameState),
        };

        if game_state.num_players < 2 {
            return Err(ConfigurationError::TooFewPlayers(game_state.num_players));
        }
        if game_state.max_rounds == 0 {
            return Err(ConfigurationError::NonPositiveMaxRounds);
        }
        if game_state.hand_size == 0 {
            return Err(ConfigurationError::NonPositiveHandSize);
        }
        if game_state.pools.len() != game_state.num_players
            || game_state.pools.iter().any(|p| p.len() != game_state.hand_size)
        {
            return Err(ConfigurationError::GameStateMismatch);
        }

        let agents = match (self.agents, config) {
            (Some(agents), _) => agents,
            (None, Some(config)) => build_config_agents(config, self.prompters)?,
            (None, None) => build_agents(game_state.num_players),
        };
        if agents.len() != game_state.num_players {
            return Err(ConfigurationError::AgentCountMismatch {
                expected: game_state.num_players,
                found: agents.len(),
            });
        }

        let illegal_action_policy = self
            .illegal_action_policy
            .or(config.map(|c| c.illegal_action_policy))
            .unwrap_or_default();
        let illegal_action_penalty = self
            .illegal_action_penalty
            .or(config.map(|c| c.illegal_action_penalty))
            .unwrap_or(1);
        if illegal_action_penalty < 0 {
            return Err(ConfigurationError::NegativeScoring);
        }

        // Create a new simulation id.
        // This will be used to track
        // this exact run of a simulation.
        let id = uuid::Uuid::now_v7();

        Ok(WildPerudoSimulation {
            agents,
            game_state,
            id,
            historians: self.historians,
            panic_on_historian_error: self.panic_on_historian_error,
            illegal_action_policy,
            illegal_action_penalty,
        })
    }
}

fn build_config_agents(
    config: &SessionConfig,
    prompters: Vec<Box<dyn ActionPrompter>>,
) -> Result<Vec<Box<dyn Agent>>, ConfigurationError> {
    let human_seats = config.human_seats();
    if prompters.len() > human_seats.len() {
        return Err(ConfigurationError::InvalidConfiguration(format!(
            "{} prompters given for {} human seats",
            prompters.len(),
            human_seats.len()
        )));
    }

    let mut prompters = prompters.into_iter();
    config
        .agents
        .iter()
        .enumerate()
        .map(|(seat_idx, kind)| {
            let prompter = if human_seats.contains(&seat_idx) {
                prompters.next()
            } else {
                None
            };
            kind.build(seat_idx, config, prompter)
        })
        .collect()
}
