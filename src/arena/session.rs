//! One call entry points for playing a whole session from a
//! `SessionConfig`.
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{Level, event};

use super::{
    SessionBuilder, agent::ActionPrompter, config::SessionConfig, errors::ConfigurationError,
    historian::Historian, simulation::SessionSummary,
};

/// Build the agents described by `config`, play every round and return the
/// final scores.
///
/// `prompters` are handed to the human seats in seat order. Nothing is
/// rolled until the whole configuration has been validated.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use wild_perudo::arena::run_session;
/// use wild_perudo::arena::config::{AgentKind, SessionConfig};
///
/// let config = SessionConfig::new(
///     vec![AgentKind::ZeroOrder, AgentKind::TheoryOfMind(2), AgentKind::ZeroOrder],
///     5,
/// );
/// let summary = run_session(config, vec![], vec![], &mut StdRng::seed_from_u64(3)).unwrap();
/// assert_eq!(3, summary.scores.len());
/// assert_eq!(5, summary.rounds_played);
/// ```
pub fn run_session<R: Rng>(
    config: SessionConfig,
    prompters: Vec<Box<dyn ActionPrompter>>,
    historians: Vec<Box<dyn Historian>>,
    rng: &mut R,
) -> Result<SessionSummary, ConfigurationError> {
    let mut sim = SessionBuilder::default()
        .config(config)
        .prompters(prompters)
        .historians(historians)
        .build()?;
    event!(
        Level::DEBUG,
        id = %sim.id,
        num_players = sim.game_state.num_players,
        max_rounds = sim.game_state.max_rounds,
        "session_built"
    );
    Ok(sim.run(rng))
}

/// Like `run_session` but the dice come from the config's seed. Without a
/// seed the dice are random.
pub fn run_seeded_session(
    config: SessionConfig,
    prompters: Vec<Box<dyn ActionPrompter>>,
    historians: Vec<Box<dyn Historian>>,
) -> Result<SessionSummary, ConfigurationError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    run_session(config, prompters, historians, &mut rng)
}
