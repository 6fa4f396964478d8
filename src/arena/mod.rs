//! This is the arena module for playing Wild Perudo via agents.
//!
//! # Single Session
//!
//! The tools allow explicit control over the
//! session all the way down to the rng.
//!
//! ## Single Session Example
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use wild_perudo::arena::SessionBuilder;
//! use wild_perudo::arena::agent::{TheoryOfMindAgent, ZeroOrderAgent};
//! use wild_perudo::arena::game_state::GameState;
//! use wild_perudo::arena::scoring::ScoringRule;
//! use wild_perudo::core::WildExchange;
//!
//! let agents: Vec<Box<dyn wild_perudo::arena::Agent>> = vec![
//!     Box::new(ZeroOrderAgent::new(0.5, 1)),
//!     Box::new(TheoryOfMindAgent::new(2, 0.5, 2)),
//! ];
//! let mut rng = StdRng::seed_from_u64(420);
//!
//! let game_state = GameState::new(2, 5, 10, WildExchange::DoublePlusOne, ScoringRule::default());
//! let mut sim = SessionBuilder::default()
//!     .game_state(game_state)
//!     .agents(agents)
//!     .build()
//!     .unwrap();
//!
//! let summary = sim.run(&mut rng);
//! assert_eq!(10, summary.rounds_played);
//! ```
//!
//! # Configured Sessions
//!
//! A `SessionConfig` names the kind of agent in every seat. Human seats are
//! driven by an `ActionPrompter`.
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use wild_perudo::arena::config::SessionConfig;
//! use wild_perudo::arena::run_session;
//!
//! let config = SessionConfig::from_json(
//!     r#"{"agents": ["zero_order", "tom_1", "tom_2"], "max_rounds": 4}"#,
//! )
//! .unwrap();
//! let summary = run_session(config, vec![], vec![], &mut StdRng::seed_from_u64(7)).unwrap();
//! assert_eq!(3, summary.scores.len());
//! ```
//!
//! # Competition Example
//!
//! It's also possible to run a competition where the
//! same agents compete in many sessions
//! with tabulated results
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use wild_perudo::arena::AgentGenerator;
//! use wild_perudo::arena::agent::{TheoryOfMindAgentGenerator, ZeroOrderAgentGenerator};
//! use wild_perudo::arena::competition::{
//!     RandomGameStateGenerator, SessionCompetition, StandardSimulationIterator,
//! };
//! use wild_perudo::arena::game_state::GameState;
//! use wild_perudo::arena::scoring::ScoringRule;
//! use wild_perudo::core::WildExchange;
//!
//! let agent_gens: Vec<Box<dyn AgentGenerator>> = vec![
//!     Box::new(ZeroOrderAgentGenerator::new(0.5, Some(1))),
//!     Box::new(TheoryOfMindAgentGenerator::new(1, 0.5, Some(2))),
//!     Box::new(TheoryOfMindAgentGenerator::new(2, 0.5, Some(3))),
//! ];
//!
//! let game_state = GameState::new(3, 5, 5, WildExchange::DoublePlusOne, ScoringRule::default());
//! let game_state_gen = RandomGameStateGenerator::new(game_state, 42);
//! let sim_gen = StandardSimulationIterator::new(agent_gens, vec![], game_state_gen);
//!
//! let mut competition = SessionCompetition::new(sim_gen);
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let _first_results = competition.run(5, &mut rng);
//! let recent_results = competition.run(5, &mut rng);
//!
//! // The competition tabulates the results across multiple runs.
//! assert_eq!(10, competition.num_sessions);
//! println!("{:?}", recent_results);
//! ```
pub mod action;
pub mod agent;
pub mod belief;
pub mod competition;
pub mod config;
pub mod errors;
pub mod game_state;
pub mod historian;
pub mod ledger;
pub mod resolution;
pub mod scoring;
pub mod session;
pub mod sim_builder;
pub mod simulation;

#[cfg(any(test, feature = "arena-test-util"))]
pub mod test_util;

pub use agent::{Agent, AgentGenerator, CloneAgentGenerator};
pub use game_state::GameState;
pub use historian::{CloneHistorianGenerator, Historian, HistorianError, HistorianGenerator};
pub use session::{run_seeded_session, run_session};
pub use sim_builder::SessionBuilder;
pub use simulation::{SessionSummary, WildPerudoSimulation};
