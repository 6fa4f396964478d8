//! Wild Perudo is a library for playing and simulating a bidding and
//! bluffing dice game where ones are wild.
//!
//! Every player rolls a private hand of dice. Players take turns raising a
//! claim about how many dice on the whole table show a face, until someone
//! challenges and the dice are counted.
//!
//! # Core
//!
//! [`core`] has the dice, bids and the probability helpers. It knows
//! nothing about turns or players.
//!
//! ```
//! use wild_perudo::core::{Bid, DicePool, Face};
//!
//! let pool = DicePool::from_values(&[1, 3, 3, 5, 6]).unwrap();
//! let three = Face::new(3).unwrap();
//! // Two threes and one wild.
//! assert_eq!(3, pool.support(three));
//! assert!(Bid::new(2, 3).validate().is_ok());
//! ```
//!
//! # Arena
//!
//! [`arena`] runs whole sessions between agents: statistical agents,
//! recursive theory of mind agents and people at a prompt.
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use wild_perudo::arena::config::{AgentKind, SessionConfig};
//! use wild_perudo::arena::run_session;
//!
//! let config = SessionConfig::new(vec![AgentKind::ZeroOrder, AgentKind::TheoryOfMind(1)], 3);
//! let summary = run_session(config, vec![], vec![], &mut StdRng::seed_from_u64(1)).unwrap();
//! assert_eq!(3, summary.rounds_played);
//! ```

/// Dice, bids and probabilities. Everything in core is
/// agnostic to how the game is run.
pub mod core;

/// Sessions, agents, belief modeling and competitions.
pub mod arena;
