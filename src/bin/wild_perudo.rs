use std::{
    cell::RefCell,
    io::{self, StdinLock},
    rc::Rc,
};

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{Level, event};
use tracing_subscriber::EnvFilter;
use wild_perudo::arena::{
    Historian,
    agent::{ActionPrompter, IoPrompter},
    config::{AgentKind, IllegalActionPolicy, SessionConfig},
    historian::StatsTrackingHistorian,
    run_session,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "wild-perudo")]
#[command(about = "Play Wild Perudo against statistical and theory of mind agents")]
struct Args {
    /// Agent for each seat: human, zero_order or tom_<k>
    #[arg(short, long = "agent", default_values_t = vec![AgentKind::Human, AgentKind::TheoryOfMind(1)])]
    agents: Vec<AgentKind>,

    /// Read the whole session config from a JSON file instead
    #[arg(short, long, conflicts_with = "agents")]
    config: Option<std::path::PathBuf>,

    /// Rounds per session
    #[arg(short, long, default_value_t = 10)]
    rounds: usize,

    /// Dice per player
    #[arg(long, default_value_t = 5)]
    hand_size: usize,

    /// How many sessions to play
    #[arg(short, long, default_value_t = 1)]
    sessions: usize,

    /// Seed for the dice and the agents
    #[arg(long)]
    seed: Option<u64>,

    /// Penalize illegal actions instead of asking again
    #[arg(long)]
    penalize: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn session_config(&self) -> Result<SessionConfig, Box<dyn std::error::Error>> {
        if let Some(path) = &self.config {
            let json = std::fs::read_to_string(path)?;
            return Ok(SessionConfig::from_json(&json)?);
        }
        let mut config = SessionConfig::new(self.agents.clone(), self.rounds);
        config.hand_size = self.hand_size;
        config.seed = self.seed;
        if self.penalize {
            config.illegal_action_policy = IllegalActionPolicy::Penalize;
        }
        Ok(config)
    }
}

/// Every human seat reads from the same locked stdin so no seat buffers
/// lines typed for another.
fn terminal_prompters(
    config: &SessionConfig,
    stdin: &Rc<RefCell<StdinLock<'static>>>,
) -> Vec<Box<dyn ActionPrompter>> {
    config
        .human_seats()
        .into_iter()
        .map(|_| -> Box<dyn ActionPrompter> {
            Box::new(IoPrompter::shared(stdin.clone(), io::stdout()))
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG wins over the flag.
    let default_filter = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = args.session_config()?;
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let num_players = config.agents.len();
    let stats = StatsTrackingHistorian::new_with_num_players(num_players);
    let storage = stats.get_storage();
    let mut totals = vec![0_i64; num_players];
    let stdin = Rc::new(RefCell::new(io::stdin().lock()));

    for session_idx in 0..args.sessions {
        let summary = run_session(
            config.clone(),
            terminal_prompters(&config, &stdin),
            vec![Box::new(stats.clone()) as Box<dyn Historian>],
            &mut rng,
        )?;
        event!(Level::DEBUG, session_idx, id = %summary.id, "session_finished");

        println!(
            "Session {}: scores {:?}, winners {:?}",
            session_idx + 1,
            summary.scores,
            summary.winners
        );
        for (total, score) in totals.iter_mut().zip(summary.scores.iter()) {
            *total += score;
        }
    }

    println!();
    println!("Totals after {} sessions", args.sessions);
    let storage = storage.borrow();
    for (idx, kind) in config.agents.iter().enumerate() {
        let player = storage.players.get(idx).copied().unwrap_or_default();
        println!(
            "  seat {idx} ({kind}): {} points, {} bids, {} challenges ({} won), {} forfeits",
            totals[idx],
            player.bid_count,
            player.challenge_count,
            player.challenge_won_count,
            player.forfeit_count,
        );
    }
    Ok(())
}
