use std::{collections::VecDeque, fmt::Debug};

use rand::Rng;
use tracing::{Level, event};

use crate::arena::{WildPerudoSimulation, simulation::SessionSummary};

/// A struct to help seeing which agent is likely to do well.
///
/// Each competition is a series of sessions from the simulation iterator
/// passed in. Results are tabulated per seat across every call to `run`.
pub struct SessionCompetition<T: Iterator<Item = WildPerudoSimulation>> {
    sim_gen: T,
    /// The number of sessions that have been run.
    pub num_sessions: usize,

    /// Final score summed over every session
    pub total_score: Vec<i64>,
    pub max_score: Vec<i64>,
    pub min_score: Vec<i64>,

    /// Sessions where the seat had the top score alone
    pub win_count: Vec<usize>,
    /// Sessions where the seat shared the top score
    pub tie_count: Vec<usize>,
    pub loss_count: Vec<usize>,

    /// Maximum number of summaries to keep in a long call to `run`
    max_sim_history: usize,
}

impl<T: Iterator<Item = WildPerudoSimulation>> SessionCompetition<T> {
    pub fn new(sim_gen: T) -> SessionCompetition<T> {
        SessionCompetition {
            sim_gen,
            max_sim_history: 100,
            num_sessions: 0,
            total_score: vec![],
            max_score: vec![],
            min_score: vec![],
            win_count: vec![],
            tie_count: vec![],
            loss_count: vec![],
        }
    }

    /// Run up to `num_sessions` sessions. This stops early if the
    /// simulation iterator runs dry. Returns the summaries of the most
    /// recent sessions.
    pub fn run<R: Rng>(&mut self, num_sessions: usize, rng: &mut R) -> Vec<SessionSummary> {
        let mut summaries = VecDeque::with_capacity(self.max_sim_history.min(num_sessions));

        for _ in 0..num_sessions {
            let Some(mut running_sim) = self.sim_gen.next() else {
                event!(Level::WARN, num_sessions = self.num_sessions, "simulations_exhausted");
                break;
            };
            let summary = running_sim.run(rng);
            self.update_metrics(&summary);
            self.num_sessions += 1;

            if summaries.len() >= self.max_sim_history {
                summaries.pop_front();
            }
            summaries.push_back(summary);
        }

        event!(
            Level::INFO,
            num_sessions = self.num_sessions,
            total_score = ?self.total_score,
            win_count = ?self.win_count,
            "competition_progress"
        );
        summaries.into_iter().collect()
    }

    /// Mean final score for each seat.
    pub fn mean_score(&self) -> Vec<f64> {
        if self.num_sessions == 0 {
            return vec![0.0; self.total_score.len()];
        }
        self.total_score
            .iter()
            .map(|total| *total as f64 / self.num_sessions as f64)
            .collect()
    }

    fn ensure_seats(&mut self, num_players: usize) {
        if self.total_score.len() >= num_players {
            return;
        }
        self.total_score.resize(num_players, 0);
        self.max_score.resize(num_players, i64::MIN);
        self.min_score.resize(num_players, i64::MAX);
        self.win_count.resize(num_players, 0);
        self.tie_count.resize(num_players, 0);
        self.loss_count.resize(num_players, 0);
    }

    fn update_metrics(&mut self, summary: &SessionSummary) {
        self.ensure_seats(summary.scores.len());
        let sole_winner = summary.winners.len() == 1;

        for (idx, score) in summary.scores.iter().enumerate() {
            self.total_score[idx] += score;
            self.min_score[idx] = self.min_score[idx].min(*score);
            self.max_score[idx] = self.max_score[idx].max(*score);

            if !summary.winners.contains(&idx) {
                self.loss_count[idx] += 1;
            } else if sole_winner {
                self.win_count[idx] += 1;
            } else {
                self.tie_count[idx] += 1;
            }
        }
    }
}

impl<T: Iterator<Item = WildPerudoSimulation>> Debug for SessionCompetition<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCompetition")
            .field("num_sessions", &self.num_sessions)
            .field("total_score", &self.total_score)
            .field("max_score", &self.max_score)
            .field("min_score", &self.min_score)
            .field("win_count", &self.win_count)
            .field("tie_count", &self.tie_count)
            .field("loss_count", &self.loss_count)
            .finish()
    }
}
