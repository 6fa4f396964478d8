use std::fmt;

use rand::Rng;
use tracing::{Level, debug_span, event, trace_span};

use super::{
    action::{
        Action, AgentAction, GameStartPayload, IllegalActionPayload, PlayedActionPayload,
        ResolutionPayload,
    },
    agent::Agent,
    config::IllegalActionPolicy,
    errors::IllegalActionError,
    game_state::{GameState, Phase},
    historian::Historian,
    resolution::resolve,
};

/// The final result of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSummary {
    pub id: uuid::Uuid,
    /// Final scores by seat.
    pub scores: Vec<i64>,
    pub rounds_played: usize,
    /// Every seat tied for the top score.
    pub winners: Vec<usize>,
}

/// Drives a single session of Wild Perudo from the first roll to the last
/// round.
///
/// Each call to `step` moves the game through one `Phase`:
///
/// - `Rolling` clears the ledger and rerolls every pool.
/// - `Bidding` asks the next agent to act. Legal bids go on the ledger,
///   a legal challenge moves on to `Challenged`. Illegal actions are
///   handled by the `IllegalActionPolicy`.
/// - `Challenged` and `Resolving` count the dice.
/// - `Scoring` updates the scoreboard, either from the resolution or by
///   penalizing a player who forfeited.
/// - `RoundEnd` moves the opening seat along and either rolls again or
///   finishes the session.
///
/// Use `SessionBuilder` to create one.
pub struct WildPerudoSimulation {
    pub(crate) agents: Vec<Box<dyn Agent>>,
    pub game_state: GameState,
    /// Tracks this exact run of a simulation.
    pub id: uuid::Uuid,
    pub(crate) historians: Vec<Box<dyn Historian>>,
    pub(crate) panic_on_historian_error: bool,
    pub(crate) illegal_action_policy: IllegalActionPolicy,
    pub(crate) illegal_action_penalty: i64,
}

impl WildPerudoSimulation {
    pub fn more_rounds(&self) -> bool {
        !self.game_state.is_complete()
    }

    /// Run the simulation all the way to completion. This will mutate the
    /// current state.
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> SessionSummary {
        let span = debug_span!("run", id = %self.id);
        let _enter = span.enter();

        while self.more_rounds() {
            self.run_round(rng);
        }

        let summary = self.summary();
        event!(
            Level::INFO,
            scores = ?summary.scores,
            winners = ?summary.winners,
            "session_complete"
        );
        summary
    }

    /// Play until the current round is over.
    pub fn run_round<R: Rng>(&mut self, rng: &mut R) {
        let span = trace_span!("run_round", round_idx = self.game_state.round_idx);
        let _enter = span.enter();

        let round_idx = self.game_state.round_idx;
        while self.more_rounds() && self.game_state.round_idx == round_idx {
            self.step(rng);
        }
    }

    /// Move the game along by a single phase.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        match self.game_state.phase {
            Phase::Rolling => self.roll(rng),
            Phase::Bidding => self.run_single_agent(),
            Phase::Challenged => self.advance_phase(Phase::Resolving),
            Phase::Resolving => self.resolve(),
            Phase::Scoring => self.score(),
            Phase::RoundEnd => self.end_round(),
            // There's nothing left to do to this.
            Phase::Complete => (),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            scores: self.game_state.scores().to_vec(),
            rounds_played: self.game_state.round_idx,
            winners: self.game_state.scoreboard.leaders(),
        }
    }

    fn roll<R: Rng>(&mut self, rng: &mut R) {
        let span = trace_span!("roll");
        let _enter = span.enter();

        if self.game_state.round_idx == 0 {
            self.record_action(Action::GameStart(GameStartPayload {
                num_players: self.game_state.num_players,
                hand_size: self.game_state.hand_size,
                max_rounds: self.game_state.max_rounds,
            }));
        }

        self.game_state.start_round();
        self.record_action(Action::RoundStart(self.game_state.round_idx));

        for pool in self.game_state.pools.iter_mut() {
            pool.roll(rng);
        }
        debug_assert!(
            self.game_state
                .pools
                .iter()
                .all(|p| p.len() == self.game_state.hand_size),
            "Rolling never changes the number of dice"
        );
        self.record_action(Action::Rolled);
        self.advance_phase(Phase::Bidding);
    }

    fn run_single_agent(&mut self) {
        let idx = self.game_state.to_act_idx;
        let span = trace_span!("run_agent", idx);
        let _enter = span.enter();

        let max_retries = self.illegal_action_policy.max_retries();
        let mut retries = 0;
        loop {
            let view = self.game_state.view(idx);
            let action = self.agents[idx].act(&self.id, &view);

            match self.apply_action(idx, action) {
                Ok(()) => {
                    self.record_action(Action::PlayedAction(PlayedActionPayload {
                        idx,
                        action,
                        retries,
                    }));
                    if action == AgentAction::Challenge {
                        self.advance_phase(Phase::Challenged);
                    }
                    return;
                }
                Err(reason) => {
                    let will_retry = retries < max_retries;
                    event!(Level::DEBUG, idx, ?action, %reason, will_retry, "illegal_action");
                    self.record_action(Action::IllegalAction(IllegalActionPayload {
                        idx,
                        action,
                        reason,
                        will_retry,
                    }));
                    self.agents[idx].illegal_action(&action, &reason);

                    if !will_retry {
                        self.forfeit(idx);
                        return;
                    }
                    retries += 1;
                }
            }
        }
    }

    /// Check and apply a single action. Nothing changes if it's illegal.
    fn apply_action(&mut self, idx: usize, action: AgentAction) -> Result<(), IllegalActionError> {
        match action {
            AgentAction::Bid(bid) => {
                self.game_state.ledger.validate_and_append(idx, bid)?;
                self.game_state.advance_to_act();
                Ok(())
            }
            AgentAction::Challenge => {
                if self.game_state.ledger.is_empty() {
                    return Err(IllegalActionError::IllegalChallenge);
                }
                self.game_state.challenger_idx = Some(idx);
                Ok(())
            }
        }
    }

    fn forfeit(&mut self, idx: usize) {
        event!(Level::INFO, idx, "forfeit");
        self.game_state.forfeit_idx = Some(idx);
        self.record_action(Action::Forfeit(idx));
        self.advance_phase(Phase::Scoring);
    }

    fn resolve(&mut self) {
        let span = trace_span!("resolve");
        let _enter = span.enter();

        let (Some(entry), Some(challenger_idx)) = (
            self.game_state.ledger.last().copied(),
            self.game_state.challenger_idx,
        ) else {
            debug_assert!(false, "Resolving without a bid and a challenger");
            self.advance_phase(Phase::RoundEnd);
            return;
        };

        let resolution = resolve(&entry.bid, &self.game_state.pools);
        event!(
            Level::INFO,
            bid = %entry.bid,
            bidder_idx = entry.player_idx,
            challenger_idx,
            support_count = resolution.support_count,
            success = resolution.success,
            "challenge_resolved"
        );
        self.game_state.resolution = Some(resolution);
        self.record_action(Action::Resolved(ResolutionPayload {
            bidder_idx: entry.player_idx,
            challenger_idx,
            resolution,
        }));
        self.advance_phase(Phase::Scoring);
    }

    fn score(&mut self) {
        let delta = if let Some(offender) = self.game_state.forfeit_idx {
            self.game_state
                .scoreboard
                .apply_penalty(offender, self.illegal_action_penalty)
        } else {
            match (
                self.game_state.ledger.last().copied(),
                self.game_state.challenger_idx,
                self.game_state.resolution,
            ) {
                (Some(entry), Some(challenger_idx), Some(resolution)) => {
                    let bidder_idx = entry.player_idx;
                    self.game_state
                        .scoreboard
                        .apply_outcome(bidder_idx, challenger_idx, &resolution)
                }
                _ => {
                    debug_assert!(false, "Scoring a round that was never resolved");
                    self.advance_phase(Phase::RoundEnd);
                    return;
                }
            }
        };

        event!(Level::DEBUG, ?delta, scores = ?self.game_state.scores(), "scored");
        self.game_state.last_delta = Some(delta);
        self.record_action(Action::Scored(delta));
        self.advance_phase(Phase::RoundEnd);
    }

    fn end_round(&mut self) {
        self.game_state.round_idx += 1;
        self.game_state.opening_idx = self.game_state.next_idx(self.game_state.opening_idx);

        if self.game_state.round_idx >= self.game_state.max_rounds {
            self.advance_phase(Phase::Complete);
        } else {
            self.advance_phase(Phase::Rolling);
        }
    }

    fn advance_phase(&mut self, phase: Phase) {
        self.game_state.phase = phase;
        self.record_action(Action::PhaseAdvance(phase));
    }

    fn record_action(&mut self, action: Action) {
        event!(Level::TRACE, ?action, "record_action");

        let id = self.id;
        let game_state = &self.game_state;
        let panic_on_historian_error = self.panic_on_historian_error;
        self.historians.retain_mut(|historian| {
            match historian.record_action(&id, game_state, action.clone()) {
                Ok(()) => true,
                Err(error) => {
                    if panic_on_historian_error {
                        panic!("Historian failed to record action: {error}");
                    }
                    event!(Level::WARN, %error, "historian_dropped");
                    false
                }
            }
        });
    }
}

impl fmt::Debug for WildPerudoSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WildPerudoSimulation")
            .field("id", &self.id)
            .field("game_state", &self.game_state)
            .field("illegal_action_policy", &self.illegal_action_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{
        arena::{
            SessionBuilder,
            agent::{TheoryOfMindAgent, VecReplayAgent, ZeroOrderAgent},
            historian::VecHistorian,
            scoring::ScoringRule,
            test_util::assert_valid_game_state,
        },
        core::{DicePool, WildExchange},
    };

    use super::*;

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
    fn test_zero_order_session() {
        let agents: Vec<Box<dyn Agent>> = (0..3)
            .map(|seat| Box::new(ZeroOrderAgent::new(0.5, seat)) as Box<dyn Agent>)
            .collect();
        let mut rng = StdRng::seed_from_u64(420);

        let mut sim = SessionBuilder::default()
            .game_state(game_state(3, 10))
            .agents(agents)
            .build()
            .unwrap();
        let summary = sim.run(&mut rng);

        assert_eq!(10, summary.rounds_played);
        // One point per round with the default scoring and no forfeits.
        assert_eq!(10, summary.scores.iter().sum::<i64>());
        assert!(!summary.winners.is_empty());
        assert_valid_game_state(&sim.game_state);
    }

    #[test_log::test]
    fn test_mixed_session_is_reproducible() {
        let run = || {
            let agents: Vec<Box<dyn Agent>> = vec![
                Box::new(ZeroOrderAgent::new(0.5, 1)),
                Box::new(TheoryOfMindAgent::new(1, 0.5, 2)),
                Box::new(TheoryOfMindAgent::new(2, 0.5, 3)),
            ];
            let mut rng = StdRng::seed_from_u64(99);
            let mut sim = SessionBuilder::default()
                .game_state(game_state(3, 4))
                .agents(agents)
                .build()
                .unwrap();
            sim.run(&mut rng).scores
        };
        assert_eq!(run(), run());
    }

    #[test_log::test]
    fn test_opening_seat_rotates() {
        let records = VecHistorian::new_storage();
        let agents: Vec<Box<dyn Agent>> = (0..3)
            .map(|seat| Box::new(ZeroOrderAgent::new(0.5, seat)) as Box<dyn Agent>)
            .collect();
        let mut rng = StdRng::seed_from_u64(5);
        let mut sim = SessionBuilder::default()
            .game_state(game_state(3, 4))
            .agents(agents)
            .historians(vec![Box::new(VecHistorian::new(records.clone()))])
            .build()
            .unwrap();
        sim.run(&mut rng);

        // The first action of a round is played against an empty ledger.
        let openers: Vec<usize> = records
            .borrow()
            .iter()
            .filter_map(|r| match (&r.action, &r.before_game_state) {
                (Action::PlayedAction(p), Some(before)) if before.ledger.is_empty() => Some(p.idx),
                _ => None,
            })
            .collect();
        assert_eq!(vec![0, 1, 2, 0], openers);
    }

    #[test_log::test]
    fn test_known_dice_challenge() {
        let mut state = game_state(2, 1);
        state.phase = Phase::Bidding;
        state.pools = vec![
            DicePool::from_values(&[1, 1, 3, 4, 6]).unwrap(),
            DicePool::from_values(&[2, 3, 3, 5, 6]).unwrap(),
        ];
        state.round_idx = 0;

        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(VecReplayAgent::new(vec![AgentAction::bid(6, 3)])),
            Box::new(VecReplayAgent::new(vec![AgentAction::Challenge])),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        let mut sim = SessionBuilder::default()
            .game_state(state)
            .agents(agents)
            .build()
            .unwrap();

        // Skip rolling so the dice stay known.
        sim.step(&mut rng);
        sim.step(&mut rng);
        assert_eq!(Phase::Challenged, sim.game_state.phase);
        sim.step(&mut rng);
        sim.step(&mut rng);
        let resolution = sim.game_state.resolution.unwrap();
        assert_eq!(5, resolution.support_count);
        assert!(!resolution.success);

        sim.step(&mut rng);
        // The challenger was right.
        assert_eq!(&[0, 1], sim.game_state.scores());
        sim.step(&mut rng);
        assert!(sim.game_state.is_complete());
    }

    #[test_log::test]
    fn test_hand_size_is_constant() {
        let agents: Vec<Box<dyn Agent>> = (0..4)
            .map(|seat| Box::new(ZeroOrderAgent::new(0.3, seat)) as Box<dyn Agent>)
            .collect();
        let mut rng = StdRng::seed_from_u64(3);
        let mut sim = SessionBuilder::default()
            .game_state(GameState::new(
                4,
                3,
                6,
                WildExchange::Double,
                ScoringRule::MarginScaled {
                    base: 1,
                    per_die: 1,
                    penalty: 1,
                },
            ))
            .agents(agents)
            .build()
            .unwrap();

        while sim.more_rounds() {
            sim.run_round(&mut rng);
            assert_valid_game_state(&sim.game_state);
        }
        assert_eq!(6, sim.game_state.round_idx);
    }
}
