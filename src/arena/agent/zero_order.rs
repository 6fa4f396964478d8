use rand::{SeedableRng, rngs::StdRng};
use tracing::event;

use crate::arena::{
    action::AgentAction,
    game_state::{GameState, PlayerView},
};

use super::{Agent, AgentGenerator, DecisionRule, SupportEstimate};

/// An agent that knows its own dice and nothing else.
///
/// Every die it can't see is treated as an independent roll, so the number
/// of unseen dice supporting a bid on face `f` is `Binomial(unseen, p)` with
/// `p = 1/3` for a non wild face and `1/6` for the wild face. It never
/// reads anything into what the other players have bid.
#[derive(Debug, Clone)]
pub struct ZeroOrderAgent {
    rule: DecisionRule,
    rng: StdRng,
}

impl ZeroOrderAgent {
    pub fn new(confidence_threshold: f64, seed: u64) -> Self {
        Self {
            rule: DecisionRule::new(confidence_threshold),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.rule.confidence_threshold
    }

    /// The chance that the bid in front of this agent holds.
    pub fn current_bid_probability(&self, view: &PlayerView) -> Option<f64> {
        let estimate = SupportEstimate::binomial(view.unseen_dice());
        view.current_bid()
            .map(|bid| estimate.hold_probability(bid, view.own_pool()))
    }
}

impl Default for ZeroOrderAgent {
    fn default() -> Self {
        Self {
            rule: DecisionRule::default(),
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Agent for ZeroOrderAgent {
    fn act(&mut self, _id: &uuid::Uuid, view: &PlayerView) -> AgentAction {
        let estimate = SupportEstimate::binomial(view.unseen_dice());
        let action = self.rule.decide(view, &estimate, &mut self.rng);
        event!(
            tracing::Level::DEBUG,
            player_idx = view.player_idx(),
            ?action,
            "zero order decision"
        );
        action
    }
}

/// Builds a fresh `ZeroOrderAgent` for every session. Seats get different
/// seeds so that ties don't break the same way around the table.
#[derive(Debug, Clone, Copy)]
pub struct ZeroOrderAgentGenerator {
    confidence_threshold: f64,
    seed: Option<u64>,
}

impl ZeroOrderAgentGenerator {
    pub fn new(confidence_threshold: f64, seed: Option<u64>) -> Self {
        Self {
            confidence_threshold,
            seed,
        }
    }
}

impl Default for ZeroOrderAgentGenerator {
    fn default() -> Self {
        Self::new(DecisionRule::default().confidence_threshold, None)
    }
}

impl AgentGenerator for ZeroOrderAgentGenerator {
    fn generate(&self, seat_idx: usize, _game_state: &GameState) -> Box<dyn Agent> {
        let seed = self
            .seed
            .map_or_else(rand::random, |s| s.wrapping_add(seat_idx as u64));
        Box::new(ZeroOrderAgent::new(self.confidence_threshold, seed))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{
        arena::ledger::BidLedger,
        core::{Bid, DicePool, WildExchange, binomial_tail},
    };

    use super::*;

    #[test_log::test]
    fn test_eight_unseen_dice() {
        // No fours and no wild dice in hand, so all six must come from the
        // eight unseen dice.
        let pool = DicePool::from_values(&[2, 3, 5, 6]).unwrap();
        let mut ledger = BidLedger::new(WildExchange::default());
        ledger.validate_and_append(1, Bid::new(6, 4)).unwrap();
        let scores = [0, 0, 0];
        let view = PlayerView::new(0, &pool, vec![4, 4, 4], &ledger, &scores, 0, 10);
        assert_eq!(8, view.unseen_dice());

        let mut agent = ZeroOrderAgent::new(0.5, 42);
        let p = agent.current_bid_probability(&view).unwrap();
        assert_relative_eq!(129.0 / 6561.0, p, epsilon = 1e-12);
        assert_relative_eq!(binomial_tail(8, 6, 1.0 / 3.0), p, epsilon = 1e-12);

        assert_eq!(AgentAction::Challenge, agent.act(&uuid::Uuid::now_v7(), &view));
    }

    #[test_log::test]
    fn test_threshold_changes_decision() {
        let pool = DicePool::from_values(&[2, 3, 5, 6]).unwrap();
        let mut ledger = BidLedger::new(WildExchange::default());
        ledger.validate_and_append(1, Bid::new(6, 4)).unwrap();
        let scores = [0, 0, 0];
        let view = PlayerView::new(0, &pool, vec![4, 4, 4], &ledger, &scores, 0, 10);

        // A threshold below the tail means the bid is believed.
        let mut agent = ZeroOrderAgent::new(0.01, 42);
        assert!(matches!(
            agent.act(&uuid::Uuid::now_v7(), &view),
            AgentAction::Bid(_)
        ));
    }

    #[test]
    fn test_no_current_bid_probability_when_opening() {
        let pool = DicePool::from_values(&[2, 3, 5, 6]).unwrap();
        let ledger = BidLedger::default();
        let scores = [0, 0];
        let view = PlayerView::new(0, &pool, vec![4, 4], &ledger, &scores, 0, 10);
        assert_eq!(None, ZeroOrderAgent::default().current_bid_probability(&view));
    }

    #[test]
    fn test_generator_seeds_by_seat() {
        let game_state = GameState::new(2, 5, 1, WildExchange::default(), Default::default());
        let generator = ZeroOrderAgentGenerator::new(0.5, Some(3));
        let mut first = generator.generate(0, &game_state);
        let mut again = generator.generate(0, &game_state);

        let view = game_state.view(0);
        let id = uuid::Uuid::now_v7();
        assert_eq!(first.act(&id, &view), again.act(&id, &view));
    }
}
