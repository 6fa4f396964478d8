use rand::{SeedableRng, rngs::StdRng};
use tracing::event;

use crate::arena::{
    action::AgentAction,
    belief::{BeliefModel, MAX_TOM_ORDER, Observations},
    game_state::{GameState, PlayerView},
};

use super::{Agent, AgentGenerator, DecisionRule, SupportEstimate};

/// An agent that reasons about what the other players' bids reveal.
///
/// An order `k` agent models each opponent as an order `k - 1` agent, works
/// out which hands would have made that opponent's bids look safe, and
/// weights its beliefs toward them. The resulting estimate of the unseen
/// dice goes through the same `DecisionRule` as the `ZeroOrderAgent`, so an
/// order `0` agent plays exactly like one.
#[derive(Debug, Clone)]
pub struct TheoryOfMindAgent {
    order: usize,
    rule: DecisionRule,
    model: BeliefModel,
    rng: StdRng,
}

impl TheoryOfMindAgent {
    /// Orders above `MAX_TOM_ORDER` are clamped.
    pub fn new(order: usize, confidence_threshold: f64, seed: u64) -> Self {
        Self {
            order: order.min(MAX_TOM_ORDER),
            rule: DecisionRule::new(confidence_threshold),
            model: BeliefModel::new(confidence_threshold, 8.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_model(mut self, model: BeliefModel) -> Self {
        self.model = model;
        self
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// The estimate of the dice this agent can't see.
    pub fn support_estimate(&mut self, view: &PlayerView) -> SupportEstimate {
        let observations = Observations::from_view(view);
        self.model
            .estimate(&observations, self.order, view.player_idx())
            .support_estimate()
    }
}

impl Agent for TheoryOfMindAgent {
    fn act(&mut self, _id: &uuid::Uuid, view: &PlayerView) -> AgentAction {
        let estimate = self.support_estimate(view);
        let action = self.rule.decide(view, &estimate, &mut self.rng);
        event!(
            tracing::Level::DEBUG,
            player_idx = view.player_idx(),
            order = self.order,
            ?action,
            "theory of mind decision"
        );
        action
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TheoryOfMindAgentGenerator {
    order: usize,
    confidence_threshold: f64,
    seed: Option<u64>,
}

impl TheoryOfMindAgentGenerator {
    pub fn new(order: usize, confidence_threshold: f64, seed: Option<u64>) -> Self {
        Self {
            order,
            confidence_threshold,
            seed,
        }
    }
}

impl AgentGenerator for TheoryOfMindAgentGenerator {
    fn generate(&self, seat_idx: usize, _game_state: &GameState) -> Box<dyn Agent> {
        let seed = self
            .seed
            .map_or_else(rand::random, |s| s.wrapping_add(seat_idx as u64));
        Box::new(TheoryOfMindAgent::new(
            self.order,
            self.confidence_threshold,
            seed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{
        arena::{agent::ZeroOrderAgent, ledger::BidLedger},
        core::{Bid, DicePool, Face, WildExchange},
    };

    use super::*;

    #[test]
    fn test_order_zero_matches_zero_order() {
        let pool = DicePool::from_values(&[2, 2, 4, 6, 1]).unwrap();
        let mut ledger = BidLedger::new(WildExchange::default());
        ledger.validate_and_append(1, Bid::new(3, 4)).unwrap();
        ledger.validate_and_append(2, Bid::new(4, 2)).unwrap();
        let scores = [0, 0, 0];
        let view = PlayerView::new(0, &pool, vec![5, 5, 5], &ledger, &scores, 0, 10);

        let mut tom = TheoryOfMindAgent::new(0, 0.5, 11);
        let mut zero = ZeroOrderAgent::new(0.5, 11);
        let id = uuid::Uuid::now_v7();

        let estimate = tom.support_estimate(&view);
        let binomial = SupportEstimate::binomial(10);
        for face in Face::all() {
            for (a, b) in estimate
                .for_face(face)
                .pmf()
                .iter()
                .zip(binomial.for_face(face).pmf())
            {
                assert_relative_eq!(*a, *b, epsilon = 1e-12);
            }
        }
        assert_eq!(zero.act(&id, &view), tom.act(&id, &view));
    }

    #[test_log::test]
    fn test_believes_opponent_bid() {
        // Nothing in hand supports fives. The opponent opened high on fives.
        let pool = DicePool::from_values(&[2, 3, 3, 4, 6]).unwrap();
        let mut ledger = BidLedger::new(WildExchange::default());
        ledger.validate_and_append(1, Bid::new(3, 5)).unwrap();
        let scores = [0, 0];
        let view = PlayerView::new(0, &pool, vec![5, 5], &ledger, &scores, 0, 10);

        let bid = Bid::new(3, 5);
        let zero_p = SupportEstimate::binomial(5).hold_probability(&bid, &pool);
        let tom_p = TheoryOfMindAgent::new(1, 0.5, 1)
            .support_estimate(&view)
            .hold_probability(&bid, &pool);

        assert!(zero_p < 0.5);
        assert!(tom_p > zero_p);
    }

    #[test]
    fn test_order_is_clamped() {
        assert_eq!(MAX_TOM_ORDER, TheoryOfMindAgent::new(99, 0.5, 0).order());
    }
}
