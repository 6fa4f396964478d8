use rand::Rng;

use crate::{
    arena::{action::AgentAction, game_state::PlayerView},
    core::{Bid, DicePool, Face, SupportDistribution},
};

/// How many dice outside an agent's own pool are expected to support a bid
/// on each face.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportEstimate {
    by_face: Vec<SupportDistribution>,
}

impl SupportEstimate {
    /// Every unseen die is an independent roll.
    pub fn binomial(unseen: usize) -> Self {
        Self::from_fn(|face| SupportDistribution::binomial(unseen, face.support_probability()))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(Face) -> SupportDistribution,
    {
        Self {
            by_face: Face::all().map(f).collect(),
        }
    }

    pub fn for_face(&self, face: Face) -> &SupportDistribution {
        &self.by_face[face.index()]
    }

    /// The chance that `bid` holds once `own_pool` is added to the unseen
    /// dice.
    ///
    /// Malformed bids never hold.
    pub fn hold_probability(&self, bid: &Bid, own_pool: &DicePool) -> f64 {
        let Ok(face) = bid.validate() else {
            return 0.0;
        };
        let own = own_pool.support(face);
        let needed = (bid.quantity as usize).saturating_sub(own);
        self.for_face(face).tail(needed)
    }
}

/// The bid or challenge rule shared by every automatic agent.
///
/// An agent challenges when the current bid holds with less than
/// `confidence_threshold` probability, and always when it can't hold at
/// all. Otherwise it looks one bid ahead: for every face it takes the
/// smallest legal raise and plays the one most likely to hold. With no
/// representable raise left it challenges. The opening bid goes on the face with the most own
/// support, as high as it stays above the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionRule {
    pub confidence_threshold: f64,
}

impl Default for DecisionRule {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
        }
    }
}

impl DecisionRule {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
        }
    }

    pub fn decide<R: Rng + ?Sized>(
        &self,
        view: &PlayerView,
        estimate: &SupportEstimate,
        rng: &mut R,
    ) -> AgentAction {
        match view.current_bid() {
            None => AgentAction::Bid(self.opening_bid(view, estimate, rng)),
            Some(current) => {
                let p_current = estimate.hold_probability(current, view.own_pool());
                if p_current <= 0.0 || p_current < self.confidence_threshold {
                    return AgentAction::Challenge;
                }
                match self.best_raise(view, estimate, current, rng) {
                    Some(bid) => AgentAction::Bid(bid),
                    None => AgentAction::Challenge,
                }
            }
        }
    }

    fn best_raise<R: Rng + ?Sized>(
        &self,
        view: &PlayerView,
        estimate: &SupportEstimate,
        current: &Bid,
        rng: &mut R,
    ) -> Option<Bid> {
        let scored: Vec<(Bid, f64)> = Face::all()
            .filter_map(|face| Bid::min_raise(face, Some(current), view.wild_exchange()))
            .map(|bid| (bid, estimate.hold_probability(&bid, view.own_pool())))
            .collect();
        if scored.is_empty() {
            return None;
        }
        let best = scored
            .iter()
            .map(|(_, p)| *p)
            .fold(f64::NEG_INFINITY, f64::max);

        let ties: Vec<Bid> = scored
            .into_iter()
            .filter(|(_, p)| (best - p).abs() < 1e-12)
            .map(|(bid, _)| bid)
            .collect();
        Some(ties[rng.random_range(0..ties.len())])
    }

    fn opening_bid<R: Rng + ?Sized>(
        &self,
        view: &PlayerView,
        estimate: &SupportEstimate,
        rng: &mut R,
    ) -> Bid {
        let own = view.own_pool().support_by_face();
        let most = own.iter().copied().max().unwrap_or(0);
        let faces: Vec<Face> = Face::all().filter(|f| own[f.index()] == most).collect();
        let face = faces[rng.random_range(0..faces.len())];

        let mut bid = Bid::new(1, face.value());
        for quantity in 2..=view.total_dice() as u32 {
            let candidate = Bid::new(quantity, face.value());
            if estimate.hold_probability(&candidate, view.own_pool()) < self.confidence_threshold {
                break;
            }
            bid = candidate;
        }
        bid
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{arena::ledger::BidLedger, core::WildExchange};

    use super::*;

    fn view<'a>(pool: &'a DicePool, ledger: &'a BidLedger, scores: &'a [i64]) -> PlayerView<'a> {
        PlayerView::new(0, pool, vec![5, 5], ledger, scores, 0, 10)
    }

    #[test]
    fn test_hold_probability_counts_own_dice() {
        let pool = DicePool::from_values(&[1, 4, 4, 2, 6]).unwrap();
        let estimate = SupportEstimate::binomial(5);
        // Three of the five needed are in hand.
        assert_relative_eq!(
            SupportDistribution::binomial(5, 1.0 / 3.0).tail(2),
            estimate.hold_probability(&Bid::new(5, 4), &pool),
            epsilon = 1e-12
        );
        // Already guaranteed.
        assert_relative_eq!(1.0, estimate.hold_probability(&Bid::new(3, 4), &pool));
        // Malformed.
        assert_relative_eq!(0.0, estimate.hold_probability(&Bid::new(0, 4), &pool));
    }

    #[test]
    fn test_challenges_unlikely_bid() {
        let pool = DicePool::from_values(&[2, 3, 5, 6, 2]).unwrap();
        let mut ledger = BidLedger::new(WildExchange::default());
        ledger.validate_and_append(1, Bid::new(7, 4)).unwrap();
        let scores = [0, 0];
        let view = view(&pool, &ledger, &scores);
        let mut rng = StdRng::seed_from_u64(1);

        let action = DecisionRule::default().decide(&view, &SupportEstimate::binomial(5), &mut rng);
        assert_eq!(AgentAction::Challenge, action);
    }

    #[test]
    fn test_raises_likely_bid() {
        let pool = DicePool::from_values(&[1, 4, 4, 4, 6]).unwrap();
        let mut ledger = BidLedger::new(WildExchange::default());
        ledger.validate_and_append(1, Bid::new(2, 4)).unwrap();
        let scores = [0, 0];
        let view = view(&pool, &ledger, &scores);
        let mut rng = StdRng::seed_from_u64(1);

        let estimate = SupportEstimate::binomial(5);
        let action = DecisionRule::default().decide(&view, &estimate, &mut rng);
        match action {
            AgentAction::Bid(bid) => {
                assert!(bid.outranks(&Bid::new(2, 4), WildExchange::default()));
                // Three fours, one wild and two sixes counting the wild are
                // in hand, so some raise is already certain.
                assert_relative_eq!(1.0, estimate.hold_probability(&bid, &pool));
            }
            AgentAction::Challenge => panic!("Should not challenge a bid it holds"),
        }
    }

    #[test]
    fn test_opening_uses_best_face() {
        let pool = DicePool::from_values(&[5, 5, 5, 1, 2]).unwrap();
        let ledger = BidLedger::new(WildExchange::default());
        let scores = [0, 0];
        let view = view(&pool, &ledger, &scores);
        let mut rng = StdRng::seed_from_u64(7);
        let estimate = SupportEstimate::binomial(view.unseen_dice());

        let AgentAction::Bid(bid) = DecisionRule::default().decide(&view, &estimate, &mut rng)
        else {
            panic!("Nothing to challenge when opening");
        };
        assert_eq!(5, bid.face);
        assert!(bid.quantity >= 4);
        assert!(estimate.hold_probability(&bid, &pool) >= 0.5);
        let higher = Bid::new(bid.quantity + 1, 5);
        assert!(estimate.hold_probability(&higher, &pool) < 0.5);
    }

    #[test]
    fn test_tie_break_is_seeded() {
        let pool = DicePool::from_values(&[2, 3, 4, 5, 6]).unwrap();
        let ledger = BidLedger::new(WildExchange::default());
        let scores = [0, 0];
        let view = view(&pool, &ledger, &scores);
        let estimate = SupportEstimate::binomial(5);
        let rule = DecisionRule::default();

        let first = rule.decide(&view, &estimate, &mut StdRng::seed_from_u64(99));
        let second = rule.decide(&view, &estimate, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_threshold_still_challenges_impossible_bid() {
        let pool = DicePool::from_values(&[2, 3, 4, 5, 6]).unwrap();
        let mut ledger = BidLedger::new(WildExchange::default());
        ledger.validate_and_append(1, Bid::new(100, 4)).unwrap();
        let scores = [0, 0];
        let view = view(&pool, &ledger, &scores);
        let mut rng = StdRng::seed_from_u64(3);

        let action =
            DecisionRule::new(0.0).decide(&view, &SupportEstimate::binomial(5), &mut rng);
        assert_eq!(AgentAction::Challenge, action);
    }

    #[test]
    fn test_huge_bids_are_challenged() {
        let pool = DicePool::from_values(&[1, 1, 4, 4, 6]).unwrap();
        let scores = [0, 0];
        let estimate = SupportEstimate::binomial(5);
        for current in [Bid::new(u32::MAX, 6), Bid::new(u32::MAX, 1), Bid::new(1 << 31, 1)] {
            for exchange in [WildExchange::DoublePlusOne, WildExchange::Double] {
                let mut ledger = BidLedger::new(exchange);
                ledger.validate_and_append(1, current).unwrap();
                let view = view(&pool, &ledger, &scores);
                let mut rng = StdRng::seed_from_u64(5);
                assert_eq!(
                    AgentAction::Challenge,
                    DecisionRule::new(0.0).decide(&view, &estimate, &mut rng)
                );
            }
        }
    }
}
