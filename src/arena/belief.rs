//! Recursive beliefs about what other players are holding.
//!
//! An order `0` belief ignores the bidding and treats every unseen die as an
//! independent roll. An order `k` belief starts from the same priors and
//! then reads every bid an opponent made as evidence: the opponent is
//! assumed to be an order `k - 1` player who bids when it thinks the bid
//! will hold. Hands where the bid looked safe to that opponent become more
//! likely, and hands where it would have been reckless become less likely.
//!
//! Opponents are modelled purely from public information, the ledger and
//! the pool sizes. Nothing here ever looks at a real dice pool.
//!
//! Support counts for different faces are updated independently. A bid on
//! fives says nothing about how many twos the bidder has.
use std::{collections::HashMap, rc::Rc};

use tracing::event;

use crate::core::{Face, SupportDistribution};

use super::{agent::SupportEstimate, game_state::PlayerView, ledger::LedgerEntry};

/// The deepest recursion a session will accept.
pub const MAX_TOM_ORDER: usize = 4;

/// What every player can see.
#[derive(Debug, Clone, Copy)]
pub struct Observations<'a> {
    pool_sizes: &'a [usize],
    entries: &'a [LedgerEntry],
}

impl<'a> Observations<'a> {
    pub fn new(pool_sizes: &'a [usize], entries: &'a [LedgerEntry]) -> Self {
        Self {
            pool_sizes,
            entries,
        }
    }

    pub fn from_view(view: &'a PlayerView<'_>) -> Self {
        Self::new(view.pool_sizes(), view.ledger().entries())
    }

    pub fn num_players(&self) -> usize {
        self.pool_sizes.len()
    }
}

/// One player's beliefs about how many dice every other player has that
/// support each face.
#[derive(Debug, Clone, PartialEq)]
pub struct Beliefs {
    perspective: usize,
    by_player: Vec<Option<SupportEstimate>>,
}

impl Beliefs {
    fn priors(observations: &Observations, perspective: usize) -> Self {
        let by_player = observations
            .pool_sizes
            .iter()
            .enumerate()
            .map(|(idx, size)| (idx != perspective).then(|| SupportEstimate::binomial(*size)))
            .collect();
        Self {
            perspective,
            by_player,
        }
    }

    pub fn perspective(&self) -> usize {
        self.perspective
    }

    /// The belief about `player_idx`. There's none about yourself.
    pub fn about(&self, player_idx: usize) -> Option<&SupportEstimate> {
        self.by_player.get(player_idx).and_then(Option::as_ref)
    }

    /// The belief about every other player's support for `face` added
    /// together.
    pub fn others_support(&self, face: Face) -> SupportDistribution {
        self.by_player
            .iter()
            .flatten()
            .fold(SupportDistribution::default(), |acc, estimate| {
                acc.convolve(estimate.for_face(face))
            })
    }

    /// Collapse into a single estimate of the dice that aren't ours.
    pub fn support_estimate(&self) -> SupportEstimate {
        SupportEstimate::from_fn(|face| self.others_support(face))
    }
}

type CacheKey = (usize, usize, usize);

/// Computes `Beliefs` of any order, memoising every intermediate result.
///
/// The cache is keyed by the length of the ledger prefix, the order and the
/// perspective. It's only valid for a single set of observations, so every
/// call to `estimate` starts with an empty cache.
#[derive(Debug, Clone)]
pub struct BeliefModel {
    confidence_threshold: f64,
    rationality: f64,
    cache: HashMap<CacheKey, Rc<Beliefs>>,
}

impl Default for BeliefModel {
    fn default() -> Self {
        Self::new(0.5, 8.0)
    }
}

impl BeliefModel {
    /// `confidence_threshold` is the threshold opponents are assumed to bid
    /// with. `rationality` is how sharply they're assumed to stick to it;
    /// zero means bids carry no information at all.
    pub fn new(confidence_threshold: f64, rationality: f64) -> Self {
        Self {
            confidence_threshold,
            rationality,
            cache: HashMap::new(),
        }
    }

    /// Order `order` beliefs held by `perspective` given everything bid so
    /// far.
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::arena::belief::{BeliefModel, Observations};
    /// use wild_perudo::arena::ledger::BidLedger;
    /// use wild_perudo::core::{Bid, Face};
    ///
    /// let mut ledger = BidLedger::default();
    /// ledger.validate_and_append(1, Bid::new(4, 5)).unwrap();
    /// let pool_sizes = [5, 5];
    /// let observations = Observations::new(&pool_sizes, ledger.entries());
    ///
    /// let mut model = BeliefModel::default();
    /// let five = Face::new(5).unwrap();
    /// let prior = model.estimate(&observations, 0, 0).about(1).unwrap().for_face(five).mean();
    /// let posterior = model.estimate(&observations, 1, 0).about(1).unwrap().for_face(five).mean();
    ///
    /// // Bidding four fives makes player one look like they hold fives.
    /// assert!(posterior > prior);
    /// ```
    pub fn estimate(
        &mut self,
        observations: &Observations,
        order: usize,
        perspective: usize,
    ) -> Rc<Beliefs> {
        self.cache.clear();
        let order = order.min(MAX_TOM_ORDER);
        let beliefs = self.estimate_prefix(observations, observations.entries.len(), order, perspective);
        event!(
            tracing::Level::TRACE,
            order,
            perspective,
            cached = self.cache.len(),
            "estimated_beliefs"
        );
        beliefs
    }

    fn estimate_prefix(
        &mut self,
        observations: &Observations,
        prefix_len: usize,
        order: usize,
        perspective: usize,
    ) -> Rc<Beliefs> {
        let key = (prefix_len, order, perspective);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let mut beliefs = Beliefs::priors(observations, perspective);
        if order > 0 {
            for (t, entry) in observations.entries[..prefix_len].iter().enumerate() {
                if entry.player_idx == perspective {
                    continue;
                }
                let Ok(face) = entry.bid.validate() else {
                    continue;
                };
                // What the bidder believed about everyone else when it bid.
                let bidder_view = self.estimate_prefix(observations, t, order - 1, entry.player_idx);
                let others = bidder_view.others_support(face);
                if let Some(Some(estimate)) = beliefs.by_player.get_mut(entry.player_idx) {
                    let updated = self.condition(
                        estimate.for_face(face),
                        &others,
                        entry.bid.quantity as usize,
                    );
                    *estimate = SupportEstimate::from_fn(|f| {
                        if f == face {
                            updated.clone()
                        } else {
                            estimate.for_face(f).clone()
                        }
                    });
                }
            }
        }

        let beliefs = Rc::new(beliefs);
        self.cache.insert(key, beliefs.clone());
        beliefs
    }

    /// Bayes' rule for "a player with `s` supporting dice bid `quantity`".
    fn condition(
        &self,
        prior: &SupportDistribution,
        others: &SupportDistribution,
        quantity: usize,
    ) -> SupportDistribution {
        let weights: Vec<f64> = prior
            .pmf()
            .iter()
            .enumerate()
            .map(|(own, p)| {
                let holds = others.tail(quantity.saturating_sub(own));
                p * logistic(self.rationality * (holds - self.confidence_threshold))
            })
            .collect();
        SupportDistribution::from_weights(weights).unwrap_or_else(|| prior.clone())
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
