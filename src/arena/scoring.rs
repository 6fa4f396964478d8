use super::resolution::Resolution;

/// How a resolved challenge turns into points.
///
/// | option         | winner gains                             | loser loses |
/// |----------------|------------------------------------------|-------------|
/// | `Flat`         | `reward`                                 | `penalty`   |
/// | `MarginScaled` | `base + per_die * abs(support - quantity)` | `penalty`   |
///
/// A penalty of zero leaves the loser's score unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScoringRule {
    Flat { reward: i64, penalty: i64 },
    MarginScaled { base: i64, per_die: i64, penalty: i64 },
}

impl Default for ScoringRule {
    fn default() -> Self {
        ScoringRule::Flat {
            reward: 1,
            penalty: 0,
        }
    }
}

impl ScoringRule {
    pub fn reward(&self, resolution: &Resolution) -> i64 {
        match *self {
            ScoringRule::Flat { reward, .. } => reward,
            ScoringRule::MarginScaled { base, per_die, .. } => {
                base + per_die * resolution.margin() as i64
            }
        }
    }

    pub fn penalty(&self) -> i64 {
        match *self {
            ScoringRule::Flat { penalty, .. } => penalty,
            ScoringRule::MarginScaled { penalty, .. } => penalty,
        }
    }

    /// The most a single exchange can award when `total_dice` are in play.
    pub fn max_reward(&self, total_dice: usize) -> i64 {
        match *self {
            ScoringRule::Flat { reward, .. } => reward,
            // The bid quantity can be anything, but a challenge is only
            // worth making on bids within reach of the dice.
            ScoringRule::MarginScaled { base, per_die, .. } => {
                base + per_die * total_dice as i64
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            ScoringRule::Flat { reward, penalty } => reward >= 0 && penalty >= 0,
            ScoringRule::MarginScaled {
                base,
                per_die,
                penalty,
            } => base >= 0 && per_die >= 0 && penalty >= 0,
        }
    }
}

/// A single change to the scoreboard. Applying then undoing a delta leaves
/// the scores exactly as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreDelta {
    /// Who gained points, if anyone.
    pub winner: Option<usize>,
    pub reward: i64,
    /// Who lost points.
    pub loser: usize,
    pub penalty: i64,
}

/// Persistent per player scores for a whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scoreboard {
    scores: Vec<i64>,
    rule: ScoringRule,
}

impl Scoreboard {
    pub fn new(num_players: usize, rule: ScoringRule) -> Self {
        Self {
            scores: vec![0; num_players],
            rule,
        }
    }

    pub fn scores(&self) -> &[i64] {
        &self.scores
    }

    pub fn rule(&self) -> ScoringRule {
        self.rule
    }

    /// Score a resolved challenge between `bidder` and `challenger`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::arena::resolution::resolve;
    /// use wild_perudo::arena::scoring::{Scoreboard, ScoringRule};
    /// use wild_perudo::core::{Bid, DicePool};
    ///
    /// let pools = vec![
    ///     DicePool::from_values(&[1, 1, 3, 4, 6]).unwrap(),
    ///     DicePool::from_values(&[2, 3, 3, 5, 6]).unwrap(),
    /// ];
    /// let mut scoreboard = Scoreboard::new(2, ScoringRule::default());
    ///
    /// // Player 0 bid two wild dice, player 1 called it.
    /// let resolution = resolve(&Bid::new(2, 1), &pools);
    /// let delta = scoreboard.apply_outcome(0, 1, &resolution);
    ///
    /// assert_eq!(Some(0), delta.winner);
    /// assert_eq!(&[1, 0], scoreboard.scores());
    /// ```
    pub fn apply_outcome(
        &mut self,
        bidder: usize,
        challenger: usize,
        resolution: &Resolution,
    ) -> ScoreDelta {
        let (winner, loser) = if resolution.success {
            (bidder, challenger)
        } else {
            (challenger, bidder)
        };
        let delta = ScoreDelta {
            winner: Some(winner),
            reward: self.rule.reward(resolution),
            loser,
            penalty: self.rule.penalty(),
        };
        self.apply(&delta);
        delta
    }

    /// Take `amount` points from `offender` without rewarding anyone.
    pub fn apply_penalty(&mut self, offender: usize, amount: i64) -> ScoreDelta {
        let delta = ScoreDelta {
            winner: None,
            reward: 0,
            loser: offender,
            penalty: amount,
        };
        self.apply(&delta);
        delta
    }

    pub fn apply(&mut self, delta: &ScoreDelta) {
        if let Some(winner) = delta.winner {
            self.scores[winner] += delta.reward;
        }
        self.scores[delta.loser] -= delta.penalty;
    }

    pub fn undo(&mut self, delta: &ScoreDelta) {
        if let Some(winner) = delta.winner {
            self.scores[winner] -= delta.reward;
        }
        self.scores[delta.loser] += delta.penalty;
    }

    /// Every player tied for the highest score.
    pub fn leaders(&self) -> Vec<usize> {
        let Some(best) = self.scores.iter().max() else {
            return vec![];
        };
        self.scores
            .iter()
            .enumerate()
            .filter(|(_, score)| *score == best)
            .map(|(idx, _)| idx)
            .collect()
    }
}
