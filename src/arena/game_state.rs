use crate::core::{Bid, DicePool, WildExchange};

use super::{
    config::SessionConfig,
    ledger::BidLedger,
    resolution::Resolution,
    scoring::{ScoreDelta, Scoreboard, ScoringRule},
};

/// Where a round is in its life cycle.
///
/// `Rolling -> Bidding -> Challenged -> Resolving -> Scoring -> RoundEnd`
///
/// A forfeit jumps straight from `Bidding` to `Scoring`. After `RoundEnd`
/// the session either rolls again or is `Complete`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Rolling,
    Bidding,
    Challenged,
    Resolving,
    Scoring,
    RoundEnd,
    Complete,
}

/// The whole state of a running session.
///
/// This is the context object that the simulation mutates. Agents never see
/// it directly; they get a `PlayerView` instead.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// The number of seats at the table.
    pub num_players: usize,
    /// How many dice every player holds. Never changes.
    pub hand_size: usize,
    /// The session ends after this many rounds.
    pub max_rounds: usize,
    /// How many rounds have been completed.
    pub round_idx: usize,
    pub phase: Phase,
    /// Everyone's dice, indexed by seat.
    pub pools: Vec<DicePool>,
    pub ledger: BidLedger,
    pub scoreboard: Scoreboard,
    /// The seat that's asked to act next.
    pub to_act_idx: usize,
    /// The seat that opens the current round.
    pub opening_idx: usize,
    /// Who challenged the current bid this round.
    pub challenger_idx: Option<usize>,
    /// Who forfeited this round with an illegal action.
    pub forfeit_idx: Option<usize>,
    pub resolution: Option<Resolution>,
    /// The most recent change to the scores.
    pub last_delta: Option<ScoreDelta>,
}

impl GameState {
    pub fn new(
        num_players: usize,
        hand_size: usize,
        max_rounds: usize,
        exchange: WildExchange,
        scoring: ScoringRule,
    ) -> Self {
        GameState {
            num_players,
            hand_size,
            max_rounds,
            round_idx: 0,
            phase: Phase::Rolling,
            pools: vec![DicePool::new(hand_size); num_players],
            ledger: BidLedger::new(exchange),
            scoreboard: Scoreboard::new(num_players, scoring),
            to_act_idx: 0,
            opening_idx: 0,
            challenger_idx: None,
            forfeit_idx: None,
            resolution: None,
            last_delta: None,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            config.agents.len(),
            config.hand_size,
            config.max_rounds,
            config.wild_exchange,
            config.scoring,
        )
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn total_dice(&self) -> usize {
        self.pools.iter().map(DicePool::len).sum()
    }

    pub fn scores(&self) -> &[i64] {
        self.scoreboard.scores()
    }

    pub fn current_bid(&self) -> Option<&Bid> {
        self.ledger.current_bid()
    }

    /// The seat after `idx`, wrapping around the table.
    pub fn next_idx(&self, idx: usize) -> usize {
        (idx + 1) % self.num_players
    }

    pub fn advance_to_act(&mut self) {
        self.to_act_idx = self.next_idx(self.to_act_idx);
    }

    /// Reset everything that only lasts a single round.
    pub fn start_round(&mut self) {
        self.ledger.clear();
        self.challenger_idx = None;
        self.forfeit_idx = None;
        self.resolution = None;
        self.to_act_idx = self.opening_idx;
    }

    /// What `player_idx` is allowed to know.
    pub fn view(&self, player_idx: usize) -> PlayerView<'_> {
        PlayerView::new(
            player_idx,
            &self.pools[player_idx],
            self.pools.iter().map(DicePool::len).collect(),
            &self.ledger,
            self.scores(),
            self.round_idx,
            self.max_rounds,
        )
    }
}

/// The read only slice of the game that a single agent gets to see.
///
/// It has the agent's own dice, but only the sizes of everyone else's
/// pools. Together with the public ledger and scores that's everything an
/// honest player at the table would know.
#[derive(Debug, Clone)]
pub struct PlayerView<'a> {
    player_idx: usize,
    own_pool: &'a DicePool,
    pool_sizes: Vec<usize>,
    ledger: &'a BidLedger,
    scores: &'a [i64],
    round_idx: usize,
    max_rounds: usize,
}

impl<'a> PlayerView<'a> {
    pub fn new(
        player_idx: usize,
        own_pool: &'a DicePool,
        pool_sizes: Vec<usize>,
        ledger: &'a BidLedger,
        scores: &'a [i64],
        round_idx: usize,
        max_rounds: usize,
    ) -> Self {
        debug_assert!(player_idx < pool_sizes.len());
        Self {
            player_idx,
            own_pool,
            pool_sizes,
            ledger,
            scores,
            round_idx,
            max_rounds,
        }
    }

    pub fn player_idx(&self) -> usize {
        self.player_idx
    }

    pub fn own_pool(&self) -> &DicePool {
        self.own_pool
    }

    pub fn pool_sizes(&self) -> &[usize] {
        &self.pool_sizes
    }

    pub fn num_players(&self) -> usize {
        self.pool_sizes.len()
    }

    pub fn ledger(&self) -> &BidLedger {
        self.ledger
    }

    pub fn current_bid(&self) -> Option<&Bid> {
        self.ledger.current_bid()
    }

    pub fn wild_exchange(&self) -> WildExchange {
        self.ledger.wild_exchange()
    }

    pub fn scores(&self) -> &[i64] {
        self.scores
    }

    pub fn round_idx(&self) -> usize {
        self.round_idx
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn total_dice(&self) -> usize {
        self.pool_sizes.iter().sum()
    }

    /// Dice in everyone else's pools.
    pub fn unseen_dice(&self) -> usize {
        self.total_dice() - self.own_pool.len()
    }
}
