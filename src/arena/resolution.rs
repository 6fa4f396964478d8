use crate::core::{Bid, DicePool, Face};

/// What the dice said about a challenged bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    /// The bid that was challenged.
    pub bid: Bid,
    /// How many dice across every pool count toward the bid.
    pub support_count: usize,
    /// True if the bid stood, meaning the bidder wins the exchange.
    pub success: bool,
}

impl Resolution {
    /// How far the dice were from the claimed quantity in either direction.
    pub fn margin(&self) -> u64 {
        (self.support_count as u64).abs_diff(self.bid.quantity as u64)
    }
}

/// Count the dice across all the pools that support a bid on `face`.
pub fn count_support<'a, I>(face: Face, pools: I) -> usize
where
    I: IntoIterator<Item = &'a DicePool>,
{
    pools.into_iter().map(|pool| pool.support(face)).sum()
}

/// Resolve a challenge against the actual dice.
///
/// Wild dice count toward any non wild face. A bid on the wild face only
/// counts the wild dice. This is pure; all the randomness happened when the
/// dice were rolled.
///
/// # Examples
///
/// ```
/// use wild_perudo::arena::resolution::resolve;
/// use wild_perudo::core::{Bid, DicePool};
///
/// let pools = vec![
///     DicePool::from_values(&[1, 1, 3, 4, 6]).unwrap(),
///     DicePool::from_values(&[2, 3, 3, 5, 6]).unwrap(),
/// ];
///
/// let resolution = resolve(&Bid::new(5, 3), &pools);
/// assert_eq!(5, resolution.support_count);
/// assert!(resolution.success);
/// ```
pub fn resolve(bid: &Bid, pools: &[DicePool]) -> Resolution {
    // Every bid reaching here went through the ledger.
    debug_assert!(
        bid.validate().is_ok(),
        "Resolving a bid that was never validated: {bid}"
    );
    let support_count = match Face::new(bid.face) {
        Ok(face) => count_support(face, pools),
        Err(_) => 0,
    };
    Resolution {
        bid: *bid,
        support_count,
        success: support_count >= bid.quantity as usize,
    }
}
