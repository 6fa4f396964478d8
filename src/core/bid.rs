use std::fmt;

use super::{Face, WildPerudoError};

/// How a bid on the wild face is weighed against bids on the other faces.
///
/// Wild bids are doubly potent: a wild bid of quantity `q` is placed next to
/// a non wild bid of quantity `2q`. The variants decide which side of that
/// boundary the wild bid falls on.
///
/// | option          | wild `(q, 1)` sits                         |
/// |-----------------|--------------------------------------------|
/// | `DoublePlusOne` | above every `(2q, f)` and below `(2q+1, f)` |
/// | `Double`        | below every `(2q, f)` and above `(2q-1, f)` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WildExchange {
    #[default]
    DoublePlusOne,
    Double,
}

impl WildExchange {
    /// The smallest non wild quantity that outranks a wild bid of
    /// `wild_quantity`, or `None` when it doesn't fit in a `u32`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::core::WildExchange;
    ///
    /// assert_eq!(Some(7), WildExchange::DoublePlusOne.non_wild_equivalent(3));
    /// assert_eq!(Some(6), WildExchange::Double.non_wild_equivalent(3));
    /// assert_eq!(None, WildExchange::Double.non_wild_equivalent(u32::MAX));
    /// ```
    pub fn non_wild_equivalent(self, wild_quantity: u32) -> Option<u32> {
        let doubled = wild_quantity.checked_mul(2)?;
        match self {
            WildExchange::DoublePlusOne => doubled.checked_add(1),
            WildExchange::Double => Some(doubled),
        }
    }

    fn rank(self, bid: &Bid) -> BidRank {
        // Everything is measured in half steps of non wild quantity so that a
        // wild bid can sit between two whole quantities.
        let quantity = bid.quantity as u64;
        if bid.is_wild() {
            match self {
                WildExchange::DoublePlusOne => BidRank {
                    half_steps: 4 * quantity + 1,
                    face: 0,
                },
                WildExchange::Double => BidRank {
                    half_steps: 4 * quantity,
                    face: 1,
                },
            }
        } else {
            BidRank {
                half_steps: 2 * quantity,
                face: bid.face,
            }
        }
    }
}

/// Where a bid sits on the weighted scale. Only meaningful when compared to
/// ranks computed with the same `WildExchange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BidRank {
    half_steps: u64,
    face: u8,
}

/// A claim that at least `quantity` dice across every pool show `face`.
///
/// Bids are plain data so that anything an agent proposes can be
/// represented. Use `Bid::validate` or a `BidLedger` to check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bid {
    pub quantity: u32,
    pub face: u8,
}

impl Bid {
    pub const fn new(quantity: u32, face: u8) -> Self {
        Self { quantity, face }
    }

    /// Check that the bid is well formed on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::core::{Bid, WildPerudoError};
    ///
    /// assert!(Bid::new(2, 5).validate().is_ok());
    /// assert_eq!(Err(WildPerudoError::ZeroQuantity), Bid::new(0, 4).validate());
    /// assert_eq!(Err(WildPerudoError::InvalidFace(7)), Bid::new(3, 7).validate());
    /// ```
    pub fn validate(&self) -> Result<Face, WildPerudoError> {
        let face = Face::new(self.face)?;
        if self.quantity == 0 {
            return Err(WildPerudoError::ZeroQuantity);
        }
        Ok(face)
    }

    pub fn is_wild(&self) -> bool {
        self.face == 1
    }

    pub fn rank(&self, exchange: WildExchange) -> BidRank {
        exchange.rank(self)
    }

    /// Does this bid strictly outrank `other` on the weighted scale?
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::core::{Bid, WildExchange};
    ///
    /// let exchange = WildExchange::DoublePlusOne;
    /// // Raising the quantity always works.
    /// assert!(Bid::new(4, 2).outranks(&Bid::new(3, 6), exchange));
    /// // So does raising the face at the same quantity.
    /// assert!(Bid::new(3, 5).outranks(&Bid::new(3, 4), exchange));
    /// // Two wild dice are worth more than four of anything else.
    /// assert!(Bid::new(2, 1).outranks(&Bid::new(4, 6), exchange));
    /// // But not five.
    /// assert!(Bid::new(5, 2).outranks(&Bid::new(2, 1), exchange));
    /// ```
    pub fn outranks(&self, other: &Bid, exchange: WildExchange) -> bool {
        self.rank(exchange) > other.rank(exchange)
    }

    /// The smallest legal bid on `face` given the current bid, if any.
    ///
    /// `None` when every bid on `face` that would outrank `current` has a
    /// quantity past `u32::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::core::{Bid, Face, WildExchange};
    ///
    /// let exchange = WildExchange::DoublePlusOne;
    /// let current = Bid::new(4, 3);
    ///
    /// let four = Face::new(4).unwrap();
    /// let two = Face::new(2).unwrap();
    ///
    /// assert_eq!(Some(Bid::new(4, 4)), Bid::min_raise(four, Some(&current), exchange));
    /// assert_eq!(Some(Bid::new(5, 2)), Bid::min_raise(two, Some(&current), exchange));
    /// assert_eq!(Some(Bid::new(2, 1)), Bid::min_raise(Face::WILD, Some(&current), exchange));
    /// assert_eq!(Some(Bid::new(1, 2)), Bid::min_raise(two, None, exchange));
    /// assert_eq!(None, Bid::min_raise(two, Some(&Bid::new(u32::MAX, 6)), exchange));
    /// ```
    pub fn min_raise(face: Face, current: Option<&Bid>, exchange: WildExchange) -> Option<Bid> {
        let Some(current) = current else {
            return Some(Bid::new(1, face.value()));
        };
        let quantity = match (face.is_wild(), current.is_wild()) {
            (true, true) => current.quantity.checked_add(1)?,
            (false, true) => exchange.non_wild_equivalent(current.quantity)?,
            (false, false) if face.value() > current.face => current.quantity,
            (false, false) => current.quantity.checked_add(1)?,
            (true, false) => match exchange {
                // (q, 1) sits above (2q, f).
                WildExchange::DoublePlusOne => current.quantity.div_ceil(2),
                // (q, 1) sits below (2q, f).
                WildExchange::Double => current.quantity / 2 + 1,
            },
        };
        Some(Bid::new(quantity.max(1), face.value()))
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.quantity, self.face)
    }
}
