use crate::core::{Bid, Face, WildExchange, WildPerudoError};

/// A single bid in the order it was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerEntry {
    pub player_idx: usize,
    pub bid: Bid,
}

/// The bids made so far in the current round.
///
/// The ledger is append only. Every entry strictly outranks the one before
/// it under the ledger's `WildExchange`. Nothing is added unless the bid
/// passes validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BidLedger {
    entries: Vec<LedgerEntry>,
    exchange: WildExchange,
}

impl BidLedger {
    pub fn new(exchange: WildExchange) -> Self {
        Self {
            entries: vec![],
            exchange,
        }
    }

    pub fn wild_exchange(&self) -> WildExchange {
        self.exchange
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// The bid that would be challenged right now.
    pub fn current_bid(&self) -> Option<&Bid> {
        self.entries.last().map(|e| &e.bid)
    }

    /// Check a proposed bid against the current one without changing
    /// anything.
    ///
    /// Returns the validated face of the bid.
    pub fn validate(&self, proposed: &Bid) -> Result<Face, WildPerudoError> {
        let face = proposed.validate()?;
        if let Some(current) = self.current_bid() {
            if !proposed.outranks(current, self.exchange) {
                return Err(WildPerudoError::DoesNotOutrank {
                    proposed: *proposed,
                    current: *current,
                });
            }
        }
        Ok(face)
    }

    /// Validate a bid and record it if it's legal.
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::arena::ledger::BidLedger;
    /// use wild_perudo::core::{Bid, WildExchange};
    ///
    /// let mut ledger = BidLedger::new(WildExchange::DoublePlusOne);
    /// ledger.validate_and_append(0, Bid::new(2, 4)).unwrap();
    ///
    /// // Quantity zero is never legal, and the ledger isn't touched.
    /// assert!(ledger.validate_and_append(1, Bid::new(0, 4)).is_err());
    /// assert_eq!(1, ledger.len());
    ///
    /// ledger.validate_and_append(1, Bid::new(2, 5)).unwrap();
    /// assert_eq!(Some(&Bid::new(2, 5)), ledger.current_bid());
    /// ```
    pub fn validate_and_append(
        &mut self,
        player_idx: usize,
        proposed: Bid,
    ) -> Result<(), WildPerudoError> {
        self.validate(&proposed)?;
        self.entries.push(LedgerEntry {
            player_idx,
            bid: proposed,
        });
        Ok(())
    }

    /// Start a fresh round. The ranking rule is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
