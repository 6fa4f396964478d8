//! Small probability helpers for reasoning about dice nobody has seen yet.
//!
//! Everything here works on the number of dice that support a bid. With `n`
//! unseen dice and a per die chance `p` of supporting the bid, that number
//! is `Binomial(n, p)`. Beliefs about individual opponents can move away
//! from the binomial, so `SupportDistribution` keeps a full probability mass
//! function that can be convolved across players.

/// `n choose k` as a float. Good enough for the small hands used in the game.
fn choose(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// P(X = k) for X ~ Binomial(n, p).
pub fn binomial_pmf(n: usize, k: usize, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    choose(n, k) * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
}

/// P(X >= k) for X ~ Binomial(n, p).
///
/// # Examples
///
/// ```
/// use approx::assert_relative_eq;
/// use wild_perudo::core::binomial_tail;
///
/// // Anything is at least zero.
/// assert_relative_eq!(1.0, binomial_tail(8, 0, 1.0 / 3.0));
/// // Six or more of eight unseen dice supporting a non wild bid.
/// assert_relative_eq!(129.0 / 6561.0, binomial_tail(8, 6, 1.0 / 3.0), epsilon = 1e-12);
/// // More successes than trials is impossible.
/// assert_relative_eq!(0.0, binomial_tail(8, 9, 1.0 / 3.0));
/// ```
pub fn binomial_tail(n: usize, k: usize, p: f64) -> f64 {
    if k == 0 {
        return 1.0;
    }
    (k..=n).map(|i| binomial_pmf(n, i, p)).sum::<f64>().min(1.0)
}

/// A probability distribution over how many dice support a bid.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportDistribution {
    pmf: Vec<f64>,
}

impl SupportDistribution {
    /// The distribution of supporting dice among `n` dice that each support
    /// the bid with probability `p`.
    pub fn binomial(n: usize, p: f64) -> Self {
        Self {
            pmf: (0..=n).map(|k| binomial_pmf(n, k, p)).collect(),
        }
    }

    /// A distribution that's certain there are exactly `k` supporting dice.
    pub fn point(k: usize) -> Self {
        let mut pmf = vec![0.0; k + 1];
        pmf[k] = 1.0;
        Self { pmf }
    }

    /// Build a distribution from unnormalized weights.
    ///
    /// Returns `None` if the weights don't sum to something positive.
    pub fn from_weights(weights: Vec<f64>) -> Option<Self> {
        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) || weights.iter().any(|w| *w < 0.0) {
            return None;
        }
        Some(Self {
            pmf: weights.into_iter().map(|w| w / total).collect(),
        })
    }

    pub fn pmf(&self) -> &[f64] {
        &self.pmf
    }

    /// The largest number of supporting dice this distribution allows.
    pub fn max_support(&self) -> usize {
        self.pmf.len().saturating_sub(1)
    }

    /// P(X >= k)
    pub fn tail(&self, k: usize) -> f64 {
        self.pmf.iter().skip(k).sum::<f64>().min(1.0)
    }

    pub fn mean(&self) -> f64 {
        self.pmf
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum()
    }

    /// The distribution of the sum of two independent support counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use approx::assert_relative_eq;
    /// use wild_perudo::core::SupportDistribution;
    ///
    /// let a = SupportDistribution::binomial(3, 0.25);
    /// let b = SupportDistribution::binomial(5, 0.25);
    /// let sum = a.convolve(&b);
    ///
    /// let direct = SupportDistribution::binomial(8, 0.25);
    /// for (l, r) in sum.pmf().iter().zip(direct.pmf()) {
    ///     assert_relative_eq!(*l, *r, epsilon = 1e-12);
    /// }
    /// ```
    pub fn convolve(&self, other: &SupportDistribution) -> SupportDistribution {
        let mut pmf = vec![0.0; self.pmf.len() + other.pmf.len() - 1];
        for (i, a) in self.pmf.iter().enumerate() {
            if *a == 0.0 {
                continue;
            }
            for (j, b) in other.pmf.iter().enumerate() {
                pmf[i + j] += a * b;
            }
        }
        SupportDistribution { pmf }
    }
}

impl Default for SupportDistribution {
    /// No dice at all, so certainly zero support.
    fn default() -> Self {
        Self::point(0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_pmf_sums_to_one() {
        for n in 0..20 {
            let total: f64 = (0..=n).map(|k| binomial_pmf(n, k, 1.0 / 3.0)).sum();
            assert_relative_eq!(1.0, total, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_tail_closed_form() {
        // P(X >= 6) with X ~ Binomial(8, 1/3)
        // = (C(8,6) 2^2 + C(8,7) 2 + C(8,8)) / 3^8
        // = (112 + 16 + 1) / 6561
        let expected = 129.0 / 6561.0;
        assert_relative_eq!(expected, binomial_tail(8, 6, 1.0 / 3.0), epsilon = 1e-12);

        let dist = SupportDistribution::binomial(8, 1.0 / 3.0);
        assert_relative_eq!(expected, dist.tail(6), epsilon = 1e-12);
    }

    #[test]
    fn test_point_distribution() {
        let dist = SupportDistribution::point(3);
        assert_relative_eq!(1.0, dist.tail(3));
        assert_relative_eq!(0.0, dist.tail(4));
        assert_relative_eq!(3.0, dist.mean());
        assert_eq!(3, dist.max_support());
    }

    #[test]
    fn test_from_weights_normalizes() {
        let dist = SupportDistribution::from_weights(vec![1.0, 1.0, 2.0]).unwrap();
        assert_relative_eq!(0.5, dist.pmf()[2]);
        assert!(SupportDistribution::from_weights(vec![0.0, 0.0]).is_none());
        assert!(SupportDistribution::from_weights(vec![-1.0, 2.0]).is_none());
    }

    #[test]
    fn test_default_is_empty_support() {
        let dist = SupportDistribution::default();
        assert_relative_eq!(1.0, dist.tail(0));
        assert_relative_eq!(0.0, dist.tail(1));
    }

    proptest! {
        #[test]
        fn prop_tail_is_monotone(n in 0usize..30, p in 0.0f64..=1.0) {
            let mut last = 1.0;
            for k in 0..=n + 1 {
                let tail = binomial_tail(n, k, p);
                prop_assert!(tail <= last + 1e-12);
                prop_assert!((0.0..=1.0).contains(&tail));
                last = tail;
            }
        }

        #[test]
        fn prop_convolution_keeps_mass(a in 0usize..10, b in 0usize..10, p in 0.0f64..=1.0) {
            let sum = SupportDistribution::binomial(a, p)
                .convolve(&SupportDistribution::binomial(b, p));
            let total: f64 = sum.pmf().iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            prop_assert_eq!(a + b, sum.max_support());
        }
    }
}
