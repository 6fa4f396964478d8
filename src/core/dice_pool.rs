use std::fmt;

use rand::Rng;

use super::{Face, WildPerudoError};

/// The hidden hand of dice owned by a single player.
///
/// The number of dice never changes once the pool is created. Rolling
/// replaces every face in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DicePool {
    dice: Vec<Face>,
}

impl DicePool {
    /// Create a pool of `size` dice. Until the first roll every die shows
    /// the lowest face.
    pub fn new(size: usize) -> Self {
        Self {
            dice: vec![Face::default(); size],
        }
    }

    /// Create a pool of `size` dice that's already been rolled.
    pub fn rolled<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut pool = Self::new(size);
        pool.roll(rng);
        pool
    }

    /// Create a pool from faces that are already known.
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::core::DicePool;
    ///
    /// let pool = DicePool::from_values(&[1, 1, 3, 4, 6]).unwrap();
    /// assert_eq!(5, pool.len());
    ///
    /// assert!(DicePool::from_values(&[1, 7]).is_err());
    /// assert!(DicePool::from_values(&[]).is_err());
    /// ```
    pub fn from_values(values: &[u8]) -> Result<Self, WildPerudoError> {
        if values.is_empty() {
            return Err(WildPerudoError::EmptyDicePool);
        }
        let dice = values
            .iter()
            .map(|v| Face::new(*v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { dice })
    }

    /// Re-roll every die. Each face is independently uniform.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for die in self.dice.iter_mut() {
            *die = Face::random(rng);
        }
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Face> {
        self.dice.iter()
    }

    pub fn faces(&self) -> &[Face] {
        &self.dice
    }

    /// How many dice show exactly `face`.
    pub fn count(&self, face: Face) -> usize {
        self.dice.iter().filter(|d| **d == face).count()
    }

    /// How many dice count toward a bid on `face`, wild dice included.
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::core::{DicePool, Face};
    ///
    /// let pool = DicePool::from_values(&[1, 1, 3, 4, 6]).unwrap();
    ///
    /// // One three plus the two wild ones.
    /// assert_eq!(3, pool.support(Face::new(3).unwrap()));
    /// // Bids on ones only count the ones.
    /// assert_eq!(2, pool.support(Face::WILD));
    /// ```
    pub fn support(&self, face: Face) -> usize {
        self.dice
            .iter()
            .filter(|d| face.is_supported_by(**d))
            .count()
    }

    /// The support this pool gives every face, indexed by `Face::index`.
    pub fn support_by_face(&self) -> [usize; 6] {
        let mut support = [0; 6];
        for face in Face::all() {
            support[face.index()] = self.support(face);
        }
        support
    }
}

impl fmt::Display for DicePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, die) in self.dice.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{die}")?;
        }
        write!(f, "]")
    }
}
