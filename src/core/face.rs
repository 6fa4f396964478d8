use std::fmt;

use rand::Rng;

use super::WildPerudoError;

/// The number of sides on every die.
pub const NUM_FACES: u8 = 6;

/// A single face value of a six sided die.
///
/// Face 1 is the wild face. A wild die counts toward a bid on any other
/// face, while a bid declared on face 1 only counts actual ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Face(u8);

impl Face {
    /// The wild face.
    pub const WILD: Face = Face(1);

    /// Create a face, checking that it's on the die.
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::core::Face;
    ///
    /// let face = Face::new(4).unwrap();
    /// assert_eq!(4, face.value());
    /// assert!(!face.is_wild());
    ///
    /// assert!(Face::new(0).is_err());
    /// assert!(Face::new(7).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self, WildPerudoError> {
        if (1..=NUM_FACES).contains(&value) {
            Ok(Self(value))
        } else {
            Err(WildPerudoError::InvalidFace(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_wild(self) -> bool {
        self.0 == 1
    }

    /// Index of this face into a six element array.
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Every face in ascending order, starting with the wild face.
    pub fn all() -> impl Iterator<Item = Face> + Clone {
        (1..=NUM_FACES).map(Face)
    }

    /// Roll a single fair die.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(1..=NUM_FACES))
    }

    /// Does a die showing `die` count toward a bid on this face?
    ///
    /// # Examples
    ///
    /// ```
    /// use wild_perudo::core::Face;
    ///
    /// let three = Face::new(3).unwrap();
    /// assert!(three.is_supported_by(three));
    /// assert!(three.is_supported_by(Face::WILD));
    /// assert!(!three.is_supported_by(Face::new(5).unwrap()));
    ///
    /// // Wild dice don't double up on a wild bid.
    /// assert!(Face::WILD.is_supported_by(Face::WILD));
    /// assert!(!Face::WILD.is_supported_by(three));
    /// ```
    pub fn is_supported_by(self, die: Face) -> bool {
        die == self || (!self.is_wild() && die.is_wild())
    }

    /// The chance that a single unseen die supports a bid on this face.
    /// That's 1/6 for the face itself plus 1/6 for a wild unless the face
    /// is wild.
    pub fn support_probability(self) -> f64 {
        if self.is_wild() { 1.0 / 6.0 } else { 2.0 / 6.0 }
    }
}

impl Default for Face {
    fn default() -> Self {
        Face::WILD
    }
}

impl TryFrom<u8> for Face {
    type Error = WildPerudoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Face::new(value)
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> Self {
        face.0
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
