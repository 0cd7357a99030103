//! The two corners of a match.
//!
//! ## Side
//!
//! A match always has exactly two principals: the favored wrestler (the
//! face) and the underdog (the heel). `Side` names a corner without borrowing
//! the wrestler in it.
//!
//! ## SideMap
//!
//! Per-side storage with O(1) access, indexable by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One corner of the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The favored wrestler. Wins exact ties.
    Favored,
    /// The underdog. Treated as trailing when positions are level.
    Underdog,
}

impl Side {
    /// Both sides, favored first.
    pub const BOTH: [Side; 2] = [Side::Favored, Side::Underdog];

    /// The other corner.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Favored => Side::Underdog,
            Side::Underdog => Side::Favored,
        }
    }

    /// Face/heel label used by the flavor tables.
    #[must_use]
    pub const fn alignment(self) -> &'static str {
        match self {
            Side::Favored => "Face",
            Side::Underdog => "Heel",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Favored => write!(f, "Favored"),
            Side::Underdog => write!(f, "Underdog"),
        }
    }
}

/// Per-side data storage.
///
/// ## Example
///
/// ```
/// use fttm_engine::core::{Side, SideMap};
///
/// let mut score = SideMap::with_value(0);
/// score[Side::Underdog] += 3;
/// assert_eq!(score[Side::Favored], 0);
/// assert_eq!(score[Side::Underdog], 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    favored: T,
    underdog: T,
}

impl<T> SideMap<T> {
    /// Create from explicit values.
    pub fn new(favored: T, underdog: T) -> Self {
        Self { favored, underdog }
    }

    /// Create with values from a factory function.
    pub fn from_fn(mut factory: impl FnMut(Side) -> T) -> Self {
        Self {
            favored: factory(Side::Favored),
            underdog: factory(Side::Underdog),
        }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            favored: value.clone(),
            underdog: value,
        }
    }

    /// Get a reference to one side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Favored => &self.favored,
            Side::Underdog => &self.underdog,
        }
    }

    /// Get a mutable reference to one side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Favored => &mut self.favored,
            Side::Underdog => &mut self.underdog,
        }
    }

    /// Iterate over (Side, &T) pairs, favored first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Favored, &self.favored), (Side::Underdog, &self.underdog)].into_iter()
    }

    /// Find the side whose value matches a predicate, favored first.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<Side> {
        Side::BOTH.into_iter().find(|&side| predicate(self.get(side)))
    }

    /// Map both entries.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> SideMap<U> {
        SideMap {
            favored: f(&self.favored),
            underdog: f(&self.underdog),
        }
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Favored.opponent(), Side::Underdog);
        assert_eq!(Side::Underdog.opponent(), Side::Favored);
        assert_eq!(Side::Favored.alignment(), "Face");
        assert_eq!(Side::Underdog.alignment(), "Heel");
    }

    #[test]
    fn test_side_map_from_fn() {
        let map = SideMap::from_fn(|side| side == Side::Favored);

        assert!(map[Side::Favored]);
        assert!(!map[Side::Underdog]);
    }

    #[test]
    fn test_side_map_mutation() {
        let mut map = SideMap::with_value(0u8);

        map[Side::Favored] = 10;
        *map.get_mut(Side::Underdog) += 2;

        assert_eq!(map[Side::Favored], 10);
        assert_eq!(map[Side::Underdog], 2);
    }

    #[test]
    fn test_side_map_iter_and_find() {
        let map = SideMap::new(3, 7);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Side::Favored, &3), (Side::Underdog, &7)]);

        assert_eq!(map.find(|&v| v > 5), Some(Side::Underdog));
        assert_eq!(map.find(|&v| v > 10), None);
        assert_eq!(map.map(|v| v * 2), SideMap::new(6, 14));
    }

    #[test]
    fn test_side_serialization() {
        let json = serde_json::to_string(&Side::Underdog).unwrap();
        let side: Side = serde_json::from_str(&json).unwrap();
        assert_eq!(side, Side::Underdog);
    }
}
