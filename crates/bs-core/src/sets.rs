//! Canonical integer sets.
//!
//! Instants and station ids travel to the backend as ascending, unique,
//! non-negative integers joined by `;` (e.g. `"0;4;96"`). Free text is parsed
//! loosely: any run of non-digit characters separates tokens.

use core::convert::Infallible;
use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;
use std::collections::BTreeSet;

use crate::grid::Instant;

pub const SEPARATOR: char = ';';

/// Ordered, deduplicated set of non-negative integers tagged by what they
/// identify.
pub struct CanonicalSet<K> {
    values: BTreeSet<u64>,
    _kind: PhantomData<K>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstantKind;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationKind;

pub type InstantSet = CanonicalSet<InstantKind>;
pub type StationSet = CanonicalSet<StationKind>;

pub fn parse_instant_set(raw: &str) -> InstantSet {
    InstantSet::parse_loose(raw)
}

pub fn parse_station_set(raw: &str) -> StationSet {
    StationSet::parse_loose(raw)
}

impl<K> CanonicalSet<K> {
    pub fn new() -> Self {
        Self {
            values: BTreeSet::new(),
            _kind: PhantomData,
        }
    }

    /// Parse free text. Tokens that do not fit a `u64` are dropped; this
    /// never fails.
    pub fn parse_loose(raw: &str) -> Self {
        raw.split(|c: char| !c.is_ascii_digit())
            .filter(|token| !token.is_empty())
            .filter_map(|token| token.parse::<u64>().ok())
            .collect()
    }

    pub fn insert(&mut self, value: u64) -> bool {
        self.values.insert(value)
    }

    pub fn remove(&mut self, value: u64) -> bool {
        self.values.remove(&value)
    }

    pub fn contains(&self, value: u64) -> bool {
        self.values.contains(&value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.iter().collect()
    }

    /// Canonical string, or `None` for an empty set.
    pub fn to_canonical(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl InstantSet {
    pub fn insert_instant(&mut self, instant: Instant) -> bool {
        self.insert(instant.get())
    }

    pub fn instants(&self) -> impl Iterator<Item = Instant> + '_ {
        self.iter().map(Instant::new)
    }
}

impl<K> Default for CanonicalSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for CanonicalSet<K> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> PartialEq for CanonicalSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<K> Eq for CanonicalSet<K> {}

impl<K> fmt::Debug for CanonicalSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.iter()).finish()
    }
}

impl<K> fmt::Display for CanonicalSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl<K> FromStr for CanonicalSet<K> {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_loose(s))
    }
}

impl<K> FromIterator<u64> for CanonicalSet<K> {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
            _kind: PhantomData,
        }
    }
}

impl<K> Extend<u64> for CanonicalSet<K> {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

#[cfg(feature = "serde")]
impl<K> serde::Serialize for CanonicalSet<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, K> serde::Deserialize<'de> for CanonicalSet<K> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_loose(&raw))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn format_then_parse_is_sorted_dedup(values in prop::collection::vec(any::<u64>(), 0..40)) {
            let set: InstantSet = values.iter().copied().collect();
            let parsed = parse_instant_set(&set.to_string());

            let mut expected = values.clone();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(parsed.to_vec(), expected);
        }

        #[test]
        fn parse_never_panics(raw in ".*") {
            let set = parse_station_set(&raw);
            prop_assert_eq!(parse_station_set(&set.to_string()), set);
        }
    }
}
