//! Station-scoped day parameters (`<station>-all`, `<station>-1;2;3`).

use core::fmt;

use crate::sets::{SEPARATOR, StationSet};

pub const ALL_DAYS: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DaysSpec {
    #[default]
    All,
    /// Ascending, unique day numbers.
    Days(Vec<u32>),
}

impl DaysSpec {
    /// Parse `all` or a `;`-separated day list. Non-numeric entries are
    /// skipped; a pattern with no usable entry yields `None`.
    pub fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        if pattern.eq_ignore_ascii_case(ALL_DAYS) {
            return Some(DaysSpec::All);
        }

        let mut days: Vec<u32> = pattern
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .filter_map(|d| d.parse().ok())
            .collect();
        if days.is_empty() {
            return None;
        }
        days.sort_unstable();
        days.dedup();
        Some(DaysSpec::Days(days))
    }

    pub fn from_days(days: impl IntoIterator<Item = u32>) -> Self {
        let mut days: Vec<u32> = days.into_iter().collect();
        days.sort_unstable();
        days.dedup();
        DaysSpec::Days(days)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, DaysSpec::All)
    }

    /// `<s1;s2;...>-<days>` for a group of stations, `None` when the group is
    /// empty.
    pub fn scope_stations(&self, stations: &StationSet) -> Option<String> {
        if stations.is_empty() {
            return None;
        }
        Some(format!("{}-{}", stations, self))
    }
}

impl fmt::Display for DaysSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysSpec::All => f.write_str(ALL_DAYS),
            DaysSpec::Days(days) => {
                for (i, day) in days.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", SEPARATOR)?;
                    }
                    write!(f, "{}", day)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DaysSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DaysSpec::All => serializer.serialize_str(ALL_DAYS),
            DaysSpec::Days(days) => serializer.collect_seq(days),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DaysSpec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Days(Vec<u32>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => DaysSpec::parse(&text)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid day list: {text:?}"))),
            Raw::Days(days) => Ok(DaysSpec::from_days(days)),
        }
    }
}

/// Days (or instants) selected for one station.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationScope {
    #[cfg_attr(feature = "serde", serde(rename = "station_id"))]
    pub station: u64,
    pub days: DaysSpec,
}

impl StationScope {
    pub fn all_days(station: u64) -> Self {
        Self {
            station,
            days: DaysSpec::All,
        }
    }
}

impl fmt::Display for StationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.station, self.days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::parse_station_set;

    #[test]
    fn station_scope_renders() {
        assert_eq!(StationScope::all_days(12).to_string(), "12-all");
        let scope = StationScope {
            station: 3,
            days: DaysSpec::from_days([5, 1, 5]),
        };
        assert_eq!(scope.to_string(), "3-1;5");
    }

    #[test]
    fn parse_days_pattern() {
        assert_eq!(DaysSpec::parse(" all "), Some(DaysSpec::All));
        assert_eq!(
            DaysSpec::parse("4; 2;x;4"),
            Some(DaysSpec::Days(vec![2, 4]))
        );
        assert_eq!(DaysSpec::parse(";;"), None);
    }

    #[test]
    fn station_group_scope() {
        let stations = parse_station_set("7 2");
        assert_eq!(
            DaysSpec::All.scope_stations(&stations).as_deref(),
            Some("2;7-all")
        );
        assert_eq!(DaysSpec::All.scope_stations(&StationSet::new()), None);
    }
}
