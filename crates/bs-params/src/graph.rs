//! Graph arguments.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bs_core::scope::ALL_DAYS;
use bs_core::{DateRange, DaysSpec, StationScope, dates_inclusive};

use crate::{ParamsError, ParamsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GraphKind {
    #[serde(rename = "graf_barras_est_med")]
    StationBarsMean,
    #[serde(rename = "graf_barras_est_acum")]
    StationBarsAccumulated,
    #[serde(rename = "graf_barras_dia")]
    DayHistogram,
    #[serde(rename = "graf_linea_comp_est")]
    StationComparison,
    #[serde(rename = "graf_linea_comp_mats")]
    MatrixComparison,
}

impl GraphKind {
    pub const ALL: [GraphKind; 5] = [
        GraphKind::StationBarsMean,
        GraphKind::StationBarsAccumulated,
        GraphKind::DayHistogram,
        GraphKind::StationComparison,
        GraphKind::MatrixComparison,
    ];

    /// Request key, also the backend's name for the chart.
    pub fn key(self) -> &'static str {
        match self {
            GraphKind::StationBarsMean => "graf_barras_est_med",
            GraphKind::StationBarsAccumulated => "graf_barras_est_acum",
            GraphKind::DayHistogram => "graf_barras_dia",
            GraphKind::StationComparison => "graf_linea_comp_est",
            GraphKind::MatrixComparison => "graf_linea_comp_mats",
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GraphKind {
    type Err = ParamsError;

    fn from_str(s: &str) -> ParamsResult<Self> {
        GraphKind::ALL
            .into_iter()
            .find(|k| k.key() == s.trim())
            .ok_or_else(|| ParamsError::Unknown {
                what: "graph kind",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AggregationMode {
    /// Mean.
    #[default]
    #[serde(rename = "M")]
    Mean,
    /// Accumulated.
    #[serde(rename = "A")]
    Accumulated,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregationMode::Mean => "M",
            AggregationMode::Accumulated => "A",
        })
    }
}

impl FromStr for AggregationMode {
    type Err = ParamsError;

    fn from_str(s: &str) -> ParamsResult<Self> {
        match s.trim() {
            "M" | "m" => Ok(AggregationMode::Mean),
            "A" | "a" => Ok(AggregationMode::Accumulated),
            other => Err(ParamsError::Unknown {
                what: "aggregation mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Raw text inputs of the graph form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphParams {
    pub bar_stations: String,
    pub bar_days: String,

    pub day_days: String,
    pub day_mode: AggregationMode,
    pub day_frequency: bool,

    pub line_stations: String,
    /// `all`, one pattern for every station, or `#`-separated patterns.
    pub line_days: String,

    pub mats_delta: String,
    pub mats_stations_1: String,
    pub mats_stations_2: String,
    pub mats_mode: AggregationMode,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            bar_stations: "87;212".to_string(),
            bar_days: ALL_DAYS.to_string(),
            day_days: ALL_DAYS.to_string(),
            day_mode: AggregationMode::Mean,
            day_frequency: true,
            line_stations: "87;212".to_string(),
            line_days: ALL_DAYS.to_string(),
            mats_delta: "60".to_string(),
            mats_stations_1: "87;212".to_string(),
            mats_stations_2: "0;1".to_string(),
            mats_mode: AggregationMode::Mean,
        }
    }
}

/// A graph argument is either a compact string or a per-station day list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphArg {
    Text(String),
    StationDays(Vec<StationScope>),
}

impl GraphArg {
    pub fn to_value(&self) -> ParamsResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<String> for GraphArg {
    fn from(s: String) -> Self {
        GraphArg::Text(s)
    }
}

fn non_empty(raw: &str) -> Option<&str> {
    let t = raw.trim();
    (!t.is_empty()).then_some(t)
}

fn numbers<T: FromStr>(raw: &str) -> Vec<T> {
    raw.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse().ok())
        .collect()
}

/// Pair each station with its day pattern.
///
/// Station order is kept as typed. A single pattern applies to every station;
/// otherwise the pattern count must match the station count.
pub fn build_station_days(stations: &str, days_pattern: &str) -> Option<Vec<StationScope>> {
    let stations: Vec<u64> = numbers(non_empty(stations)?);
    let pattern = non_empty(days_pattern)?;
    if stations.is_empty() {
        return None;
    }

    if pattern == ALL_DAYS {
        return Some(stations.into_iter().map(StationScope::all_days).collect());
    }

    let parts: Vec<&str> = pattern
        .split('#')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let patterns: Vec<&str> = match parts.as_slice() {
        [single] if stations.len() > 1 => vec![*single; stations.len()],
        _ if parts.len() == stations.len() => parts,
        _ => {
            tracing::debug!(
                stations = stations.len(),
                patterns = parts.len(),
                "day pattern count does not match station count"
            );
            return None;
        }
    };

    let specs: Vec<StationScope> = stations
        .into_iter()
        .zip(patterns)
        .filter_map(|(station, p)| {
            let days = if p == ALL_DAYS {
                DaysSpec::All
            } else {
                let days: Vec<u32> = numbers(p);
                if days.is_empty() {
                    return None;
                }
                DaysSpec::from_days(days)
            };
            Some(StationScope { station, days })
        })
        .collect();

    (!specs.is_empty()).then_some(specs)
}

/// Build the argument for one chart, or `None` when its inputs are
/// incomplete.
pub fn build_graph_arg(kind: GraphKind, params: &GraphParams) -> Option<GraphArg> {
    match kind {
        GraphKind::StationBarsMean | GraphKind::StationBarsAccumulated => {
            let stations = non_empty(&params.bar_stations)?;
            let days = non_empty(&params.bar_days).unwrap_or(ALL_DAYS);
            Some(format!("{stations}-{days}").into())
        }
        GraphKind::DayHistogram => {
            let days = non_empty(&params.day_days).unwrap_or(ALL_DAYS);
            let freq = if params.day_frequency { "-Frec" } else { "" };
            Some(format!("{days}-{}{freq}", params.day_mode).into())
        }
        GraphKind::StationComparison => {
            build_station_days(&params.line_stations, &params.line_days).map(GraphArg::StationDays)
        }
        GraphKind::MatrixComparison => {
            let delta = non_empty(&params.mats_delta)?;
            let first = non_empty(&params.mats_stations_1)?;
            let second = non_empty(&params.mats_stations_2)?;
            Some(format!("{delta}-{first}-{second}-{}", params.mats_mode).into())
        }
    }
}

/// One-click chart over a set of stations, every day.
pub fn quick_graph_arg(kind: GraphKind, stations: &[u64]) -> Option<GraphArg> {
    if stations.is_empty() {
        return None;
    }
    if kind == GraphKind::StationComparison {
        return Some(GraphArg::StationDays(
            stations.iter().copied().map(StationScope::all_days).collect(),
        ));
    }
    let ids: Vec<String> = stations.iter().map(u64::to_string).collect();
    Some(format!("{}-{ALL_DAYS}", ids.join(";")).into())
}

/// Day-of-month numbers of every date in the range, `all` without one.
pub fn encode_range_as_day_list(range: Option<DateRange>) -> String {
    let Some(range) = range else {
        return ALL_DAYS.to_string();
    };
    let days: Vec<String> = dates_inclusive(range.start, range.end)
        .into_iter()
        .map(|d| d.day().to_string())
        .collect();
    if days.is_empty() {
        return ALL_DAYS.to_string();
    }
    days.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn bar_and_day_charts() {
        let params = GraphParams {
            bar_days: " ".into(),
            day_days: "1;2".into(),
            day_mode: AggregationMode::Accumulated,
            ..GraphParams::default()
        };
        assert_eq!(
            build_graph_arg(GraphKind::StationBarsMean, &params),
            Some(GraphArg::Text("87;212-all".into()))
        );
        assert_eq!(
            build_graph_arg(GraphKind::DayHistogram, &params),
            Some(GraphArg::Text("1;2-A-Frec".into()))
        );

        let params = GraphParams {
            day_frequency: false,
            bar_stations: "".into(),
            ..params
        };
        assert_eq!(
            build_graph_arg(GraphKind::DayHistogram, &params),
            Some(GraphArg::Text("1;2-A".into()))
        );
        assert_eq!(build_graph_arg(GraphKind::StationBarsAccumulated, &params), None);
    }

    #[test]
    fn matrix_comparison_requires_all_parts() {
        let params = GraphParams::default();
        assert_eq!(
            build_graph_arg(GraphKind::MatrixComparison, &params),
            Some(GraphArg::Text("60-87;212-0;1-M".into()))
        );
        let params = GraphParams { mats_stations_2: "".into(), ..params };
        assert_eq!(build_graph_arg(GraphKind::MatrixComparison, &params), None);
    }

    #[test]
    fn station_days_patterns() {
        let all = build_station_days("87;212", "all").unwrap();
        assert_eq!(all, vec![StationScope::all_days(87), StationScope::all_days(212)]);

        let broadcast = build_station_days("5;3", "2;1").unwrap();
        assert_eq!(broadcast[0].days, DaysSpec::from_days([1, 2]));
        assert_eq!(broadcast[1].station, 3);

        let paired = build_station_days("5;3", "1#all").unwrap();
        assert_eq!(paired[0].days, DaysSpec::from_days([1]));
        assert!(paired[1].days.is_all());

        assert_eq!(build_station_days("5;3;7", "1#2"), None);
        assert_eq!(build_station_days("", "all"), None);
        assert_eq!(build_station_days("x;y", "all"), None);
    }

    #[test]
    fn station_days_serialise_like_the_backend_model() {
        let arg = build_graph_arg(
            GraphKind::StationComparison,
            &GraphParams {
                line_stations: "87;212".into(),
                line_days: "all#4;5".into(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            arg.to_value().unwrap(),
            json!([{"station_id": 87, "days": "all"}, {"station_id": 212, "days": [4, 5]}])
        );
    }

    #[test]
    fn quick_graphs() {
        assert_eq!(quick_graph_arg(GraphKind::StationBarsMean, &[]), None);
        assert_eq!(
            quick_graph_arg(GraphKind::StationBarsMean, &[3, 9]),
            Some(GraphArg::Text("3;9-all".into()))
        );
        assert_eq!(
            quick_graph_arg(GraphKind::StationComparison, &[3]),
            Some(GraphArg::StationDays(vec![StationScope::all_days(3)]))
        );
    }

    #[test]
    fn range_day_list_uses_day_of_month() {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        assert_eq!(encode_range_as_day_list(None), "all");
        assert_eq!(
            encode_range_as_day_list(Some(DateRange {
                start: d(1, 30),
                end: d(2, 2),
            })),
            "30;31;1;2"
        );
        assert_eq!(
            encode_range_as_day_list(Some(DateRange {
                start: d(2, 2),
                end: d(1, 30),
            })),
            "all"
        );
    }

    #[test]
    fn kinds_parse_from_keys() {
        for kind in GraphKind::ALL {
            assert_eq!(kind.key().parse::<GraphKind>().unwrap(), kind);
        }
        assert!("graf_nope".parse::<GraphKind>().is_err());
        assert_eq!(
            serde_json::to_value(GraphKind::DayHistogram).unwrap(),
            json!("graf_barras_dia")
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn join<T: ToString>(values: &[T]) -> String {
        values.iter().map(T::to_string).collect::<Vec<_>>().join(";")
    }

    proptest! {
        #[test]
        fn station_days_keep_order_and_survive_serde(
            stations in prop::collection::vec(0_u64..10_000, 1..6),
            days in prop::collection::vec(1_u32..32, 1..5),
        ) {
            let scopes = build_station_days(&join(&stations), &join(&days)).unwrap();
            let order: Vec<u64> = scopes.iter().map(|s| s.station).collect();
            prop_assert_eq!(order, stations);

            let value = serde_json::to_value(&scopes).unwrap();
            let back: Vec<StationScope> = serde_json::from_value(value).unwrap();
            prop_assert_eq!(back, scopes);
        }

        #[test]
        fn quick_arg_covers_every_day(stations in prop::collection::vec(0_u64..500, 1..6)) {
            let arg = quick_graph_arg(GraphKind::StationBarsMean, &stations).unwrap();
            let GraphArg::Text(text) = arg else {
                panic!("bar chart argument should be text");
            };
            prop_assert!(text.ends_with("-all"));
        }
    }
}
