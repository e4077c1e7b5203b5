//! Unified filter form and its compiled backend string.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bs_core::day_offset;

use crate::{ParamsError, ParamsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    EstValor,
    EstValorDias,
    Horas,
    Porcentaje,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::EstValor,
        FilterKind::EstValorDias,
        FilterKind::Horas,
        FilterKind::Porcentaje,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            FilterKind::EstValor => "EstValor",
            FilterKind::EstValorDias => "EstValorDias",
            FilterKind::Horas => "Horas",
            FilterKind::Porcentaje => "Porcentaje",
        }
    }

    /// Request key used when the filter runs as its own analysis.
    pub fn standalone_key(self) -> &'static str {
        match self {
            FilterKind::EstValor => "filtrado_EstValor",
            FilterKind::EstValorDias => "filtrado_EstValorDias",
            FilterKind::Horas => "filtrado_Horas",
            FilterKind::Porcentaje => "filtrado_PorcentajeEstaciones",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FilterKind {
    type Err = ParamsError;

    fn from_str(s: &str) -> ParamsResult<Self> {
        FilterKind::ALL
            .into_iter()
            .find(|k| k.wire_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParamsError::Unknown {
                what: "filter kind",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterOperator {
    #[default]
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = "<=")]
    AtMost,
    #[serde(rename = ">")]
    Above,
    #[serde(rename = "<")]
    Below,
}

impl FilterOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            FilterOperator::AtLeast => ">=",
            FilterOperator::AtMost => "<=",
            FilterOperator::Above => ">",
            FilterOperator::Below => "<",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for FilterOperator {
    type Err = ParamsError;

    fn from_str(s: &str) -> ParamsResult<Self> {
        match s.trim() {
            ">=" => Ok(FilterOperator::AtLeast),
            "<=" => Ok(FilterOperator::AtMost),
            ">" => Ok(FilterOperator::Above),
            "<" => Ok(FilterOperator::Below),
            other => Err(ParamsError::Unknown {
                what: "filter operator",
                value: other.to_string(),
            }),
        }
    }
}

/// Form state shared by all filter kinds. Fields hold raw user text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedFilterState {
    pub operator: FilterOperator,
    pub value: String,
    pub day_pct: String,
    pub days: String,
    pub allowed_fail_days: String,
    pub stations_pct: String,
    pub stations_list: String,
}

impl Default for UnifiedFilterState {
    fn default() -> Self {
        Self {
            operator: FilterOperator::AtLeast,
            value: "65".to_string(),
            day_pct: "0".to_string(),
            days: "all".to_string(),
            allowed_fail_days: "5".to_string(),
            stations_pct: "0".to_string(),
            stations_list: String::new(),
        }
    }
}

/// A filter kind together with its form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub kind: FilterKind,
    #[serde(flatten)]
    pub state: UnifiedFilterState,
}

impl FilterConfig {
    pub fn compile(&self) -> Option<String> {
        build_filter(self.kind, &self.state)
    }
}

fn required(raw: &str) -> Option<&str> {
    let t = raw.trim();
    (!t.is_empty()).then_some(t)
}

/// Compile the backend filter string, or `None` when a required field is
/// blank.
///
/// ```
/// use bs_params::{FilterKind, UnifiedFilterState, build_filter};
///
/// let state = UnifiedFilterState { value: "65".into(), day_pct: "20".into(), ..Default::default() };
/// assert_eq!(build_filter(FilterKind::EstValor, &state).as_deref(), Some(">=65;20;all;5"));
/// ```
pub fn build_filter(kind: FilterKind, state: &UnifiedFilterState) -> Option<String> {
    let op = state.operator;
    let value = required(&state.value)?;

    match kind {
        FilterKind::EstValor | FilterKind::EstValorDias => {
            let day_pct = required(&state.day_pct)?;
            let fail = required(&state.allowed_fail_days)?;
            let days = required(&state.days).unwrap_or(bs_core::scope::ALL_DAYS);
            Some(format!("{op}{value};{day_pct};{days};{fail}"))
        }
        FilterKind::Horas => {
            let pct = required(&state.stations_pct)?;
            Some(format!("{op}{value};{pct}"))
        }
        FilterKind::Porcentaje => {
            let list = required(&state.stations_list)?;
            Some(format!("{op}{value}-{list}"))
        }
    }
}

/// Day offsets `0;1;...;n` covering `from..=to`, or `None` for a reversed
/// range.
pub fn generate_days_list(from: NaiveDate, to: NaiveDate) -> Option<String> {
    let span = day_offset(to, from);
    if span < 0 {
        return None;
    }
    let days: Vec<String> = (0..=span).map(|d| d.to_string()).collect();
    Some(days.join(";"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> UnifiedFilterState {
        UnifiedFilterState {
            operator: FilterOperator::AtLeast,
            value: " 65 ".into(),
            day_pct: "20".into(),
            days: "".into(),
            allowed_fail_days: "5".into(),
            stations_pct: "35".into(),
            stations_list: "1;15;26".into(),
        }
    }

    #[test]
    fn station_value_filters() {
        let s = state();
        assert_eq!(build_filter(FilterKind::EstValor, &s).as_deref(), Some(">=65;20;all;5"));

        let s = UnifiedFilterState {
            days: "0;3".into(),
            ..s
        };
        assert_eq!(
            build_filter(FilterKind::EstValorDias, &s).as_deref(),
            Some(">=65;20;0;3;5")
        );
    }

    #[test]
    fn hours_and_percentage_filters() {
        let s = UnifiedFilterState {
            operator: FilterOperator::Below,
            ..state()
        };
        assert_eq!(build_filter(FilterKind::Horas, &s).as_deref(), Some("<65;35"));
        assert_eq!(build_filter(FilterKind::Porcentaje, &s).as_deref(), Some("<65-1;15;26"));
    }

    #[test]
    fn missing_fields_yield_none() {
        let blank_value = UnifiedFilterState {
            value: "  ".into(),
            ..state()
        };
        for kind in FilterKind::ALL {
            assert_eq!(build_filter(kind, &blank_value), None);
        }

        let no_fail = UnifiedFilterState {
            allowed_fail_days: "".into(),
            ..state()
        };
        assert_eq!(build_filter(FilterKind::EstValor, &no_fail), None);
        assert!(build_filter(FilterKind::Horas, &no_fail).is_some());

        let no_list = UnifiedFilterState {
            stations_list: "".into(),
            ..state()
        };
        assert_eq!(build_filter(FilterKind::Porcentaje, &no_list), None);
    }

    #[test]
    fn operator_and_kind_parse() {
        assert_eq!("<=".parse::<FilterOperator>().unwrap(), FilterOperator::AtMost);
        assert!("=>".parse::<FilterOperator>().is_err());
        assert_eq!("horas".parse::<FilterKind>().unwrap(), FilterKind::Horas);
        assert_eq!(FilterKind::Porcentaje.standalone_key(), "filtrado_PorcentajeEstaciones");
    }

    #[test]
    fn state_uses_camel_case_json() {
        let json = serde_json::to_value(UnifiedFilterState::default()).unwrap();
        assert_eq!(json["operator"], ">=");
        assert_eq!(json["allowedFailDays"], "5");
        assert_eq!(json["stationsList"], "");
    }

    #[test]
    fn days_list() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        assert_eq!(generate_days_list(d(1), d(4)).as_deref(), Some("0;1;2;3"));
        assert_eq!(generate_days_list(d(5), d(5)).as_deref(), Some("0"));
        assert_eq!(generate_days_list(d(5), d(4)), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn compiled_filters_start_with_operator(
            value in 0_u32..1000,
            op in prop::sample::select(vec![
                FilterOperator::AtLeast,
                FilterOperator::AtMost,
                FilterOperator::Above,
                FilterOperator::Below,
            ]),
        ) {
            let state = UnifiedFilterState {
                operator: op,
                value: value.to_string(),
                stations_list: "1;2".into(),
                ..Default::default()
            };
            for kind in FilterKind::ALL {
                let compiled = build_filter(kind, &state).unwrap();
                let prefix = format!("{}{value}", op.symbol());
                prop_assert!(compiled.starts_with(&prefix), "{}", compiled);
            }
        }
    }
}
