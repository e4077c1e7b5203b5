//! Map arguments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ParamsError, ParamsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MapKind {
    #[serde(rename = "mapa_densidad")]
    Density,
    #[serde(rename = "mapa_voronoi")]
    Voronoi,
    #[serde(rename = "mapa_circulo")]
    Circle,
    #[serde(rename = "mapa_desplazamientos")]
    Displacement,
}

impl MapKind {
    pub const ALL: [MapKind; 4] = [
        MapKind::Density,
        MapKind::Voronoi,
        MapKind::Circle,
        MapKind::Displacement,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MapKind::Density => "mapa_densidad",
            MapKind::Voronoi => "mapa_voronoi",
            MapKind::Circle => "mapa_circulo",
            MapKind::Displacement => "mapa_desplazamientos",
        }
    }

    /// Whether the map accepts an explicit station subset.
    pub fn supports_stations(self) -> bool {
        matches!(self, MapKind::Density | MapKind::Voronoi | MapKind::Circle)
    }

    pub fn supports_labels(self) -> bool {
        self == MapKind::Circle
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MapKind {
    type Err = ParamsError;

    fn from_str(s: &str) -> ParamsResult<Self> {
        MapKind::ALL
            .into_iter()
            .find(|k| k.key() == s.trim())
            .ok_or_else(|| ParamsError::Unknown {
                what: "map kind",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Movement {
    /// Bikes returned.
    #[serde(rename = "1")]
    Entries,
    /// Bikes taken.
    #[serde(rename = "-1")]
    Exits,
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Movement::Entries => "1",
            Movement::Exits => "-1",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripKind {
    #[serde(rename = "1")]
    Real,
    #[serde(rename = "0")]
    Fictional,
}

impl fmt::Display for TripKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TripKind::Real => "1",
            TripKind::Fictional => "0",
        })
    }
}

/// Density, Voronoi and circle maps: instants plus optional stations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotMap {
    pub instants: String,
    pub stations: String,
    pub labels: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplacementMap {
    pub instants: String,
    pub delta_origin: String,
    pub delta_destination: String,
    pub movement: Option<Movement>,
    pub trip_kind: Option<TripKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapSpec {
    Snapshot(SnapshotMap),
    Displacement(DisplacementMap),
}

fn non_empty(raw: &str) -> Option<&str> {
    let t = raw.trim();
    (!t.is_empty()).then_some(t)
}

impl SnapshotMap {
    fn render(&self, kind: MapKind, use_filter: bool) -> Option<String> {
        let mut spec = non_empty(&self.instants)?.to_string();

        // With a filter active the backend picks the stations itself.
        if kind.supports_stations()
            && !use_filter
            && let Some(stations) = non_empty(&self.stations)
        {
            spec.push('+');
            spec.push_str(stations);
        }
        if kind.supports_labels() && self.labels {
            spec.push_str("-L");
        }
        Some(spec)
    }
}

impl DisplacementMap {
    fn render(&self) -> Option<String> {
        let instants = non_empty(&self.instants)?;
        let origin = non_empty(&self.delta_origin)?;
        let destination = non_empty(&self.delta_destination)?;
        let movement = self.movement?;
        let trip_kind = self.trip_kind?;
        Some(format!("{instants};{origin};{destination};{movement};{trip_kind}"))
    }
}

/// Render the backend argument for one map.
///
/// `Ok(None)` means the form is incomplete. A spec of the wrong shape for
/// `kind` is an error.
pub fn build_map_arg(
    kind: MapKind,
    spec: &MapSpec,
    use_filter: bool,
) -> ParamsResult<Option<String>> {
    match (kind, spec) {
        (MapKind::Displacement, MapSpec::Displacement(d)) => Ok(d.render()),
        (MapKind::Displacement, MapSpec::Snapshot(_)) | (_, MapSpec::Displacement(_)) => {
            Err(ParamsError::InvalidValue {
                field: kind.key().to_string(),
                value: format!("{spec:?}"),
                reason: "map spec does not match map kind".to_string(),
            })
        }
        (_, MapSpec::Snapshot(s)) => Ok(s.render(kind, use_filter)),
    }
}
