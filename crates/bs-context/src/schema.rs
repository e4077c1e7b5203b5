//! Context schema definitions.
//!
//! Field names are camelCase on the wire so persisted contexts stay readable
//! by the dashboard.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::naming::pretty_artifact_name;
use crate::summary::SimulationSummary;

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationContext {
    pub meta: SimulationMeta,
    pub config: SimulationConfig,
    pub infrastructure: InfrastructureData,
    #[serde(default)]
    pub results: SimulationResults,
    #[serde(default)]
    pub artifacts: AnalysisArtifacts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_state: Option<UiState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationMeta {
    pub run_id: RunId,
    pub sim_name: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub input_folder: String,
    pub output_folder: String,
    pub parameters: SimulationParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    /// Slot length in minutes.
    pub delta: u32,
    /// Percentage, 0 to 100.
    pub stress: f64,
    /// Percentage, 0 to 100.
    pub walk_cost: f64,
    /// 0 to 3.
    pub stress_type: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dias: Option<String>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            delta: 15,
            stress: 0.0,
            walk_cost: 100.0,
            stress_type: 0,
            dias: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeltaMode {
    Media,
    Acumulada,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_mode: Option<DeltaMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_input_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_output_folder: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureData {
    pub city: String,
    pub num_bikes: u32,
    pub num_stations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stations: Option<Vec<StationInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationInfo {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SimulationSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PerformanceMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_occupancy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_occupancy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_utilization: Option<BTreeMap<u64, f64>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Graph,
    Map,
    Filter,
    Matrix,
    Video,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Graph => "graph",
            ArtifactKind::Map => "map",
            ArtifactKind::Filter => "filter",
            ArtifactKind::Matrix => "matrix",
            ArtifactKind::Video => "video",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Json,
    Html,
    Csv,
    Png,
    Mp4,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisArtifact {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub kind: ArtifactKind,
    pub format: ArtifactFormat,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default)]
    pub created: String,
    /// Free-form metadata reported by the backend.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

/// One entry of the backend's results listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ArtifactListing {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub kind: ArtifactKind,
    pub format: ArtifactFormat,
    pub url: String,
    #[serde(default)]
    pub api_full_url: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl From<ArtifactListing> for AnalysisArtifact {
    fn from(item: ArtifactListing) -> Self {
        let display_name = pretty_artifact_name(&item.name);
        Self {
            id: item.id.unwrap_or_else(|| item.name.clone()),
            name: item.name,
            display_name,
            kind: item.kind,
            format: item.format,
            url: item.url,
            api_url: item.api_full_url,
            created: item.created.unwrap_or_default(),
            metadata: item.meta.unwrap_or_default(),
            size: item.size,
            favorite: None,
        }
    }
}

/// Insertion-ordered artifact table, persisted as `[[id, artifact], ...]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ArtifactMap {
    entries: Vec<(String, AnalysisArtifact)>,
}

impl ArtifactMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the artifact's id, replacing in place.
    pub fn insert(&mut self, artifact: AnalysisArtifact) {
        match self.entries.iter_mut().find(|(k, _)| *k == artifact.id) {
            Some((_, slot)) => *slot = artifact,
            None => self.entries.push((artifact.id.clone(), artifact)),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<AnalysisArtifact> {
        let pos = self.entries.iter().position(|(k, _)| k == id)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn get(&self, id: &str) -> Option<&AnalysisArtifact> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, a)| a)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut AnalysisArtifact> {
        self.entries.iter_mut().find(|(k, _)| k == id).map(|(_, a)| a)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &AnalysisArtifact)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), a))
    }

    pub fn values(&self) -> impl Iterator<Item = &AnalysisArtifact> {
        self.entries.iter().map(|(_, a)| a)
    }
}

impl FromIterator<AnalysisArtifact> for ArtifactMap {
    fn from_iter<I: IntoIterator<Item = AnalysisArtifact>>(iter: I) -> Self {
        let mut map = ArtifactMap::new();
        for artifact in iter {
            map.insert(artifact);
        }
        map
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisArtifacts {
    #[serde(default)]
    pub maps: ArtifactMap,
    #[serde(default)]
    pub graphs: ArtifactMap,
    #[serde(default)]
    pub filters: ArtifactMap,
    #[serde(default)]
    pub matrices: ArtifactMap,
}

impl AnalysisArtifacts {
    /// Section an artifact of `kind` is stored in. Videos live with maps.
    pub fn section(&self, kind: ArtifactKind) -> &ArtifactMap {
        match kind {
            ArtifactKind::Map | ArtifactKind::Video => &self.maps,
            ArtifactKind::Graph => &self.graphs,
            ArtifactKind::Filter => &self.filters,
            ArtifactKind::Matrix => &self.matrices,
        }
    }

    pub fn section_mut(&mut self, kind: ArtifactKind) -> &mut ArtifactMap {
        match kind {
            ArtifactKind::Map | ArtifactKind::Video => &mut self.maps,
            ArtifactKind::Graph => &mut self.graphs,
            ArtifactKind::Filter => &mut self.filters,
            ArtifactKind::Matrix => &mut self.matrices,
        }
    }

    /// Sections with their names, in listing order.
    pub fn sections(&self) -> [(&'static str, &ArtifactMap); 4] {
        [
            ("maps", &self.maps),
            ("graphs", &self.graphs),
            ("filters", &self.filters),
            ("matrices", &self.matrices),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    List,
    Grid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_map_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_graph_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_filter_id: Option<String>,

    #[serde(default)]
    pub favorite_map_ids: BTreeSet<String>,
    #[serde(default)]
    pub favorite_graph_ids: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<ViewMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_open: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_favorites: Option<bool>,
}

impl SimulationContext {
    /// A blank context stamped with `now`.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            meta: SimulationMeta {
                run_id: String::new(),
                sim_name: String::new(),
                created: now,
                last_modified: now,
                version: None,
            },
            config: SimulationConfig {
                input_folder: String::new(),
                output_folder: String::new(),
                parameters: SimulationParameters::default(),
                advanced: None,
            },
            infrastructure: InfrastructureData::default(),
            results: SimulationResults::default(),
            artifacts: AnalysisArtifacts::default(),
            ui_state: Some(UiState::default()),
        }
    }

    /// Blank context for a run, reading and writing `./results/<run_id>`.
    pub fn for_run(run_id: &str, now: DateTime<Utc>) -> Self {
        let mut context = Self::empty(now);
        let folder = format!("./results/{run_id}");
        context.meta.run_id = run_id.to_string();
        context.meta.sim_name = run_id.to_string();
        context.config.input_folder = folder.clone();
        context.config.output_folder = folder;
        context
    }

    /// Maps, graphs, filters and matrices, in that order.
    pub fn all_artifacts(&self) -> Vec<&AnalysisArtifact> {
        self.artifacts
            .sections()
            .into_iter()
            .flat_map(|(_, section)| section.values())
            .collect()
    }

    pub fn find_artifact(&self, id: &str) -> Option<&AnalysisArtifact> {
        self.all_artifacts().into_iter().find(|a| a.id == id)
    }

    pub fn is_favorite(&self, kind: ArtifactKind, id: &str) -> bool {
        let Some(ui) = &self.ui_state else {
            return false;
        };
        match kind {
            ArtifactKind::Map | ArtifactKind::Video => ui.favorite_map_ids.contains(id),
            ArtifactKind::Graph => ui.favorite_graph_ids.contains(id),
            ArtifactKind::Filter | ArtifactKind::Matrix => false,
        }
    }
}
