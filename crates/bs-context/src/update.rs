//! The single entry point for changing a context.
//!
//! Every change goes through [`apply`], which also stamps
//! `meta.last_modified`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::*;
use crate::summary::SimulationSummary;

/// Partial update, merged section by section. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextPatch {
    pub meta: Option<MetaPatch>,
    pub config: Option<ConfigPatch>,
    pub infrastructure: Option<InfrastructurePatch>,
    pub results: Option<ResultsPatch>,
    pub artifacts: Option<ArtifactsPatch>,
    pub ui_state: Option<UiStatePatch>,
}

/// The run id is the storage key and cannot be patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaPatch {
    pub sim_name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub input_folder: Option<String>,
    pub output_folder: Option<String>,
    pub parameters: Option<SimulationParameters>,
    pub advanced: Option<AdvancedConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InfrastructurePatch {
    pub city: Option<String>,
    pub num_bikes: Option<u32>,
    pub num_stations: Option<u32>,
    pub stations: Option<Vec<StationInfo>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultsPatch {
    pub summary: Option<SimulationSummary>,
    pub metrics: Option<PerformanceMetrics>,
    pub raw_data: Option<serde_json::Value>,
}

/// Whole sections are replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactsPatch {
    pub maps: Option<ArtifactMap>,
    pub graphs: Option<ArtifactMap>,
    pub filters: Option<ArtifactMap>,
    pub matrices: Option<ArtifactMap>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UiStatePatch {
    pub view_mode: Option<ViewMode>,
    pub sidebar_open: Option<bool>,
    pub favorite_map_ids: Option<std::collections::BTreeSet<String>>,
    pub favorite_graph_ids: Option<std::collections::BTreeSet<String>>,
}

/// Library search and filter controls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchState {
    pub text: Option<String>,
    pub kind: Option<String>,
    pub format: Option<String>,
    pub only_favorites: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContextUpdate {
    Merge(ContextPatch),
    /// Stored in the section matching the artifact's kind.
    AddArtifact(AnalysisArtifact),
    RemoveArtifact { kind: ArtifactKind, id: String },
    /// Maps (and videos) and graphs keep favourites.
    ToggleFavorite { kind: ArtifactKind, id: String },
    Select {
        kind: ArtifactKind,
        id: Option<String>,
    },
    SetSearch(SearchState),
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn merge(context: &mut SimulationContext, patch: ContextPatch) {
    if let Some(meta) = patch.meta {
        set(&mut context.meta.sim_name, meta.sim_name);
        if meta.version.is_some() {
            context.meta.version = meta.version;
        }
    }
    if let Some(config) = patch.config {
        set(&mut context.config.input_folder, config.input_folder);
        set(&mut context.config.output_folder, config.output_folder);
        set(&mut context.config.parameters, config.parameters);
        if config.advanced.is_some() {
            context.config.advanced = config.advanced;
        }
    }
    if let Some(infra) = patch.infrastructure {
        let target = &mut context.infrastructure;
        set(&mut target.city, infra.city);
        set(&mut target.num_bikes, infra.num_bikes);
        set(&mut target.num_stations, infra.num_stations);
        if infra.stations.is_some() {
            target.stations = infra.stations;
        }
    }
    if let Some(results) = patch.results {
        let target = &mut context.results;
        if results.summary.is_some() {
            target.summary = results.summary;
        }
        if results.metrics.is_some() {
            target.metrics = results.metrics;
        }
        if results.raw_data.is_some() {
            target.raw_data = results.raw_data;
        }
    }
    if let Some(artifacts) = patch.artifacts {
        let target = &mut context.artifacts;
        set(&mut target.maps, artifacts.maps);
        set(&mut target.graphs, artifacts.graphs);
        set(&mut target.filters, artifacts.filters);
        set(&mut target.matrices, artifacts.matrices);
    }
    if let Some(ui) = patch.ui_state {
        let target = context.ui_state.get_or_insert_with(UiState::default);
        if ui.view_mode.is_some() {
            target.view_mode = ui.view_mode;
        }
        if ui.sidebar_open.is_some() {
            target.sidebar_open = ui.sidebar_open;
        }
        set(&mut target.favorite_map_ids, ui.favorite_map_ids);
        set(&mut target.favorite_graph_ids, ui.favorite_graph_ids);
    }
}

fn selection_slot(ui: &mut UiState, kind: ArtifactKind) -> Option<&mut Option<String>> {
    match kind {
        ArtifactKind::Map | ArtifactKind::Video => Some(&mut ui.selected_map_id),
        ArtifactKind::Graph => Some(&mut ui.selected_graph_id),
        ArtifactKind::Filter => Some(&mut ui.selected_filter_id),
        ArtifactKind::Matrix => None,
    }
}

fn favorite_set(
    ui: &mut UiState,
    kind: ArtifactKind,
) -> Option<&mut std::collections::BTreeSet<String>> {
    match kind {
        ArtifactKind::Map | ArtifactKind::Video => Some(&mut ui.favorite_map_ids),
        ArtifactKind::Graph => Some(&mut ui.favorite_graph_ids),
        ArtifactKind::Filter | ArtifactKind::Matrix => None,
    }
}

/// Apply one update and return the new context.
pub fn apply(
    mut context: SimulationContext,
    update: ContextUpdate,
    now: DateTime<Utc>,
) -> SimulationContext {
    match update {
        ContextUpdate::Merge(patch) => merge(&mut context, patch),
        ContextUpdate::AddArtifact(artifact) => {
            tracing::debug!(id = %artifact.id, kind = %artifact.kind, "add artifact");
            context.artifacts.section_mut(artifact.kind).insert(artifact);
        }
        ContextUpdate::RemoveArtifact { kind, id } => {
            if context.artifacts.section_mut(kind).remove(&id).is_none() {
                tracing::warn!(%id, %kind, "artifact not present");
            }
            if let Some(ui) = context.ui_state.as_mut() {
                if let Some(favs) = favorite_set(ui, kind) {
                    favs.remove(&id);
                }
                if let Some(slot) = selection_slot(ui, kind)
                    && slot.as_deref() == Some(id.as_str())
                {
                    *slot = None;
                }
            }
        }
        ContextUpdate::ToggleFavorite { kind, id } => {
            let ui = context.ui_state.get_or_insert_with(UiState::default);
            let now_favorite = match favorite_set(ui, kind) {
                Some(favs) => {
                    let added = !favs.remove(&id);
                    if added {
                        favs.insert(id.clone());
                    }
                    Some(added)
                }
                None => {
                    tracing::warn!(%id, %kind, "favourites are kept for maps and graphs only");
                    None
                }
            };
            if let Some(flag) = now_favorite
                && let Some(artifact) = context.artifacts.section_mut(kind).get_mut(&id)
            {
                artifact.favorite = Some(flag);
            }
        }
        ContextUpdate::Select { kind, id } => {
            let ui = context.ui_state.get_or_insert_with(UiState::default);
            match selection_slot(ui, kind) {
                Some(slot) => *slot = id,
                None => tracing::warn!(%kind, "selection is not tracked for this kind"),
            }
        }
        ContextUpdate::SetSearch(search) => {
            let ui = context.ui_state.get_or_insert_with(UiState::default);
            ui.search_text = search.text;
            ui.kind_filter = search.kind;
            ui.format_filter = search.format;
            ui.only_favorites = search.only_favorites;
        }
    }

    context.meta.last_modified = now;
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn artifact(id: &str, kind: ArtifactKind) -> AnalysisArtifact {
        AnalysisArtifact {
            id: id.to_string(),
            name: id.to_string(),
            display_name: id.to_string(),
            kind,
            format: ArtifactFormat::Json,
            url: String::new(),
            api_url: None,
            created: String::new(),
            metadata: serde_json::Map::new(),
            size: None,
            favorite: None,
        }
    }

    #[test]
    fn merge_is_shallow_per_section() {
        let ctx = SimulationContext::for_run("r1", t0());
        let later = t0() + Duration::minutes(5);
        let patch = ContextPatch {
            config: Some(ConfigPatch {
                output_folder: Some("./out".into()),
                ..Default::default()
            }),
            infrastructure: Some(InfrastructurePatch {
                city: Some("Sevilla".into()),
                num_stations: Some(260),
                ..Default::default()
            }),
            ..Default::default()
        };

        let ctx = apply(ctx, ContextUpdate::Merge(patch), later);
        assert_eq!(ctx.config.input_folder, "./results/r1");
        assert_eq!(ctx.config.output_folder, "./out");
        assert_eq!(ctx.infrastructure.city, "Sevilla");
        assert_eq!(ctx.infrastructure.num_bikes, 0);
        assert_eq!(ctx.meta.created, t0());
        assert_eq!(ctx.meta.last_modified, later);
    }

    #[test]
    fn artifacts_route_by_kind() {
        let mut ctx = SimulationContext::empty(t0());
        for (id, kind) in [
            ("m", ArtifactKind::Map),
            ("g", ArtifactKind::Graph),
            ("f", ArtifactKind::Filter),
            ("x", ArtifactKind::Matrix),
            ("v", ArtifactKind::Video),
        ] {
            ctx = apply(ctx, ContextUpdate::AddArtifact(artifact(id, kind)), t0());
        }
        let ids: Vec<&str> = ctx.all_artifacts().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["m", "v", "g", "f", "x"]);
    }

    #[test]
    fn favourites_toggle_and_mirror_onto_artifact() {
        let ctx = SimulationContext::empty(t0());
        let ctx = apply(ctx, ContextUpdate::AddArtifact(artifact("g1", ArtifactKind::Graph)), t0());
        let toggle = || ContextUpdate::ToggleFavorite {
            kind: ArtifactKind::Graph,
            id: "g1".into(),
        };

        let ctx = apply(ctx, toggle(), t0());
        assert!(ctx.is_favorite(ArtifactKind::Graph, "g1"));
        assert_eq!(ctx.artifacts.graphs.get("g1").unwrap().favorite, Some(true));

        let ctx = apply(ctx, toggle(), t0());
        assert!(!ctx.is_favorite(ArtifactKind::Graph, "g1"));
        assert_eq!(ctx.artifacts.graphs.get("g1").unwrap().favorite, Some(false));
    }

    #[test]
    fn removal_clears_selection_and_favourite() {
        let mut ctx = SimulationContext::empty(t0());
        ctx = apply(ctx, ContextUpdate::AddArtifact(artifact("m1", ArtifactKind::Map)), t0());
        let favourite = ContextUpdate::ToggleFavorite {
            kind: ArtifactKind::Map,
            id: "m1".into(),
        };
        ctx = apply(ctx, favourite, t0());
        let select = ContextUpdate::Select {
            kind: ArtifactKind::Map,
            id: Some("m1".into()),
        };
        ctx = apply(ctx, select, t0());
        assert_eq!(ctx.ui_state.as_ref().unwrap().selected_map_id.as_deref(), Some("m1"));

        let remove = ContextUpdate::RemoveArtifact {
            kind: ArtifactKind::Map,
            id: "m1".into(),
        };
        ctx = apply(ctx, remove, t0());
        let ui = ctx.ui_state.as_ref().unwrap();
        assert!(ctx.artifacts.maps.is_empty());
        assert!(ui.favorite_map_ids.is_empty());
        assert_eq!(ui.selected_map_id, None);
    }

    #[test]
    fn search_replaces_all_controls() {
        let ctx = SimulationContext::empty(t0());
        let ctx = apply(
            ctx,
            ContextUpdate::SetSearch(SearchState {
                text: Some("densidad".into()),
                only_favorites: Some(true),
                ..Default::default()
            }),
            t0(),
        );
        let ui = ctx.ui_state.unwrap();
        assert_eq!(ui.search_text.as_deref(), Some("densidad"));
        assert_eq!(ui.kind_filter, None);
        assert_eq!(ui.only_favorites, Some(true));
    }

    #[test]
    fn patch_reads_from_camel_case_json() {
        let patch: ContextPatch = serde_json::from_str(
            r#"{"meta": {"simName": "Weekend"}, "config": {"parameters": {"delta": 30, "stress": 10, "walkCost": 50, "stressType": 2}}}"#,
        )
        .unwrap();
        let ctx = apply(SimulationContext::empty(t0()), ContextUpdate::Merge(patch), t0());
        assert_eq!(ctx.meta.sim_name, "Weekend");
        assert_eq!(ctx.config.parameters.delta, 30);
        assert_eq!(ctx.config.parameters.stress_type, 2);
    }
}
