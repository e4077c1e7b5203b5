//! Context creation, listing, updates and import/export.

use std::path::Path;

use chrono::{DateTime, Utc};

use bs_context::{
    ArtifactKind, ArtifactListing, ContextStore, ContextUpdate, SimulationContext, apply,
    load_json, load_yaml, save_json, save_yaml,
};
use bs_core::{effective_output_delta, parse_delta_from_run_id};

use crate::error::{AppError, AppResult};
use crate::settings::Settings;

/// Summary of a context for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSummary {
    pub run_id: String,
    pub sim_name: String,
    pub city: String,
    pub delta: u32,
    pub artifact_count: usize,
    pub favorite_count: usize,
    pub last_modified: DateTime<Utc>,
}

impl From<&SimulationContext> for ContextSummary {
    fn from(ctx: &SimulationContext) -> Self {
        let favorite_count = ctx
            .ui_state
            .as_ref()
            .map_or(0, |ui| ui.favorite_map_ids.len() + ui.favorite_graph_ids.len());
        Self {
            run_id: ctx.meta.run_id.clone(),
            sim_name: ctx.meta.sim_name.clone(),
            city: ctx.infrastructure.city.clone(),
            delta: ctx.config.parameters.delta,
            artifact_count: ctx.all_artifacts().len(),
            favorite_count,
            last_modified: ctx.meta.last_modified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

fn file_format(path: &Path) -> AppResult<FileFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => Ok(FileFormat::Json),
        Some("yaml" | "yml") => Ok(FileFormat::Yaml),
        _ => Err(AppError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

pub fn open_store(settings: &Settings) -> AppResult<ContextStore> {
    Ok(ContextStore::new(settings.context_dir.clone())?)
}

pub fn list_contexts(store: &ContextStore) -> AppResult<Vec<ContextSummary>> {
    Ok(store.list()?.iter().map(ContextSummary::from).collect())
}

pub fn show_context(store: &ContextStore, run_id: &str) -> AppResult<SimulationContext> {
    Ok(store.load(run_id)?)
}

/// Slot length for a new run: explicit value, then the `D<n>` tag in the run
/// id, then the configured default.
pub fn resolve_delta(run_id: &str, explicit: Option<u32>, settings: &Settings) -> AppResult<u32> {
    match explicit {
        Some(0) => Err(AppError::InvalidInput("delta must be positive".to_string())),
        Some(delta) => Ok(delta),
        None => Ok(parse_delta_from_run_id(run_id).unwrap_or(settings.default_delta)),
    }
}

pub fn create_context(
    store: &ContextStore,
    settings: &Settings,
    run_id: &str,
    delta: Option<u32>,
    now: DateTime<Utc>,
) -> AppResult<SimulationContext> {
    if store.has(run_id) {
        return Err(AppError::ContextExists(run_id.to_string()));
    }
    let mut context = SimulationContext::for_run(run_id, now);
    context.config.parameters.delta = resolve_delta(run_id, delta, settings)?;
    store.save(&context)?;
    Ok(context)
}

/// Load, apply one update, persist, and return the result.
pub fn update_context(
    store: &ContextStore,
    run_id: &str,
    update: ContextUpdate,
    now: DateTime<Utc>,
) -> AppResult<SimulationContext> {
    let context = apply(store.load(run_id)?, update, now);
    store.save(&context)?;
    Ok(context)
}

/// Toggle a favourite after checking the artifact exists. Returns the new
/// favourite state.
pub fn toggle_favorite(
    store: &ContextStore,
    run_id: &str,
    artifact_id: &str,
    now: DateTime<Utc>,
) -> AppResult<bool> {
    let context = store.load(run_id)?;
    let kind = context
        .find_artifact(artifact_id)
        .map(|a| a.kind)
        .ok_or_else(|| AppError::InvalidInput(format!("no artifact {artifact_id} in {run_id}")))?;
    if !matches!(kind, ArtifactKind::Map | ArtifactKind::Video | ArtifactKind::Graph) {
        return Err(AppError::InvalidInput(format!(
            "{kind} artifacts cannot be favourites"
        )));
    }

    let update = ContextUpdate::ToggleFavorite {
        kind,
        id: artifact_id.to_string(),
    };
    let context = apply(context, update, now);
    store.save(&context)?;
    Ok(context.is_favorite(kind, artifact_id))
}

pub fn export_context(store: &ContextStore, run_id: &str, path: &Path) -> AppResult<()> {
    let format = file_format(path)?;
    let context = store.load(run_id)?;
    match format {
        FileFormat::Json => save_json(path, &context)?,
        FileFormat::Yaml => save_yaml(path, &context)?,
    }
    tracing::info!(%run_id, path = %path.display(), "context exported");
    Ok(())
}

/// Import a context file into the store. Returns the imported run id.
pub fn import_context(store: &ContextStore, path: &Path, replace: bool) -> AppResult<String> {
    if !path.exists() {
        return Err(AppError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        });
    }
    let context = match file_format(path)? {
        FileFormat::Json => load_json(path)?,
        FileFormat::Yaml => load_yaml(path)?,
    };

    let run_id = context.meta.run_id.clone();
    if !replace && store.has(&run_id) {
        return Err(AppError::ContextExists(run_id));
    }
    store.save(&context)?;
    Ok(run_id)
}

/// Read a backend results listing: a JSON array of result entries.
pub fn read_listing(path: &Path) -> AppResult<Vec<ArtifactListing>> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| {
        AppError::InvalidInput(format!("invalid results listing {}: {e}", path.display()))
    })
}

/// Add listed results to a context, replacing entries with the same id.
/// Returns the number of entries registered.
pub fn register_artifacts(
    store: &ContextStore,
    run_id: &str,
    listing: Vec<ArtifactListing>,
    now: DateTime<Utc>,
) -> AppResult<usize> {
    let mut context = store.load(run_id)?;
    let count = listing.len();
    for item in listing {
        context = apply(context, ContextUpdate::AddArtifact(item.into()), now);
    }
    store.save(&context)?;
    tracing::info!(%run_id, count, "artifacts registered");
    Ok(count)
}

pub fn delete_context(store: &ContextStore, run_id: &str) -> AppResult<()> {
    if !store.has(run_id) {
        return Err(AppError::ContextNotFound(run_id.to_string()));
    }
    Ok(store.delete(run_id)?)
}

/// Delta used to address analysis output for a context.
///
/// The input delta comes from the simulation summary when present, else the
/// run id tag, else the configured parameters. An advanced delta value
/// overrides it.
pub fn output_delta(context: &SimulationContext) -> u32 {
    let input = context
        .results
        .summary
        .as_ref()
        .and_then(|s| s.input_delta())
        .or_else(|| parse_delta_from_run_id(&context.meta.run_id))
        .unwrap_or(context.config.parameters.delta);

    match context.config.advanced.as_ref().and_then(|a| a.delta_value) {
        Some(value) => effective_output_delta(input, true, &value.to_string()),
        None => input,
    }
}
