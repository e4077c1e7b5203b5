//! Context storage API.
//!
//! One directory per run id, each holding a `context.json`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::SimulationContext;
use crate::validate::validate_context;
use crate::{ContextError, ContextResult};

const CONTEXT_FILE: &str = "context.json";

#[derive(Clone, Debug)]
pub struct ContextStore {
    root_dir: PathBuf,
}

fn check_run_id(run_id: &str) -> ContextResult<()> {
    let reason = if run_id.trim().is_empty() {
        Some("empty")
    } else if run_id.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if run_id == "." || run_id == ".." {
        Some("reserved name")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ContextError::InvalidRunId {
            run_id: run_id.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

impl ContextStore {
    pub fn new(root_dir: PathBuf) -> ContextResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn context_path(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id).join(CONTEXT_FILE)
    }

    pub fn has(&self, run_id: &str) -> bool {
        check_run_id(run_id).is_ok() && self.context_path(run_id).exists()
    }

    pub fn save(&self, context: &SimulationContext) -> ContextResult<()> {
        let run_id = &context.meta.run_id;
        check_run_id(run_id)?;
        validate_context(context)?;

        let run_dir = self.root_dir.join(run_id);
        fs::create_dir_all(&run_dir)?;
        let json = serde_json::to_string_pretty(context)?;
        fs::write(run_dir.join(CONTEXT_FILE), json)?;

        tracing::info!(%run_id, dir = %run_dir.display(), "context saved");
        Ok(())
    }

    pub fn load(&self, run_id: &str) -> ContextResult<SimulationContext> {
        check_run_id(run_id)?;
        let path = self.context_path(run_id);
        if !path.exists() {
            return Err(ContextError::NotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let context: SimulationContext = serde_json::from_str(&content)?;
        validate_context(&context)?;
        Ok(context)
    }

    /// Every readable context, most recently modified first. Unreadable
    /// entries are skipped with a warning.
    pub fn list(&self) -> ContextResult<Vec<SimulationContext>> {
        let mut contexts = Vec::new();

        if !self.root_dir.exists() {
            return Ok(contexts);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().to_string();
            if !self.context_path(&run_id).exists() {
                continue;
            }
            match self.load(&run_id) {
                Ok(context) => contexts.push(context),
                Err(err) => tracing::warn!(%run_id, error = %err, "skipping unreadable context"),
            }
        }

        contexts.sort_by(|a, b| {
            b.meta
                .last_modified
                .cmp(&a.meta.last_modified)
                .then_with(|| a.meta.run_id.cmp(&b.meta.run_id))
        });
        Ok(contexts)
    }

    /// Remove a run's context directory. Missing runs are not an error.
    pub fn delete(&self, run_id: &str) -> ContextResult<()> {
        check_run_id(run_id)?;
        let run_dir = self.root_dir.join(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(&run_dir)?;
            tracing::info!(%run_id, "context deleted");
        }
        Ok(())
    }
}
