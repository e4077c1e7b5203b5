//! Runtime settings read from the environment.

use std::path::PathBuf;

pub const API_BASE_VAR: &str = "BIKESIM_API_BASE";
pub const DELTA_VAR: &str = "BIKESIM_DELTA";
pub const HOME_VAR: &str = "BIKESIM_HOME";

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_DELTA: u32 = 15;
pub const DEFAULT_HOME: &str = ".bikesim/contexts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Backend base URL, without a trailing slash.
    pub api_base: String,
    /// Slot length used when nothing else decides it.
    pub default_delta: u32,
    /// Root of the context store.
    pub context_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            default_delta: DEFAULT_DELTA,
            context_dir: PathBuf::from(DEFAULT_HOME),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source. Blank or invalid values fall
    /// back to the defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Settings::default();

        if let Some(raw) = lookup(API_BASE_VAR) {
            let trimmed = raw.trim().trim_end_matches('/');
            if trimmed.is_empty() {
                tracing::warn!(var = API_BASE_VAR, "blank value, using default");
            } else {
                settings.api_base = trimmed.to_string();
            }
        }

        if let Some(raw) = lookup(DELTA_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(delta) if delta > 0 => settings.default_delta = delta,
                _ => tracing::warn!(
                    var = DELTA_VAR,
                    value = %raw,
                    default = DEFAULT_DELTA,
                    "expected a positive integer, using default"
                ),
            }
        }

        if let Some(raw) = lookup(HOME_VAR) {
            if raw.trim().is_empty() {
                tracing::warn!(var = HOME_VAR, "blank value, using default");
            } else {
                settings.context_dir = PathBuf::from(raw.trim());
            }
        }

        tracing::debug!(?settings, "settings resolved");
        settings
    }

    /// Endpoint that accepts analysis payloads.
    pub fn analysis_url(&self) -> String {
        format!("{}/exe/analizar-json", self.api_base)
    }

    /// Endpoint that launches a simulation.
    pub fn simulation_url(&self) -> String {
        format!("{}/exe/simular-json", self.api_base)
    }

    /// Endpoint that subtracts one result folder from another.
    pub fn subtraction_url(&self) -> String {
        format!("{}/exe/restar-directorios", self.api_base)
    }
}
