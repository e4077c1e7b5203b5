//! Shared application service layer for bikesim.
//!
//! Front ends go through this crate for settings, context management and
//! request building so they report one error type.

pub mod context_service;
pub mod error;
pub mod request_service;
pub mod settings;

pub use context_service::{
    ContextSummary, create_context, delete_context, export_context, import_context,
    list_contexts, open_store, output_delta, read_listing, register_artifacts, show_context,
    toggle_favorite, update_context,
};
pub use error::{AppError, AppResult};
pub use request_service::{
    AnalysisTarget, RequestOptions, build_analysis_request, build_simulation_request,
};
pub use settings::Settings;
