//! bs-params: string and JSON parameters understood by the analysis backend.

pub mod absent;
pub mod filter;
pub mod graph;
pub mod map;
pub mod matrix;
pub mod request;
pub mod simulation;

pub use absent::Absent;
pub use filter::{
    FilterConfig, FilterKind, FilterOperator, UnifiedFilterState, build_filter,
    generate_days_list,
};
pub use graph::{
    AggregationMode, GraphArg, GraphKind, GraphParams, build_graph_arg, build_station_days,
    encode_range_as_day_list, quick_graph_arg,
};
pub use map::{DisplacementMap, MapKind, MapSpec, Movement, SnapshotMap, TripKind, build_map_arg};
pub use matrix::{EXTERNAL_MATRIX, MATRICES, Matrix, matrix_by_id};
pub use request::AnalysisRequest;
pub use simulation::{SimulationRequest, SubtractionRequest};

pub type ParamsResult<T> = Result<T, ParamsError>;

#[derive(thiserror::Error, Debug)]
pub enum ParamsError {
    #[error("Unknown {what}: {value}")]
    Unknown { what: &'static str, value: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Core error: {0}")]
    Core(#[from] bs_core::CoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
