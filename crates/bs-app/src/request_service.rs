//! Analysis requests assembled from a stored context.

use bs_context::{DeltaMode, SimulationContext};
use bs_params::{
    AnalysisRequest, FilterConfig, GraphKind, GraphParams, MapKind, MapSpec, SimulationRequest,
};

use crate::error::{AppError, AppResult};

/// One map or chart to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisTarget {
    Map(MapKind, MapSpec),
    Graph(GraphKind, GraphParams),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub matrix: Option<i32>,
    pub filter: Option<FilterConfig>,
    pub filter_maps: bool,
    pub filter_graphs: bool,
}

/// Build the request for `targets` using the context's folders and advanced
/// delta. Any incomplete target fails the whole request.
pub fn build_analysis_request(
    context: &SimulationContext,
    options: &RequestOptions,
    targets: &[AnalysisTarget],
) -> AppResult<AnalysisRequest> {
    let config = &context.config;
    let advanced = config.advanced.clone().unwrap_or_default();

    let mut request = AnalysisRequest {
        input_folder: advanced
            .custom_input_folder
            .clone()
            .unwrap_or_else(|| config.input_folder.clone()),
        output_folder: advanced
            .custom_output_folder
            .clone()
            .unwrap_or_else(|| config.output_folder.clone()),
        matrix: options.matrix,
        filter: options.filter.clone(),
        use_filter_for_maps: options.filter_maps,
        use_filter_for_graphs: options.filter_graphs,
        ..AnalysisRequest::default()
    };

    match (advanced.delta_mode, advanced.delta_value) {
        (Some(DeltaMode::Acumulada), Some(v)) => request.delta_accumulated = Some(v),
        (_, Some(v)) => request.delta_mean = Some(v),
        (_, None) => {}
    }

    let mut incomplete = Vec::new();
    for target in targets {
        match target {
            AnalysisTarget::Map(kind, spec) => {
                if !request.add_map(*kind, spec)? {
                    incomplete.push(kind.key());
                }
            }
            AnalysisTarget::Graph(kind, params) => {
                if !request.add_graph(*kind, params) {
                    incomplete.push(kind.key());
                }
            }
        }
    }
    if !incomplete.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "incomplete parameters for {}",
            incomplete.join(", ")
        )));
    }

    request.validate()?;
    Ok(request)
}

/// Build the launch request for a context's parameters.
///
/// The simulation name falls back to the run id. The output folder is left
/// empty unless the advanced config names one.
pub fn build_simulation_request(context: &SimulationContext) -> AppResult<SimulationRequest> {
    let config = &context.config;
    let params = &config.parameters;
    let advanced = config.advanced.clone().unwrap_or_default();

    let simname = match context.meta.sim_name.trim() {
        "" => context.meta.run_id.clone(),
        name => name.to_string(),
    };
    let request = SimulationRequest {
        simname,
        stress: params.stress,
        walk_cost: params.walk_cost,
        delta: params.delta,
        stress_type: params.stress_type,
        input_folder: advanced
            .custom_input_folder
            .unwrap_or_else(|| config.input_folder.clone()),
        output_folder: advanced.custom_output_folder.unwrap_or_default(),
        days: params.dias.clone(),
    };

    request.validate()?;
    Ok(request)
}
