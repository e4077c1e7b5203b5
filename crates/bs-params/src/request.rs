//! The flat JSON payload posted to the analysis endpoint.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::absent::Absent;
use crate::filter::FilterConfig;
use crate::graph::{GraphArg, GraphKind, GraphParams, build_graph_arg};
use crate::map::{MapKind, MapSpec, build_map_arg};
use crate::matrix::{EXTERNAL_MATRIX, matrix_by_id};
use crate::{ParamsError, ParamsResult};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisRequest {
    pub input_folder: String,
    pub output_folder: String,
    /// Matrix id from the catalogue; the external matrix when unset.
    pub matrix: Option<i32>,
    pub delta_mean: Option<u32>,
    pub delta_accumulated: Option<u32>,

    pub filter: Option<FilterConfig>,
    pub use_filter_for_maps: bool,
    pub use_filter_for_graphs: bool,
    /// Filter executed on its own, sent under the kind's `filtrado_*` key.
    pub standalone_filter: Option<FilterConfig>,

    pub maps: BTreeMap<MapKind, String>,
    pub graphs: BTreeMap<GraphKind, GraphArg>,
}

impl AnalysisRequest {
    /// Request reading and writing inside `./results/<run_id>`.
    pub fn for_run(run_id: &str) -> Self {
        let folder = format!("./results/{run_id}");
        Self {
            input_folder: folder.clone(),
            output_folder: folder,
            ..Self::default()
        }
    }

    fn filter_active(&self) -> bool {
        self.use_filter_for_maps || self.use_filter_for_graphs
    }

    /// Render and add a map. Returns whether the map was complete.
    pub fn add_map(&mut self, kind: MapKind, spec: &MapSpec) -> ParamsResult<bool> {
        match build_map_arg(kind, spec, self.use_filter_for_maps)? {
            Some(arg) => {
                self.maps.insert(kind, arg);
                Ok(true)
            }
            None => {
                tracing::warn!(map = %kind, "map parameters incomplete, skipped");
                Ok(false)
            }
        }
    }

    /// Render and add a chart. Returns whether the chart was complete.
    pub fn add_graph(&mut self, kind: GraphKind, params: &GraphParams) -> bool {
        match build_graph_arg(kind, params) {
            Some(arg) => {
                self.graphs.insert(kind, arg);
                true
            }
            None => {
                tracing::warn!(graph = %kind, "graph parameters incomplete, skipped");
                false
            }
        }
    }

    pub fn validate(&self) -> ParamsResult<()> {
        if let Some(id) = self.matrix
            && matrix_by_id(id).is_none()
        {
            return Err(ParamsError::Unknown {
                what: "matrix",
                value: id.to_string(),
            });
        }
        for (field, delta) in [
            ("delta_media", self.delta_mean),
            ("delta_acumulada", self.delta_accumulated),
        ] {
            if delta == Some(0) {
                return Err(ParamsError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                    reason: "delta must be positive".to_string(),
                });
            }
        }
        if self.filter_active() && self.filter.is_none() {
            return Err(ParamsError::InvalidValue {
                field: "filtro".to_string(),
                value: String::new(),
                reason: "filter enabled without a filter".to_string(),
            });
        }
        Ok(())
    }

    /// Build the JSON object. Unset deltas are omitted so the backend applies
    /// its own defaults.
    pub fn to_payload(&self) -> ParamsResult<Value> {
        self.validate()?;

        let mut out = Map::new();
        out.insert("input_folder".into(), self.input_folder.clone().into());
        out.insert("output_folder".into(), self.output_folder.clone().into());
        out.insert(
            "seleccion_agregacion".into(),
            self.matrix.unwrap_or(EXTERNAL_MATRIX).to_string().into(),
        );
        if let Some(d) = self.delta_mean {
            out.insert("delta_media".into(), d.into());
        }
        if let Some(d) = self.delta_accumulated {
            out.insert("delta_acumulada".into(), d.into());
        }

        if let Some(filter) = self.filter.as_ref().filter(|_| self.filter_active()) {
            out.insert("filtro".into(), Absent::FILTER.encode(filter.compile()));
            out.insert("tipo_filtro".into(), filter.kind.wire_name().into());
        }
        out.insert("use_filter_for_maps".into(), self.use_filter_for_maps.into());
        out.insert("use_filter_for_graphs".into(), self.use_filter_for_graphs.into());
        out.insert("filter_result_filename".into(), Value::Null);

        if let Some(standalone) = &self.standalone_filter {
            out.insert(
                standalone.kind.standalone_key().into(),
                Absent::FILTER.encode(standalone.compile()),
            );
        }

        for (kind, arg) in &self.maps {
            out.insert(kind.key().into(), arg.clone().into());
        }
        for (kind, arg) in &self.graphs {
            out.insert(kind.key().into(), arg.to_value()?);
        }

        Ok(Value::Object(out))
    }

    /// One request per chart, sharing everything else.
    pub fn split_per_graph(&self) -> Vec<AnalysisRequest> {
        self.graphs
            .iter()
            .map(|(kind, arg)| AnalysisRequest {
                maps: BTreeMap::new(),
                graphs: BTreeMap::from([(*kind, arg.clone())]),
                ..self.clone()
            })
            .collect()
    }
}
