//! Context validation logic.

use crate::schema::{ArtifactKind, ArtifactMap, SimulationContext};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Artifact key mismatch in {section}: key {key} holds artifact {id}")]
    KeyMismatch {
        section: String,
        key: String,
        id: String,
    },

    #[error("Artifact {id} of kind {kind} stored in {section}")]
    WrongSection {
        section: String,
        id: String,
        kind: ArtifactKind,
    },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_context(context: &SimulationContext) -> Result<(), ValidationError> {
    let params = &context.config.parameters;

    if params.delta == 0 {
        return Err(invalid("config.parameters.delta", params.delta, "must be positive"));
    }
    if !(0.0..=100.0).contains(&params.stress) {
        return Err(invalid("config.parameters.stress", params.stress, "must be within 0..=100"));
    }
    if !(0.0..=100.0).contains(&params.walk_cost) {
        return Err(invalid(
            "config.parameters.walkCost",
            params.walk_cost,
            "must be within 0..=100",
        ));
    }
    if params.stress_type > 3 {
        return Err(invalid(
            "config.parameters.stressType",
            params.stress_type,
            "must be within 0..=3",
        ));
    }
    if let Some(advanced) = &context.config.advanced
        && advanced.delta_value == Some(0)
    {
        return Err(invalid("config.advanced.deltaValue", 0, "must be positive"));
    }

    let artifacts = &context.artifacts;
    validate_section("maps", &artifacts.maps, &[ArtifactKind::Map, ArtifactKind::Video])?;
    validate_section("graphs", &artifacts.graphs, &[ArtifactKind::Graph])?;
    validate_section("filters", &artifacts.filters, &[ArtifactKind::Filter])?;
    validate_section("matrices", &artifacts.matrices, &[ArtifactKind::Matrix])?;

    Ok(())
}

fn validate_section(
    section: &str,
    map: &ArtifactMap,
    kinds: &[ArtifactKind],
) -> Result<(), ValidationError> {
    for (key, artifact) in map.entries() {
        if key != artifact.id {
            return Err(ValidationError::KeyMismatch {
                section: section.to_string(),
                key: key.to_string(),
                id: artifact.id.clone(),
            });
        }
        if !kinds.contains(&artifact.kind) {
            return Err(ValidationError::WrongSection {
                section: section.to_string(),
                id: artifact.id.clone(),
                kind: artifact.kind,
            });
        }
    }
    Ok(())
}
