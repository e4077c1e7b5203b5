//! Payloads for launching a simulation and for subtracting two result
//! folders.

use serde::Serialize;
use serde_json::Value;

use crate::{ParamsError, ParamsResult};

/// Body of the simulate endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub simname: String,
    /// Percentage, 0 to 100.
    pub stress: f64,
    /// Percentage, 0 to 100.
    pub walk_cost: f64,
    /// Slot length in minutes.
    pub delta: u32,
    /// 0 to 3.
    pub stress_type: u8,
    /// Folder holding the uploaded input CSVs.
    #[serde(rename = "ruta_entrada")]
    pub input_folder: String,
    /// Empty lets the backend name the run folder.
    #[serde(rename = "ruta_salida")]
    pub output_folder: String,
    /// Day list to simulate; `null` simulates every day.
    #[serde(rename = "dias")]
    pub days: Option<String>,
}

impl SimulationRequest {
    /// Request with the dashboard's default parameters.
    pub fn new(simname: impl Into<String>, input_folder: impl Into<String>) -> Self {
        Self {
            simname: simname.into(),
            stress: 0.0,
            walk_cost: 100.0,
            delta: 15,
            stress_type: 0,
            input_folder: input_folder.into(),
            output_folder: String::new(),
            days: None,
        }
    }

    pub fn validate(&self) -> ParamsResult<()> {
        if self.simname.trim().is_empty() {
            return Err(invalid("simname", "", "simulation name is required"));
        }
        if self.input_folder.trim().is_empty() {
            return Err(invalid("ruta_entrada", "", "input folder is required"));
        }
        if self.delta == 0 {
            return Err(invalid("delta", "0", "delta must be positive"));
        }
        for (field, value) in [("stress", self.stress), ("walk_cost", self.walk_cost)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(field, &value.to_string(), "must be within 0..=100"));
            }
        }
        if self.stress_type > 3 {
            return Err(invalid(
                "stress_type",
                &self.stress_type.to_string(),
                "must be within 0..=3",
            ));
        }
        Ok(())
    }

    pub fn to_payload(&self) -> ParamsResult<Value> {
        self.validate()?;
        let mut payload = serde_json::to_value(self)?;
        if let Some(days) = self.days.as_deref().map(str::trim) {
            payload["dias"] = if days.is_empty() { Value::Null } else { days.into() };
        }
        Ok(payload)
    }
}

/// Body of the folder subtraction endpoint: `folder1 - folder2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtractionRequest {
    pub folder1: String,
    pub folder2: String,
    /// Name of the resulting run; the backend derives one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simname: Option<String>,
}

impl SubtractionRequest {
    pub fn new(folder1: impl Into<String>, folder2: impl Into<String>) -> Self {
        Self {
            folder1: folder1.into(),
            folder2: folder2.into(),
            simname: None,
        }
    }

    /// Blank names are treated as unset.
    pub fn with_name(mut self, name: &str) -> Self {
        let name = name.trim();
        self.simname = (!name.is_empty()).then(|| name.to_string());
        self
    }

    pub fn validate(&self) -> ParamsResult<()> {
        for (field, folder) in [("folder1", &self.folder1), ("folder2", &self.folder2)] {
            if folder.trim().is_empty() {
                return Err(invalid(field, "", "both simulations must be selected"));
            }
        }
        if self.folder1 == self.folder2 {
            return Err(invalid(
                "folder2",
                &self.folder2,
                "select two different simulations",
            ));
        }
        Ok(())
    }

    pub fn to_payload(&self) -> ParamsResult<Value> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ParamsError {
    ParamsError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn simulate_payload_uses_backend_field_names() {
        let mut req = SimulationRequest::new("weekend", "./uploads/abc");
        req.stress = 50.0;
        req.walk_cost = 50.0;
        req.delta = 60;
        req.stress_type = 2;

        assert_eq!(
            req.to_payload().unwrap(),
            json!({
                "simname": "weekend",
                "stress": 50.0,
                "walk_cost": 50.0,
                "delta": 60,
                "stress_type": 2,
                "ruta_entrada": "./uploads/abc",
                "ruta_salida": "",
                "dias": null,
            })
        );
    }

    #[test]
    fn simulate_days_blank_means_all() {
        let mut req = SimulationRequest::new("s", "./in");
        req.days = Some("  ".into());
        assert_eq!(req.to_payload().unwrap()["dias"], Value::Null);

        req.days = Some("0;1;2".into());
        assert_eq!(req.to_payload().unwrap()["dias"], "0;1;2");
    }

    #[test]
    fn simulate_rejects_bad_parameters() {
        let base = SimulationRequest::new("s", "./in");
        assert!(base.validate().is_ok());

        let cases = [
            SimulationRequest {
                simname: " ".into(),
                ..base.clone()
            },
            SimulationRequest {
                input_folder: String::new(),
                ..base.clone()
            },
            SimulationRequest {
                delta: 0,
                ..base.clone()
            },
            SimulationRequest {
                stress: 101.0,
                ..base.clone()
            },
            SimulationRequest {
                walk_cost: -1.0,
                ..base.clone()
            },
            SimulationRequest {
                stress_type: 4,
                ..base.clone()
            },
        ];
        for req in cases {
            assert!(req.to_payload().is_err(), "{req:?}");
        }
    }

    #[test]
    fn subtraction_payload_omits_blank_name() {
        let req = SubtractionRequest::new("run_a", "run_b").with_name("  ");
        assert_eq!(
            req.to_payload().unwrap(),
            json!({"folder1": "run_a", "folder2": "run_b"})
        );

        let req = req.with_name(" diff ");
        assert_eq!(req.to_payload().unwrap()["simname"], "diff");
    }

    #[test]
    fn subtraction_needs_two_different_folders() {
        assert!(SubtractionRequest::new("a", "a").validate().is_err());
        assert!(SubtractionRequest::new("", "b").validate().is_err());
        assert!(SubtractionRequest::new("a", " ").validate().is_err());
    }
}
