//! JSON instance files.
//!
//! ```json
//! {
//!   "targets": [{"volume": 12, "pressure": 100, "max_pressure": 200}],
//!   "donors":  [{"volume": 12, "pressure": 232}],
//!   "config":  {"allow_early_stopping": true}
//! }
//! ```
//! Every `config` field is optional and falls back to the library default.

use anyhow::{Context, Result};
use pressure_opt::api::{State, StateCfg};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
    pub volume: f64,
    pub pressure: f64,
    pub max_pressure: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonorSpec {
    pub volume: f64,
    pub pressure: f64,
}

/// Partial `StateCfg`; missing fields keep the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CfgSpec {
    pub allow_early_stopping: Option<bool>,
    pub minimum_improvement_fraction: Option<f64>,
    pub upper_pressure_tolerance: Option<f64>,
    pub lower_pressure_tolerance: Option<f64>,
    pub max_num_of_donor_connections: Option<usize>,
    pub max_num_of_target_connections: Option<usize>,
}

impl CfgSpec {
    pub fn resolve(&self, base: StateCfg) -> StateCfg {
        StateCfg {
            allow_early_stopping: self.allow_early_stopping.unwrap_or(base.allow_early_stopping),
            minimum_improvement_fraction: self
                .minimum_improvement_fraction
                .unwrap_or(base.minimum_improvement_fraction),
            upper_pressure_tolerance: self
                .upper_pressure_tolerance
                .unwrap_or(base.upper_pressure_tolerance),
            lower_pressure_tolerance: self
                .lower_pressure_tolerance
                .unwrap_or(base.lower_pressure_tolerance),
            max_num_of_donor_connections: self
                .max_num_of_donor_connections
                .unwrap_or(base.max_num_of_donor_connections),
            max_num_of_target_connections: self
                .max_num_of_target_connections
                .unwrap_or(base.max_num_of_target_connections),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceFile {
    pub targets: Vec<TargetSpec>,
    pub donors: Vec<DonorSpec>,
    #[serde(default)]
    pub config: CfgSpec,
}

impl InstanceFile {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading instance {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing instance {}", path.display()))
    }

    /// Build the search state; `base` supplies config fields the file leaves out.
    pub fn into_state(self, base: StateCfg) -> Result<State> {
        let targets: Vec<_> = self
            .targets
            .iter()
            .map(|t| (t.volume, t.pressure, t.max_pressure))
            .collect();
        let donors: Vec<_> = self.donors.iter().map(|d| (d.volume, d.pressure)).collect();
        let state = State::with_cfg(&targets, &donors, self.config.resolve(base))?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_instance_with_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inst.json");
        fs::write(
            &path,
            r#"{
                "targets": [{"volume": 12, "pressure": 100, "max_pressure": 200}],
                "donors": [{"volume": 12, "pressure": 232}, {"volume": 10, "pressure": 300}],
                "config": {"allow_early_stopping": true, "max_num_of_donor_connections": 1}
            }"#,
        )
        .unwrap();
        let state = InstanceFile::read(&path)
            .unwrap()
            .into_state(StateCfg::default())
            .unwrap();
        assert_eq!(state.num_targets(), 1);
        assert_eq!(state.num_donors(), 2);
        assert!(state.cfg().allow_early_stopping);
        assert_eq!(state.cfg().max_num_of_donor_connections, 1);
        assert_eq!(state.cfg().max_num_of_target_connections, 3);
        assert_eq!(state.donors()[1].max_pressure, 300.0);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_cylinders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"targets": [], "donors": [], "colour": 1}"#).unwrap();
        assert!(InstanceFile::read(&path).is_err());

        fs::write(
            &path,
            r#"{"targets": [{"volume": -1, "pressure": 0, "max_pressure": 1}], "donors": []}"#,
        )
        .unwrap();
        let err = InstanceFile::read(&path)
            .unwrap()
            .into_state(StateCfg::default())
            .unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = InstanceFile::read(Path::new("/nonexistent/inst.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/inst.json"));
    }
}
