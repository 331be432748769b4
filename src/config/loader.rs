//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the statutory
//! rate schedule, deduction catalogue and leave policy from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::LeaveType;

use super::types::{
    DeductionCatalog, DeductionType, LeavePolicy, LeaveTypePolicy, PayrollConfig, RateProvider,
    ScheduleMetadata, StatutoryRates,
};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/kenya/
/// ├── schedule.yaml         # Jurisdiction metadata
/// ├── deduction_types.yaml  # Deduction catalogue and tolerance
/// ├── leave_policy.yaml     # Entitlement and accrual per leave type
/// └── rates/
///     └── 2023-07-01.yaml   # Statutory rates effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use kenya_payroll_engine::config::{ConfigLoader, RateProvider};
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/kenya").unwrap();
/// let rates = loader.rates_for(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()).unwrap();
/// println!("Housing levy rate: {}", rates.housing_levy.rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or fails the structural checks on rates, deductions or leave policy.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kenya_payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/kenya")?;
    /// # Ok::<(), kenya_payroll_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ScheduleMetadata>(&path.join("schedule.yaml"))?;

        let deductions = Self::load_yaml::<DeductionCatalog>(&path.join("deduction_types.yaml"))?;
        deductions.validate()?;

        let leave_policy = Self::load_yaml::<LeavePolicy>(&path.join("leave_policy.yaml"))?;
        leave_policy.validate()?;

        let rates = Self::load_rates(&path.join("rates"))?;

        debug!(
            schedule = %metadata.code,
            rate_sets = rates.len(),
            deduction_types = deductions.deduction_types.len(),
            "Loaded payroll configuration"
        );

        Ok(Self {
            config: PayrollConfig::new(metadata, rates, deductions, leave_policy),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<StatutoryRates>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut rates: Vec<StatutoryRates> = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let rate_set = Self::load_yaml::<StatutoryRates>(&path)?;
                rate_set.validate().map_err(|e| EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                if rates
                    .iter()
                    .any(|r| r.effective_date == rate_set.effective_date)
                {
                    return Err(EngineError::invalid_config(format!(
                        "two rate files are effective from {}",
                        rate_set.effective_date
                    )));
                }
                rates.push(rate_set);
            }
        }

        if rates.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(rates)
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the schedule metadata.
    pub fn schedule(&self) -> &ScheduleMetadata {
        self.config.schedule()
    }

    /// Returns the deduction catalogue.
    pub fn deductions(&self) -> &DeductionCatalog {
        self.config.deductions()
    }

    /// Gets a deduction type by its code.
    ///
    /// Returns `UnknownDeductionType` if the code is not in the catalogue.
    pub fn get_deduction_type(&self, code: &str) -> EngineResult<&DeductionType> {
        self.config.deductions().get(code)
    }

    /// Returns the leave policy.
    pub fn leave_policy(&self) -> &LeavePolicy {
        self.config.leave_policy()
    }

    /// Gets the policy for one leave type.
    pub fn get_leave_policy(&self, leave_type: LeaveType) -> EngineResult<&LeaveTypePolicy> {
        self.config.leave_policy().policy_for(leave_type)
    }
}

impl RateProvider for ConfigLoader {
    /// Finds the most recent rate set effective on or before `date`.
    fn rates_for(&self, date: NaiveDate) -> EngineResult<&StatutoryRates> {
        self.config.rates_for(date)
    }
}
