//! Seed data for the in-memory store.
//!
//! A seed file lists employees and, optionally, explicit leave balances.
//! When `open_balances_as_of` is set, every employee also gets a balance for
//! each leave type in the policy that the file does not list, accrued from
//! 1 January of that date's year.

use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::debug;

use crate::config::LeavePolicy;
use crate::error::{EngineError, EngineResult};
use crate::leave::open_balance;
use crate::models::{Employee, LeaveBalance};

use super::{EmployeeRepository, LeaveBalanceRepository, MemoryStore};

/// Employees and balances to preload.
///
/// ```yaml
/// open_balances_as_of: "2024-03-01"
/// employees:
///   - id: emp_001
///     name: Wanjiku Kamau
///     employment_type: permanent
///     employment_start_date: "2021-02-01"
///     basic_salary: "120000"
///     allowances: "30000"
/// leave_balances:
///   - employee_id: emp_001
///     leave_type: annual
///     entitlement: "21"
///     used: "3"
///     carry_forward: "4"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// Date to accrue unlisted balances to.
    #[serde(default)]
    pub open_balances_as_of: Option<NaiveDate>,
    /// Employees to load.
    pub employees: Vec<Employee>,
    /// Explicit balances; these take precedence over opened ones.
    #[serde(default)]
    pub leave_balances: Vec<LeaveBalance>,
}

impl SeedData {
    /// Reads a seed file.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path_str = path.as_ref().display().to_string();

        let content = fs::read_to_string(path.as_ref()).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Builds a store from the seed.
    ///
    /// Fails with `EmployeeNotFound` if a balance names an employee the seed
    /// does not define.
    pub fn into_store(self, policy: &LeavePolicy) -> EngineResult<MemoryStore> {
        let mut store = MemoryStore::default();

        for employee in self.employees {
            store.employees.upsert(employee);
        }

        for balance in self.leave_balances {
            store.employees.get(balance.employee_id())?;
            store.balances.upsert(balance);
        }

        if let Some(as_of) = self.open_balances_as_of {
            let period_start = NaiveDate::from_ymd_opt(as_of.year(), 1, 1).ok_or_else(|| {
                EngineError::invalid_input("open_balances_as_of", "date out of range")
            })?;

            let mut leave_types: Vec<_> = policy.leave_types.keys().copied().collect();
            leave_types.sort();

            for employee in store.employees.list() {
                for &leave_type in &leave_types {
                    if store.balances.get(&employee.id, leave_type).is_ok() {
                        continue;
                    }
                    let balance =
                        open_balance(&employee, leave_type, policy, period_start, as_of, None)?;
                    store.balances.upsert(balance);
                }
            }
        }

        debug!(
            employees = store.employees.list().len(),
            "Seeded in-memory store"
        );

        Ok(store)
    }
}
