//! In-memory repositories.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::leave::{approve, reject, submit_validated, validate_application};
use crate::models::{Employee, LeaveApplication, LeaveBalance, LeaveRequest, LeaveType};

use super::{EmployeeRepository, LeaveBalanceRepository, LeaveRequestRepository};

/// `HashMap`-backed [`EmployeeRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeRepository {
    employees: HashMap<String, Employee>,
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn get(&self, id: &str) -> EngineResult<Employee> {
        self.employees
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::EmployeeNotFound { id: id.to_string() })
    }

    fn list(&self) -> Vec<Employee> {
        let mut employees: Vec<Employee> = self.employees.values().cloned().collect();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        employees
    }

    fn upsert(&mut self, employee: Employee) {
        self.employees.insert(employee.id.clone(), employee);
    }

    fn remove(&mut self, id: &str) -> EngineResult<Employee> {
        self.employees
            .remove(id)
            .ok_or_else(|| EngineError::EmployeeNotFound { id: id.to_string() })
    }
}

/// `HashMap`-backed [`LeaveBalanceRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaveBalanceRepository {
    balances: HashMap<(String, LeaveType), LeaveBalance>,
}

impl LeaveBalanceRepository for InMemoryLeaveBalanceRepository {
    fn get(&self, employee_id: &str, leave_type: LeaveType) -> EngineResult<LeaveBalance> {
        self.balances
            .get(&(employee_id.to_string(), leave_type))
            .cloned()
            .ok_or_else(|| EngineError::BalanceNotFound {
                employee_id: employee_id.to_string(),
                leave_type,
            })
    }

    fn list_for_employee(&self, employee_id: &str) -> Vec<LeaveBalance> {
        let mut balances: Vec<LeaveBalance> = self
            .balances
            .values()
            .filter(|b| b.employee_id() == employee_id)
            .cloned()
            .collect();
        balances.sort_by_key(|b| b.leave_type());
        balances
    }

    fn upsert(&mut self, balance: LeaveBalance) {
        self.balances.insert(
            (balance.employee_id().to_string(), balance.leave_type()),
            balance,
        );
    }
}

/// `HashMap`-backed [`LeaveRequestRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaveRequestRepository {
    requests: HashMap<Uuid, LeaveRequest>,
}

impl LeaveRequestRepository for InMemoryLeaveRequestRepository {
    fn get(&self, id: Uuid) -> EngineResult<LeaveRequest> {
        self.requests
            .get(&id)
            .cloned()
            .ok_or(EngineError::LeaveRequestNotFound { id })
    }

    fn list_for_employee(&self, employee_id: &str) -> Vec<LeaveRequest> {
        let mut requests: Vec<LeaveRequest> = self
            .requests
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.submitted_at);
        requests
    }

    fn insert(&mut self, request: LeaveRequest) -> EngineResult<()> {
        if self.requests.contains_key(&request.id) {
            return Err(EngineError::invalid_input(
                "id",
                format!("leave request {} already exists", request.id),
            ));
        }
        self.requests.insert(request.id, request);
        Ok(())
    }

    fn update(&mut self, request: LeaveRequest) -> EngineResult<()> {
        match self.requests.get_mut(&request.id) {
            Some(existing) => {
                *existing = request;
                Ok(())
            }
            None => Err(EngineError::LeaveRequestNotFound { id: request.id }),
        }
    }
}

/// The three in-memory repositories together, with the leave workflow
/// wired through them.
///
/// Callers that share a store between threads must serialize access to it;
/// the HTTP server holds it behind a single mutex.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Employee records.
    pub employees: InMemoryEmployeeRepository,
    /// Leave balances.
    pub balances: InMemoryLeaveBalanceRepository,
    /// Leave requests.
    pub requests: InMemoryLeaveRequestRepository,
}

impl MemoryStore {
    /// Returns an employee's leave balances, or `EmployeeNotFound`.
    pub fn leave_balances(&self, employee_id: &str) -> EngineResult<Vec<LeaveBalance>> {
        self.employees.get(employee_id)?;
        Ok(self.balances.list_for_employee(employee_id))
    }

    /// Submits an application against the employee's current balance and
    /// stores the resulting `Pending` request.
    pub fn submit_leave(
        &mut self,
        application: &LeaveApplication,
        submitted_at: DateTime<Utc>,
    ) -> EngineResult<LeaveRequest> {
        self.employees.get(&application.employee_id)?;
        let validated = validate_application(application, submitted_at)?;
        let balance = self
            .balances
            .get(&validated.employee_id, validated.leave_type)?;

        let request = submit_validated(validated, &balance, submitted_at)?;
        self.requests.insert(request.clone())?;
        Ok(request)
    }

    /// Approves a stored request and consumes the employee's balance.
    pub fn approve_leave(
        &mut self,
        id: Uuid,
        approver: &str,
        approved_at: DateTime<Utc>,
    ) -> EngineResult<LeaveRequest> {
        let request = self.requests.get(id)?;
        let approved = approve(&request, approver, approved_at, &mut self.balances)?;
        self.requests.update(approved.clone())?;
        Ok(approved)
    }

    /// Rejects a stored request.
    pub fn reject_leave(
        &mut self,
        id: Uuid,
        approver: &str,
        reason: &str,
        rejected_at: DateTime<Utc>,
    ) -> EngineResult<LeaveRequest> {
        let request = self.requests.get(id)?;
        let rejected = reject(&request, approver, reason, rejected_at)?;
        self.requests.update(rejected.clone())?;
        Ok(rejected)
    }
}
