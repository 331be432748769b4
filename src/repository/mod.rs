//! Storage interfaces for employee and leave records.
//!
//! The leave workflow depends only on these traits. [`memory`] provides
//! `HashMap`-backed implementations and [`seed`] fills them from YAML.

pub mod memory;
pub mod seed;

use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Employee, LeaveBalance, LeaveRequest, LeaveType};

pub use memory::{
    InMemoryEmployeeRepository, InMemoryLeaveBalanceRepository, InMemoryLeaveRequestRepository,
    MemoryStore,
};
pub use seed::SeedData;

/// Employee records keyed by id.
pub trait EmployeeRepository {
    /// Returns the employee, or `EmployeeNotFound`.
    fn get(&self, id: &str) -> EngineResult<Employee>;

    /// Returns all employees ordered by id.
    fn list(&self) -> Vec<Employee>;

    /// Inserts or replaces an employee.
    fn upsert(&mut self, employee: Employee);

    /// Removes and returns an employee, or `EmployeeNotFound`.
    fn remove(&mut self, id: &str) -> EngineResult<Employee>;
}

/// Leave balances keyed by `(employee_id, leave_type)`.
pub trait LeaveBalanceRepository {
    /// Returns the balance, or `BalanceNotFound`.
    fn get(&self, employee_id: &str, leave_type: LeaveType) -> EngineResult<LeaveBalance>;

    /// Returns an employee's balances ordered by leave type.
    fn list_for_employee(&self, employee_id: &str) -> Vec<LeaveBalance>;

    /// Inserts or replaces a balance.
    fn upsert(&mut self, balance: LeaveBalance);
}

/// Leave requests keyed by id.
pub trait LeaveRequestRepository {
    /// Returns the request, or `LeaveRequestNotFound`.
    fn get(&self, id: Uuid) -> EngineResult<LeaveRequest>;

    /// Returns an employee's requests, oldest first.
    fn list_for_employee(&self, employee_id: &str) -> Vec<LeaveRequest>;

    /// Stores a new request. Fails with `InvalidInput` if the id is taken.
    fn insert(&mut self, request: LeaveRequest) -> EngineResult<()>;

    /// Replaces an existing request, or fails with `LeaveRequestNotFound`.
    fn update(&mut self, request: LeaveRequest) -> EngineResult<()>;
}
