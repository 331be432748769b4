//! Kenyan statutory payroll deductions and leave workflow.
//!
//! This crate computes PAYE, NHIF, NSSF and the Affordable Housing Levy from
//! effective-dated rate schedules, validates manually entered deductions,
//! and runs leave requests through submission and approval against an
//! injected balance store.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod leave;
pub mod models;
pub mod repository;
