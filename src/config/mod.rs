//! Configuration loading and management for the payroll engine.
//!
//! Statutory rates are legislated and change periodically, so every figure
//! the calculator uses (PAYE bands, personal relief, the NHIF table, the NSSF
//! model, the housing levy rate) comes from YAML files rather than code.
//! Rate files are effective-dated; [`RateProvider::rates_for`] picks the set
//! in force on a pay date.
//!
//! # Example
//!
//! ```no_run
//! use kenya_payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/kenya").unwrap();
//! println!("Loaded schedule: {}", config.schedule().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AccrualMethod, DeductionCatalog, DeductionType, HousingLevyConfig, LeavePolicy,
    LeaveTypePolicy, NhifBracketRow, NhifTable, NssfScheme, PayeBand, PayeConfig,
    PayrollConfig, PensionableBasis, RateProvider, ScheduleMetadata, StatutoryRates, TaxBracket,
    TaxSchedule,
};
