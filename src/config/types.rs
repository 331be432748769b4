//! Configuration types for statutory rates, deductions and leave policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Structural rules that
//! serde cannot express (ascending brackets, contiguous NHIF rows, limits
//! that name a maximum) are checked by the `validate` methods, which the
//! loader runs before handing the configuration out.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionCategory, LeaveType, StatutoryComponent};

/// Metadata about the rate schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleMetadata {
    /// Jurisdiction code (e.g., "KE").
    pub code: String,
    /// The human-readable name of the schedule.
    pub name: String,
    /// The version of the schedule.
    pub version: String,
    /// URL to the official rate publication.
    pub source_url: String,
}

/// One PAYE band as written in configuration.
///
/// `upper_bound` is `None` for the open-ended top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeBand {
    /// Annual income at which this band ends.
    pub upper_bound: Option<Decimal>,
    /// Marginal rate applied within the band (0.30 = 30%).
    pub rate: Decimal,
}

/// A PAYE bracket with its derived lower bound and cumulative base tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBracket {
    /// Annual income at which the bracket starts (exclusive).
    pub lower_bound: Decimal,
    /// Annual income at which the bracket ends (inclusive), `None` for infinity.
    pub upper_bound: Option<Decimal>,
    /// Marginal rate.
    pub rate: Decimal,
    /// Tax due on income up to `lower_bound`.
    pub cumulative_base_tax: Decimal,
}

impl TaxBracket {
    /// Returns true if `income` falls in `(lower_bound, upper_bound]`.
    pub fn contains(&self, income: Decimal) -> bool {
        income > self.lower_bound && self.upper_bound.is_none_or(|upper| income <= upper)
    }

    /// Tax due on `income`, which must fall within the bracket.
    pub fn tax_on(&self, income: Decimal) -> Decimal {
        self.cumulative_base_tax + (income - self.lower_bound) * self.rate
    }
}

/// An ordered, contiguous progressive tax schedule.
///
/// Built from [`PayeBand`]s; each bracket's `cumulative_base_tax` is derived so
/// that editing one band never requires recomputing the others by hand.
///
/// # Example
///
/// ```
/// use kenya_payroll_engine::config::{PayeBand, TaxSchedule};
/// use rust_decimal::Decimal;
///
/// let schedule = TaxSchedule::from_bands(&[
///     PayeBand { upper_bound: Some(Decimal::from(100)), rate: Decimal::new(10, 2) },
///     PayeBand { upper_bound: None, rate: Decimal::new(20, 2) },
/// ]).unwrap();
///
/// assert_eq!(schedule.brackets()[1].cumulative_base_tax, Decimal::from(10));
/// assert_eq!(schedule.tax_on(Decimal::from(150)), Decimal::from(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PayeBand>", into = "Vec<PayeBand>")]
pub struct TaxSchedule {
    brackets: Vec<TaxBracket>,
}

impl TaxSchedule {
    /// Builds a schedule from ordered bands.
    ///
    /// Fails with `InvalidConfig` if there are no bands, bounds are not
    /// strictly ascending, an open-ended band is not last, the last band is
    /// bounded, or a rate lies outside `[0, 1]`.
    pub fn from_bands(bands: &[PayeBand]) -> EngineResult<Self> {
        if bands.is_empty() {
            return Err(EngineError::invalid_config("PAYE schedule has no bands"));
        }

        let mut brackets = Vec::with_capacity(bands.len());
        let mut lower_bound = Decimal::ZERO;
        let mut cumulative_base_tax = Decimal::ZERO;

        for (index, band) in bands.iter().enumerate() {
            let is_last = index == bands.len() - 1;

            if band.rate < Decimal::ZERO || band.rate > Decimal::ONE {
                return Err(EngineError::invalid_config(format!(
                    "PAYE band {} rate {} is outside [0, 1]",
                    index + 1,
                    band.rate
                )));
            }

            match band.upper_bound {
                None if !is_last => {
                    return Err(EngineError::invalid_config(format!(
                        "PAYE band {} is open-ended but is not the last band",
                        index + 1
                    )));
                }
                Some(_) if is_last => {
                    return Err(EngineError::invalid_config(
                        "last PAYE band must be open-ended (upper_bound: null)",
                    ));
                }
                Some(upper) if upper <= lower_bound => {
                    return Err(EngineError::invalid_config(format!(
                        "PAYE band {} upper bound {} is not above {}",
                        index + 1,
                        upper,
                        lower_bound
                    )));
                }
                _ => {}
            }

            brackets.push(TaxBracket {
                lower_bound,
                upper_bound: band.upper_bound,
                rate: band.rate,
                cumulative_base_tax,
            });

            if let Some(upper) = band.upper_bound {
                cumulative_base_tax += (upper - lower_bound) * band.rate;
                lower_bound = upper;
            }
        }

        Ok(Self { brackets })
    }

    /// The derived brackets, ascending.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the bracket `income` falls into, or `None` for non-positive income.
    pub fn bracket_for(&self, income: Decimal) -> Option<&TaxBracket> {
        self.brackets.iter().find(|b| b.contains(income))
    }

    /// Annual tax due on `income` (unrounded).
    pub fn tax_on(&self, income: Decimal) -> Decimal {
        self.bracket_for(income)
            .map(|b| b.tax_on(income))
            .unwrap_or(Decimal::ZERO)
    }
}

impl TryFrom<Vec<PayeBand>> for TaxSchedule {
    type Error = EngineError;

    fn try_from(bands: Vec<PayeBand>) -> EngineResult<Self> {
        Self::from_bands(&bands)
    }
}

impl From<TaxSchedule> for Vec<PayeBand> {
    fn from(schedule: TaxSchedule) -> Self {
        schedule
            .brackets
            .into_iter()
            .map(|b| PayeBand {
                upper_bound: b.upper_bound,
                rate: b.rate,
            })
            .collect()
    }
}

/// PAYE configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeConfig {
    /// Relief deducted from annual income before the schedule is applied.
    pub personal_relief_annual: Decimal,
    /// The progressive schedule applied to annual taxable income.
    pub brackets: TaxSchedule,
}

/// One row of the NHIF contribution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NhifBracketRow {
    /// Lowest monthly gross (whole shillings) in the row.
    pub min: Decimal,
    /// Highest monthly gross (whole shillings) in the row.
    pub max: Decimal,
    /// Flat monthly contribution.
    pub amount: Decimal,
}

/// NHIF contribution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NhifTable {
    /// Rows ordered by `min`.
    pub rows: Vec<NhifBracketRow>,
    /// Contribution charged when no row matches.
    pub maximum_amount: Decimal,
}

impl NhifTable {
    /// Checks the rows are non-empty, ordered and contiguous in whole shillings.
    pub fn validate(&self) -> EngineResult<()> {
        if self.rows.is_empty() {
            return Err(EngineError::invalid_config("NHIF table has no rows"));
        }
        if self.maximum_amount < Decimal::ZERO {
            return Err(EngineError::invalid_config(
                "NHIF maximum_amount must not be negative",
            ));
        }
        for (index, row) in self.rows.iter().enumerate() {
            if row.min > row.max {
                return Err(EngineError::invalid_config(format!(
                    "NHIF row {} has min {} above max {}",
                    index + 1,
                    row.min,
                    row.max
                )));
            }
            if row.amount < Decimal::ZERO {
                return Err(EngineError::invalid_config(format!(
                    "NHIF row {} has a negative amount",
                    index + 1
                )));
            }
        }
        for (index, pair) in self.rows.windows(2).enumerate() {
            if pair[1].min != pair[0].max + Decimal::ONE {
                return Err(EngineError::invalid_config(format!(
                    "NHIF row {} starts at {} but row {} ends at {}",
                    index + 2,
                    pair[1].min,
                    index + 1,
                    pair[0].max
                )));
            }
        }
        Ok(())
    }
}

/// Which salary figure NSSF treats as pensionable pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionableBasis {
    /// Monthly gross salary.
    #[default]
    Gross,
    /// Monthly basic salary.
    Basic,
}

/// NSSF contribution model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum NssfScheme {
    /// Single tier: `rate` on pensionable pay up to `ceiling`.
    Flat {
        /// Maximum pensionable pay.
        ceiling: Decimal,
        /// Employee contribution rate.
        rate: Decimal,
        /// Pensionable pay basis.
        #[serde(default)]
        basis: PensionableBasis,
    },
    /// NSSF Act 2013 tiers: Tier I up to the lower earnings limit, Tier II
    /// from there up to the upper earnings limit, both at `rate`.
    Tiered {
        /// Lower earnings limit (end of Tier I).
        lower_earnings_limit: Decimal,
        /// Upper earnings limit (end of Tier II).
        upper_earnings_limit: Decimal,
        /// Employee contribution rate.
        rate: Decimal,
        /// Pensionable pay basis.
        #[serde(default)]
        basis: PensionableBasis,
    },
}

impl NssfScheme {
    /// Returns the pensionable pay basis.
    pub fn basis(&self) -> PensionableBasis {
        match self {
            NssfScheme::Flat { basis, .. } | NssfScheme::Tiered { basis, .. } => *basis,
        }
    }

    /// Checks limits are non-negative and ordered and the rate is in `[0, 1]`.
    pub fn validate(&self) -> EngineResult<()> {
        let (rate, limits_ok) = match self {
            NssfScheme::Flat { ceiling, rate, .. } => (*rate, *ceiling >= Decimal::ZERO),
            NssfScheme::Tiered {
                lower_earnings_limit,
                upper_earnings_limit,
                rate,
                ..
            } => (
                *rate,
                *lower_earnings_limit >= Decimal::ZERO
                    && upper_earnings_limit >= lower_earnings_limit,
            ),
        };
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(EngineError::invalid_config(format!(
                "NSSF rate {} is outside [0, 1]",
                rate
            )));
        }
        if !limits_ok {
            return Err(EngineError::invalid_config(
                "NSSF earnings limits must be non-negative and ascending",
            ));
        }
        Ok(())
    }
}

/// Housing levy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingLevyConfig {
    /// Employee levy rate applied to gross salary.
    pub rate: Decimal,
}

/// All statutory rates in force from one effective date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryRates {
    /// The date from which these rates apply.
    pub effective_date: NaiveDate,
    /// PAYE configuration.
    pub paye: PayeConfig,
    /// NHIF table.
    pub nhif: NhifTable,
    /// NSSF model.
    pub nssf: NssfScheme,
    /// Housing levy configuration.
    pub housing_levy: HousingLevyConfig,
}

impl StatutoryRates {
    /// Runs the structural checks serde cannot express.
    pub fn validate(&self) -> EngineResult<()> {
        if self.paye.personal_relief_annual < Decimal::ZERO {
            return Err(EngineError::invalid_config(
                "PAYE personal relief must not be negative",
            ));
        }
        self.nhif.validate()?;
        self.nssf.validate()?;
        let levy = self.housing_levy.rate;
        if levy < Decimal::ZERO || levy > Decimal::ONE {
            return Err(EngineError::invalid_config(format!(
                "housing levy rate {} is outside [0, 1]",
                levy
            )));
        }
        Ok(())
    }
}

/// Supplies the statutory rates in force on a date.
///
/// Implemented by [`ConfigLoader`](super::ConfigLoader) for effective-dated
/// YAML schedules and by [`StatutoryRates`] for a single fixed schedule.
pub trait RateProvider {
    /// Returns the rates effective on `date`.
    fn rates_for(&self, date: NaiveDate) -> EngineResult<&StatutoryRates>;
}

impl RateProvider for StatutoryRates {
    fn rates_for(&self, date: NaiveDate) -> EngineResult<&StatutoryRates> {
        if date < self.effective_date {
            return Err(EngineError::RatesNotFound { date });
        }
        Ok(self)
    }
}

/// A deduction type in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionType {
    /// Identifier used on payroll entries (e.g., "sacco").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Category for reporting.
    pub category: DeductionCategory,
    /// Whether `max_amount` applies.
    #[serde(default)]
    pub has_limit: bool,
    /// Maximum monthly amount when `has_limit` is set.
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    /// Statutory component the engine can compute for this type.
    #[serde(default)]
    pub auto_calculated: Option<StatutoryComponent>,
}

fn default_tolerance() -> Decimal {
    Decimal::from(10)
}

/// The deduction catalogue loaded from `deduction_types.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionCatalog {
    /// Allowed gap between a manual and a computed amount before warning.
    #[serde(default = "default_tolerance")]
    pub auto_calculation_tolerance: Decimal,
    /// Known deduction types.
    pub deduction_types: Vec<DeductionType>,
}

impl DeductionCatalog {
    /// Looks up a deduction type by code.
    pub fn get(&self, code: &str) -> EngineResult<&DeductionType> {
        self.deduction_types
            .iter()
            .find(|d| d.code == code)
            .ok_or_else(|| EngineError::UnknownDeductionType {
                code: code.to_string(),
            })
    }

    /// Checks codes are unique and every limited type names its maximum.
    pub fn validate(&self) -> EngineResult<()> {
        if self.auto_calculation_tolerance < Decimal::ZERO {
            return Err(EngineError::invalid_config(
                "auto_calculation_tolerance must not be negative",
            ));
        }
        for (index, deduction) in self.deduction_types.iter().enumerate() {
            if self.deduction_types[..index]
                .iter()
                .any(|d| d.code == deduction.code)
            {
                return Err(EngineError::invalid_config(format!(
                    "duplicate deduction type code '{}'",
                    deduction.code
                )));
            }
            match (deduction.has_limit, deduction.max_amount) {
                (true, None) => {
                    return Err(EngineError::invalid_config(format!(
                        "deduction type '{}' has_limit but no max_amount",
                        deduction.code
                    )));
                }
                (_, Some(max)) if max < Decimal::ZERO => {
                    return Err(EngineError::invalid_config(format!(
                        "deduction type '{}' has a negative max_amount",
                        deduction.code
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// How a leave type's entitlement builds up over the leave year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualMethod {
    /// Full entitlement available from the start of the year.
    Upfront,
    /// One twelfth of the entitlement per completed month.
    Monthly,
}

/// Policy for one leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypePolicy {
    /// Days granted per leave year.
    pub entitlement_days: Decimal,
    /// How the entitlement accrues.
    pub accrual: AccrualMethod,
    /// Most unused days that may roll into the next year.
    #[serde(default)]
    pub max_carry_forward: Decimal,
}

/// Leave policy loaded from `leave_policy.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePolicy {
    /// Policy per leave type.
    pub leave_types: HashMap<LeaveType, LeaveTypePolicy>,
}

impl LeavePolicy {
    /// Returns the policy for `leave_type`.
    ///
    /// A leave type missing from configuration is a deployment error and is
    /// reported as `InvalidConfig`.
    pub fn policy_for(&self, leave_type: LeaveType) -> EngineResult<&LeaveTypePolicy> {
        self.leave_types.get(&leave_type).ok_or_else(|| {
            EngineError::invalid_config(format!("no leave policy for '{}'", leave_type))
        })
    }

    /// Checks every leave type is configured with non-negative figures.
    pub fn validate(&self) -> EngineResult<()> {
        for leave_type in LeaveType::ALL {
            let policy = self.policy_for(leave_type)?;
            if policy.entitlement_days < Decimal::ZERO || policy.max_carry_forward < Decimal::ZERO
            {
                return Err(EngineError::invalid_config(format!(
                    "leave policy for '{}' has negative days",
                    leave_type
                )));
            }
        }
        Ok(())
    }
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    metadata: ScheduleMetadata,
    /// Rate sets by effective date (sorted oldest first).
    rates: Vec<StatutoryRates>,
    deductions: DeductionCatalog,
    leave_policy: LeavePolicy,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(
        metadata: ScheduleMetadata,
        rates: Vec<StatutoryRates>,
        deductions: DeductionCatalog,
        leave_policy: LeavePolicy,
    ) -> Self {
        let mut sorted_rates = rates;
        sorted_rates.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            rates: sorted_rates,
            deductions,
            leave_policy,
        }
    }

    /// Returns the schedule metadata.
    pub fn schedule(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    /// Returns all rate sets, oldest first.
    pub fn rates(&self) -> &[StatutoryRates] {
        &self.rates
    }

    /// Returns the deduction catalogue.
    pub fn deductions(&self) -> &DeductionCatalog {
        &self.deductions
    }

    /// Returns the leave policy.
    pub fn leave_policy(&self) -> &LeavePolicy {
        &self.leave_policy
    }
}

impl RateProvider for PayrollConfig {
    fn rates_for(&self, date: NaiveDate) -> EngineResult<&StatutoryRates> {
        self.rates
            .iter()
            .rfind(|r| r.effective_date <= date)
            .ok_or(EngineError::RatesNotFound { date })
    }
}
