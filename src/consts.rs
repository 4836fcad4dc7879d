use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Employee share of the NIB contribution, percent of gross.
/// Used when a company has no payroll_settings row.
pub const DEFAULT_NIB_RATE: Decimal = dec!(4.65);

/// Employer share of the NIB contribution, percent of gross.
/// Shown on reports only, never deducted from net pay.
pub const DEFAULT_NIB_EMPLOYER_RATE: Decimal = dec!(6.65);

/// Multiplier applied to overtime hours on top of the base-rate term.
pub const OVERTIME_PREMIUM_MULTIPLIER: Decimal = dec!(1.5);

/// Reference prefix tying a wages-payable transaction to its payroll record.
pub const LIABILITY_REFERENCE_PREFIX: &str = "LIABILITY-";

/// Milestone recorded the first time a company generates payroll.
pub const MILESTONE_FIRST_PAYROLL: &str = "first_payroll_generated";
