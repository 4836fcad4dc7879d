use super::*;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct GeneratePayroll {
    pub(super) worker_id: Uuid,
    pub(super) period_start: NaiveDate,
    pub(super) period_end: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct GeneratePayrollResponse {
    /// `None` when the period has no approved timesheets and no record.
    pub(super) payroll: Option<payroll::Model>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(super) enum PeriodType {
    Weekly,
    BiWeekly,
    Monthly,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct ListPayrollsQuery {
    pub(super) date_from: NaiveDate,
    pub(super) date_to: NaiveDate,
    pub(super) period: PeriodType,
}

/// One worker's calendar month, summed from the underlying pay periods.
/// Not a persisted record; the id is a composite display key.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct AggregatedPayroll {
    pub(super) id: String,
    pub(super) worker_id: Uuid,
    pub(super) pay_period_start: NaiveDate,
    pub(super) pay_period_end: NaiveDate,
    pub(super) total_hours: Decimal,
    pub(super) overtime_hours: Decimal,
    pub(super) gross_pay: Decimal,
    pub(super) nib_deduction: Decimal,
    pub(super) other_deductions: Decimal,
    pub(super) total_deductions: Decimal,
    pub(super) net_pay: Decimal,
    /// Employer NIB share on the summed gross. Display only.
    pub(super) nib_employer_contribution: Decimal,
    pub(super) record_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PayrollDetail {
    pub(super) payroll: payroll::Model,
    pub(super) total_paid: Decimal,
    pub(super) remaining_balance: Decimal,
    pub(super) payments: Vec<payroll_payment::Model>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct UpdateDeductions {
    pub(super) other_deductions: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct UpdateStatuses {
    pub(super) ids: Vec<Uuid>,
    pub(super) status: PayrollStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct StatusUpdateOutcome {
    pub(super) id: Uuid,
    pub(super) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) error: Option<String>,
}
