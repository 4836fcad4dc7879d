use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::consts;

use super::*;

/// Company NIB policy combined with the worker's own exemption flag.
pub(super) struct NibPolicy {
    pub(super) enabled: bool,
    /// Employee share, percent of gross.
    pub(super) rate: Decimal,
    pub(super) worker_exempt: bool,
}

impl NibPolicy {
    pub(super) fn applies(&self) -> bool {
        self.enabled && !self.worker_exempt
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(super) struct PayTotals {
    pub(super) total_hours: Decimal,
    pub(super) overtime_hours: Decimal,
    pub(super) gross_pay: Decimal,
    pub(super) nib_deduction: Decimal,
    pub(super) other_deductions: Decimal,
    pub(super) total_deductions: Decimal,
    pub(super) net_pay: Decimal,
}

/// Aggregate a period's approved timesheets into pay figures.
///
/// `total_hours` on a timesheet is the full worked hours for the day,
/// overtime inclusive; the premium term pays overtime hours again at
/// 1.5x the base rate on top of that.
pub(super) fn compute(
    entries: &[timesheet::Model],
    hourly_rate: Decimal,
    nib: &NibPolicy,
    other_deductions: Decimal,
) -> PayTotals {
    let total_hours: Decimal = entries.iter().map(|entry| entry.total_hours).sum();
    let overtime_hours: Decimal = entries.iter().map(|entry| entry.overtime_hours).sum();

    let gross_pay = total_hours * hourly_rate
        + overtime_hours * hourly_rate * consts::OVERTIME_PREMIUM_MULTIPLIER;

    let nib_deduction = if nib.applies() {
        round_cents(gross_pay * nib.rate / dec!(100))
    } else {
        Decimal::ZERO
    };

    let total_deductions = nib_deduction + other_deductions;

    PayTotals {
        total_hours,
        overtime_hours,
        gross_pay,
        nib_deduction,
        other_deductions,
        total_deductions,
        net_pay: gross_pay - total_deductions,
    }
}

/// Half-up to cents, matching how the figures are presented downstream.
pub(super) fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate};
    use uuid::Uuid;

    use crate::entity::sea_orm_active_enums::ApprovalStatus;

    use super::*;

    fn entry(total_hours: Decimal, overtime_hours: Decimal) -> timesheet::Model {
        timesheet::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            company_id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            work_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            clock_in: None,
            clock_out: None,
            break_minutes: 30,
            total_hours,
            overtime_hours,
            status: ApprovalStatus::Approved,
        }
    }

    fn nib_default() -> NibPolicy {
        NibPolicy {
            enabled: true,
            rate: consts::DEFAULT_NIB_RATE,
            worker_exempt: false,
        }
    }

    #[test]
    fn test_regular_day_with_nib() {
        let totals = compute(&[entry(dec!(8), dec!(0))], dec!(20), &nib_default(), dec!(0));

        assert_eq!(totals.total_hours, dec!(8));
        assert_eq!(totals.overtime_hours, dec!(0));
        assert_eq!(totals.gross_pay, dec!(160));
        assert_eq!(totals.nib_deduction, dec!(7.44));
        assert_eq!(totals.total_deductions, dec!(7.44));
        assert_eq!(totals.net_pay, dec!(152.56));
    }

    #[test]
    fn test_exempt_worker_pays_no_nib() {
        let nib = NibPolicy { worker_exempt: true, ..nib_default() };

        let totals = compute(&[entry(dec!(8), dec!(0))], dec!(20), &nib, dec!(0));

        assert_eq!(totals.nib_deduction, dec!(0));
        assert_eq!(totals.net_pay, totals.gross_pay);
    }

    #[test]
    fn test_company_with_nib_disabled_pays_no_nib() {
        let nib = NibPolicy { enabled: false, ..nib_default() };

        let totals = compute(&[entry(dec!(8), dec!(0))], dec!(20), &nib, dec!(0));

        assert_eq!(totals.nib_deduction, dec!(0));
        assert_eq!(totals.net_pay, dec!(160));
    }

    #[test]
    fn test_overtime_premium_on_top_of_inclusive_total() {
        // 10 worked hours of which 2 are overtime: 10 * 20 + 2 * 20 * 1.5
        let nib = NibPolicy { enabled: false, ..nib_default() };

        let totals = compute(&[entry(dec!(10), dec!(2))], dec!(20), &nib, dec!(0));

        assert_eq!(totals.gross_pay, dec!(260));
    }

    #[test]
    fn test_sums_across_entries_and_keeps_other_deductions() {
        let totals = compute(
            &[entry(dec!(8), dec!(0)), entry(dec!(9), dec!(1))],
            dec!(20),
            &nib_default(),
            dec!(25),
        );

        assert_eq!(totals.total_hours, dec!(17));
        assert_eq!(totals.overtime_hours, dec!(1));
        // 17 * 20 + 1 * 20 * 1.5
        assert_eq!(totals.gross_pay, dec!(370));
        // 370 * 0.0465
        assert_eq!(totals.nib_deduction, dec!(17.21));
        assert_eq!(totals.other_deductions, dec!(25));
        assert_eq!(totals.total_deductions, dec!(42.21));
        assert_eq!(totals.net_pay, dec!(327.79));
    }
}
