use std::collections::BTreeMap;

use chrono::Datelike as _;
use rust_decimal_macros::dec;

use super::*;

/// Collapse rows sharing (worker, period) down to the freshest one.
///
/// The unique index on the natural key stops new duplicates at the store,
/// but rows written before it existed can still carry twins; every list
/// fetch repairs them on the way out instead of surfacing both.
pub(super) fn dedupe_latest(records: Vec<payroll::Model>) -> Vec<payroll::Model> {
    let mut kept: Vec<payroll::Model> = Vec::new();

    for record in records {
        let twin = kept.iter_mut().find(|existing|
            existing.worker_id == record.worker_id
                && existing.pay_period_start == record.pay_period_start
                && existing.pay_period_end == record.pay_period_end
        );

        match twin {
            Some(existing) => {
                if (record.updated_at, record.created_at) > (existing.updated_at, existing.created_at) {
                    *existing = record;
                }
            }
            None => kept.push(record),
        }
    }

    kept
}

/// Group records by (worker, calendar month of pay_period_start) and sum
/// every numeric field. The reported bounds are always the full calendar
/// month, even when the underlying periods cover only part of it.
pub(super) fn aggregate_monthly(records: Vec<payroll::Model>, employer_rate: Decimal) -> Vec<AggregatedPayroll> {
    let mut groups: BTreeMap<(Uuid, i32, u32), AggregatedPayroll> = BTreeMap::new();

    for record in records {
        let year = record.pay_period_start.year();
        let month = record.pay_period_start.month();
        let (month_start, month_end) = utils::month_bounds(record.pay_period_start);

        let group = groups.entry((record.worker_id, year, month)).or_insert_with(|| AggregatedPayroll {
            id: format!("{}-{:04}-{:02}", record.worker_id, year, month),
            worker_id: record.worker_id,
            pay_period_start: month_start,
            pay_period_end: month_end,
            total_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            gross_pay: Decimal::ZERO,
            nib_deduction: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            nib_employer_contribution: Decimal::ZERO,
            record_count: 0,
        });

        group.total_hours += record.total_hours;
        group.overtime_hours += record.overtime_hours;
        group.gross_pay += record.gross_pay;
        group.nib_deduction += record.nib_deduction;
        group.other_deductions += record.other_deductions;
        group.total_deductions += record.total_deductions;
        group.net_pay += record.net_pay;
        group.record_count += 1;
    }

    groups.into_values()
        .map(|mut group| {
            group.nib_employer_contribution =
                calculator::round_cents(group.gross_pay * employer_rate / dec!(100));
            group
        })
        .collect()
}
