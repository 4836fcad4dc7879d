use tracing::warn;

use super::*;

/// Build or refresh the payroll record for one worker and pay period.
///
/// Returns `Ok(None)` when the period has no approved timesheets and no
/// existing record. When approved timesheets exist the record is updated in
/// place if present, inserted otherwise, and the paired wages-payable
/// transaction is brought in line with the new gross figure. When the
/// period's timesheets have all been removed or unapproved, an existing
/// record is zeroed out rather than deleted so payment history survives.
pub(super) async fn generate(
    db: &DatabaseConnection,
    company_id: Uuid,
    worker_id: Uuid,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<Option<payroll::Model>, DbErr> {
    let timesheets = Timesheet::find()
        .filter(timesheet::Column::CompanyId.eq(company_id))
        .filter(timesheet::Column::WorkerId.eq(worker_id))
        .filter(timesheet::Column::Status.eq(ApprovalStatus::Approved))
        .filter(timesheet::Column::WorkDate.between(period_start, period_end))
        .order_by_asc(timesheet::Column::WorkDate)
        .all(db).await?;

    if timesheets.is_empty() {
        return zero_out_existing(db, company_id, worker_id, period_start, period_end).await;
    }

    let worker = Worker::find_by_id(worker_id)
        .one(db).await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("worker {worker_id}")))?;

    let settings = PayrollSetting::find_by_id(company_id).one(db).await?;
    let nib = nib_policy(settings.as_ref(), &worker);

    let existing = find_for_period(db, company_id, worker_id, period_start, period_end).await?;

    let other_deductions = existing.as_ref()
        .map(|record| record.other_deductions)
        .unwrap_or(Decimal::ZERO);

    let totals = calculator::compute(&timesheets, worker.hourly_rate, &nib, other_deductions);
    let project_id = primary_project(&timesheets);

    let now = Local::now().fixed_offset();

    let record = match existing {
        Some(existing) => {
            Payroll::update(payroll::ActiveModel {
                id: Unchanged(existing.id),
                updated_at: Set(now),
                project_id: Set(project_id),
                total_hours: Set(totals.total_hours),
                overtime_hours: Set(totals.overtime_hours),
                hourly_rate: Set(worker.hourly_rate),
                gross_pay: Set(totals.gross_pay),
                nib_deduction: Set(totals.nib_deduction),
                other_deductions: Set(totals.other_deductions),
                total_deductions: Set(totals.total_deductions),
                net_pay: Set(totals.net_pay),
                ..Default::default()
            }).exec(db).await?
        }
        None => {
            Payroll::insert(payroll::ActiveModel {
                created_at: Set(now),
                updated_at: Set(now),
                company_id: Set(company_id),
                worker_id: Set(worker_id),
                project_id: Set(project_id),
                pay_period_start: Set(period_start),
                pay_period_end: Set(period_end),
                total_hours: Set(totals.total_hours),
                overtime_hours: Set(totals.overtime_hours),
                hourly_rate: Set(worker.hourly_rate),
                gross_pay: Set(totals.gross_pay),
                nib_deduction: Set(totals.nib_deduction),
                other_deductions: Set(totals.other_deductions),
                total_deductions: Set(totals.total_deductions),
                net_pay: Set(totals.net_pay),
                status: Set(PayrollStatus::Pending),
                ..Default::default()
            }).exec_with_returning(db).await?
        }
    };

    // The payroll row is the source of truth; the ledger entry and the
    // onboarding milestone are kept best-effort and must not fail the run.
    if let Err(error) = upsert_liability(db, &record, &worker.name).await {
        warn!(%error, payroll_id = %record.id, "failed to upsert wages payable transaction");
    }

    if let Err(error) = record_first_payroll_milestone(db, company_id).await {
        warn!(%error, %company_id, "failed to record onboarding milestone");
    }

    Ok(Some(record))
}

async fn zero_out_existing(
    db: &DatabaseConnection,
    company_id: Uuid,
    worker_id: Uuid,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<Option<payroll::Model>, DbErr> {
    let Some(existing) = find_for_period(db, company_id, worker_id, period_start, period_end).await? else {
        return Ok(None);
    };

    let zeroed = Payroll::update(payroll::ActiveModel {
        id: Unchanged(existing.id),
        updated_at: Set(Local::now().fixed_offset()),
        total_hours: Set(Decimal::ZERO),
        overtime_hours: Set(Decimal::ZERO),
        hourly_rate: Set(Decimal::ZERO),
        gross_pay: Set(Decimal::ZERO),
        nib_deduction: Set(Decimal::ZERO),
        other_deductions: Set(Decimal::ZERO),
        total_deductions: Set(Decimal::ZERO),
        net_pay: Set(Decimal::ZERO),
        status: Set(PayrollStatus::Pending),
        ..Default::default()
    }).exec(db).await?;

    if let Err(error) = zero_liability(db, zeroed.id).await {
        warn!(%error, payroll_id = %zeroed.id, "failed to zero wages payable transaction");
    }

    Ok(Some(zeroed))
}

/// Range match rather than exact equality on the period bounds, so records
/// written with slightly narrower bounds still count as this period's record.
/// Several matches collapse to the freshest one.
async fn find_for_period(
    db: &DatabaseConnection,
    company_id: Uuid,
    worker_id: Uuid,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<Option<payroll::Model>, DbErr> {
    let matches = Payroll::find()
        .filter(payroll::Column::CompanyId.eq(company_id))
        .filter(payroll::Column::WorkerId.eq(worker_id))
        .filter(payroll::Column::PayPeriodStart.gte(period_start))
        .filter(payroll::Column::PayPeriodEnd.lte(period_end))
        .all(db).await?;

    Ok(matches.into_iter().max_by_key(|record| (record.updated_at, record.created_at)))
}

fn nib_policy(settings: Option<&payroll_setting::Model>, worker: &worker::Model) -> calculator::NibPolicy {
    match settings {
        Some(settings) => calculator::NibPolicy {
            enabled: settings.nib_enabled,
            rate: settings.nib_rate,
            worker_exempt: worker.nib_exempt,
        },
        None => calculator::NibPolicy {
            enabled: true,
            rate: consts::DEFAULT_NIB_RATE,
            worker_exempt: worker.nib_exempt,
        },
    }
}

/// Most-frequent project across the period's timesheets, first seen winning
/// ties.
fn primary_project(timesheets: &[timesheet::Model]) -> Option<Uuid> {
    let mut counts: Vec<(Uuid, usize)> = Vec::new();

    for entry in timesheets {
        match counts.iter_mut().find(|(project_id, _)| *project_id == entry.project_id) {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.project_id, 1)),
        }
    }

    let mut best: Option<(Uuid, usize)> = None;
    for (project_id, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((project_id, count));
        }
    }

    best.map(|(project_id, _)| project_id)
}

fn liability_reference(payroll_id: Uuid) -> String {
    format!("{}{}", consts::LIABILITY_REFERENCE_PREFIX, payroll_id)
}

/// Exactly one wages-payable transaction exists per payroll record, found by
/// its reference string and updated in place on regeneration.
async fn upsert_liability(
    db: &DatabaseConnection,
    record: &payroll::Model,
    worker_name: &str,
) -> Result<(), DbErr> {
    let reference = liability_reference(record.id);
    let now = Local::now().fixed_offset();

    let existing = Transaction::find()
        .filter(transaction::Column::Reference.eq(&reference))
        .one(db).await?;

    match existing {
        Some(liability) => {
            Transaction::update(transaction::ActiveModel {
                id: Unchanged(liability.id),
                updated_at: Set(now),
                amount: Set(record.gross_pay),
                ..Default::default()
            }).exec(db).await?;
        }
        None => {
            Transaction::insert(transaction::ActiveModel {
                created_at: Set(now),
                updated_at: Set(now),
                company_id: Set(record.company_id),
                transaction_type: Set(TransactionType::Liability),
                reference: Set(Some(reference)),
                amount: Set(record.gross_pay),
                description: Set(format!(
                    "Wages payable for {} ({} to {})",
                    worker_name, record.pay_period_start, record.pay_period_end,
                )),
                status: Set(TransactionStatus::Pending),
                transaction_date: Set(Local::now().date_naive()),
                ..Default::default()
            }).exec_with_returning(db).await?;
        }
    }

    Ok(())
}

async fn zero_liability(db: &DatabaseConnection, payroll_id: Uuid) -> Result<(), DbErr> {
    let existing = Transaction::find()
        .filter(transaction::Column::Reference.eq(liability_reference(payroll_id)))
        .one(db).await?;

    if let Some(liability) = existing {
        Transaction::update(transaction::ActiveModel {
            id: Unchanged(liability.id),
            updated_at: Set(Local::now().fixed_offset()),
            amount: Set(Decimal::ZERO),
            ..Default::default()
        }).exec(db).await?;
    }

    Ok(())
}

async fn record_first_payroll_milestone(db: &DatabaseConnection, company_id: Uuid) -> Result<(), DbErr> {
    let existing = OnboardingMilestone::find()
        .filter(onboarding_milestone::Column::CompanyId.eq(company_id))
        .filter(onboarding_milestone::Column::Milestone.eq(consts::MILESTONE_FIRST_PAYROLL))
        .one(db).await?;

    if existing.is_some() {
        return Ok(());
    }

    OnboardingMilestone::insert(onboarding_milestone::ActiveModel {
        company_id: Set(company_id),
        milestone: Set(consts::MILESTONE_FIRST_PAYROLL.to_owned()),
        achieved_at: Set(Local::now().fixed_offset()),
        ..Default::default()
    }).exec_with_returning(db).await?;

    Ok(())
}
