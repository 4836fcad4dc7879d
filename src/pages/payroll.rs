use actix_web::{dev, get, post, put, web, FromRequest, HttpRequest, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use futures_util::future::LocalBoxFuture;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, consts, entity::{onboarding_milestone, payroll, payroll_payment, payroll_setting, prelude::*, sea_orm_active_enums::{ApprovalStatus, PayrollStatus, TransactionStatus, TransactionType}, timesheet, transaction, user, worker}, error::ApiError, utils};

use super::payments;

use model::*;

mod calculator;
mod coordinator;
mod extractor;
mod model;
mod report;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(generate_payroll)
        .service(list_payrolls)
        .service(update_statuses)
        .service(get_payroll)
        .service(update_deductions);
}

#[post("")]
async fn generate_payroll(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<GeneratePayroll>) -> impl Responder {
    if payload.period_end < payload.period_start {
        return Err(actix_web::error::ErrorBadRequest("period_end is lower than period_start"))
    }

    let payroll = coordinator::generate(
        db.get_ref(),
        admin.company_id,
        payload.worker_id,
        payload.period_start,
        payload.period_end,
    ).await.map_err(ApiError::from)?;

    Ok(web::Json(GeneratePayrollResponse { payroll }))
}

#[get("")]
async fn list_payrolls(db: web::Data<DatabaseConnection>, user: user::Model, query: web::Query<ListPayrollsQuery>) -> actix_web::Result<impl Responder> {
    let records = Payroll::find()
        .filter(payroll::Column::CompanyId.eq(user.company_id))
        .filter(payroll::Column::PayPeriodStart.gte(query.date_from))
        .filter(payroll::Column::PayPeriodEnd.lte(query.date_to))
        .order_by_asc(payroll::Column::PayPeriodStart)
        .all(db.get_ref()).await.map_err(ApiError::from)?;

    let records = report::dedupe_latest(records);

    match query.period {
        PeriodType::Monthly => {
            let settings = PayrollSetting::find_by_id(user.company_id)
                .one(db.get_ref()).await.map_err(ApiError::from)?;

            let employer_rate = settings
                .map(|settings| settings.nib_employer_rate)
                .unwrap_or(consts::DEFAULT_NIB_EMPLOYER_RATE);

            Ok(HttpResponse::Ok().json(report::aggregate_monthly(records, employer_rate)))
        }
        PeriodType::Weekly | PeriodType::BiWeekly => Ok(HttpResponse::Ok().json(records)),
    }
}

#[get("/{payroll_id}")]
async fn get_payroll(db: web::Data<DatabaseConnection>, user: user::Model, record: payroll::Model) -> actix_web::Result<impl Responder> {
    if record.company_id != user.company_id {
        return Err(ApiError::NotFound("payroll record not found").into())
    }

    let payments = PayrollPayment::find()
        .filter(payroll_payment::Column::PayrollId.eq(record.id))
        .order_by_asc(payroll_payment::Column::PaymentDate)
        .all(db.get_ref()).await.map_err(ApiError::from)?;

    let (total_paid, remaining_balance) = payments::totals(record.net_pay, &payments);

    Ok(web::Json(PayrollDetail {
        payroll: record,
        total_paid,
        remaining_balance,
        payments,
    }))
}

#[put("/{payroll_id}/deductions")]
async fn update_deductions(db: web::Data<DatabaseConnection>, admin: Admin, record: payroll::Model, payload: web::Json<UpdateDeductions>) -> actix_web::Result<impl Responder> {
    if record.company_id != admin.company_id {
        return Err(ApiError::NotFound("payroll record not found").into())
    }

    let total_deductions = record.nib_deduction + payload.other_deductions;

    let updated = Payroll::update(payroll::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        other_deductions: Set(payload.other_deductions),
        total_deductions: Set(total_deductions),
        net_pay: Set(record.gross_pay - total_deductions),
        ..Default::default()
    }).exec(db.get_ref()).await.map_err(ApiError::from)?;

    Ok(web::Json(updated))
}

#[post("/status")]
async fn update_statuses(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<UpdateStatuses>) -> impl Responder {
    let mut outcomes = Vec::with_capacity(payload.ids.len());

    // Sequential loop of independent statements; a failure on one id must
    // not abort or roll back the ones already written, it only shows up in
    // that id's outcome.
    for &id in &payload.ids {
        outcomes.push(update_one_status(db.get_ref(), admin.company_id, id, payload.status.clone()).await);
    }

    web::Json(outcomes)
}

async fn update_one_status(db: &DatabaseConnection, company_id: Uuid, id: Uuid, status: PayrollStatus) -> StatusUpdateOutcome {
    let record = match Payroll::find_by_id(id).one(db).await {
        Ok(Some(record)) if record.company_id == company_id => record,
        Ok(_) => return StatusUpdateOutcome {
            id,
            success: false,
            error: Some("payroll record not found".to_owned()),
        },
        Err(error) => return StatusUpdateOutcome {
            id,
            success: false,
            error: Some(error.to_string()),
        },
    };

    let update = Payroll::update(payroll::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        status: Set(status),
        ..Default::default()
    }).exec(db).await;

    match update {
        Ok(_) => StatusUpdateOutcome { id, success: true, error: None },
        Err(error) => StatusUpdateOutcome {
            id,
            success: false,
            error: Some(error.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{auth::Authority, entity::sea_orm_active_enums::RoleType};

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn account(company_id: Uuid, role: RoleType) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            company_id,
            username: "foreman".to_string(),
            password: Vec::new(),
            role,
        }
    }

    fn record(company_id: Uuid, worker_id: Uuid, start: NaiveDate, end: NaiveDate) -> payroll::Model {
        payroll::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            company_id,
            worker_id,
            project_id: None,
            pay_period_start: start,
            pay_period_end: end,
            total_hours: dec!(40),
            overtime_hours: dec!(0),
            hourly_rate: dec!(20),
            gross_pay: dec!(800),
            nib_deduction: dec!(37.20),
            other_deductions: dec!(0),
            total_deductions: dec!(37.20),
            net_pay: dec!(762.80),
            status: PayrollStatus::Pending,
        }
    }

    #[actix_web::test]
    async fn test_monthly_report_rolls_up_periods() {
        let secret = b"secret";
        let company_id = Uuid::new_v4();
        let worker_id = Uuid::new_v4();

        let user = account(company_id, RoleType::Staff);
        let token = Authority::new(secret).issue_for(&user);

        let first = record(company_id, worker_id, date(2026, 6, 1), date(2026, 6, 14));
        let second = record(company_id, worker_id, date(2026, 6, 15), date(2026, 6, 28));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![first, second]])
            .append_query_results([Vec::<payroll_setting::Model>::new()]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").service(list_payrolls))
        ).await;

        let req = test::TestRequest::default()
            .uri("/payroll?date_from=2026-06-01&date_to=2026-06-30&period=monthly")
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let months: Vec<AggregatedPayroll> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(months.len(), 1);
        assert_eq!(months[0].pay_period_start, date(2026, 6, 1));
        assert_eq!(months[0].pay_period_end, date(2026, 6, 30));
        assert_eq!(months[0].gross_pay, dec!(1600));
        assert_eq!(months[0].net_pay, dec!(1525.60));
        assert_eq!(months[0].record_count, 2);
    }

    #[actix_web::test]
    async fn test_batch_status_update_reports_each_id() {
        let secret = b"secret";
        let company_id = Uuid::new_v4();

        let admin = account(company_id, RoleType::Admin);
        let token = Authority::new(secret).issue_for(&admin);

        let owned = record(company_id, Uuid::new_v4(), date(2026, 6, 1), date(2026, 6, 14));
        let confirmed = payroll::Model { status: PayrollStatus::Confirmed, ..owned.clone() };
        let missing_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![owned.clone()], vec![confirmed]])
            .append_query_results([Vec::<payroll::Model>::new()]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").service(update_statuses))
        ).await;

        let req = test::TestRequest::post()
            .uri("/payroll/status")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(UpdateStatuses {
                ids: vec![owned.id, missing_id],
                status: PayrollStatus::Confirmed,
            })
            .to_request();

        let outcomes: Vec<StatusUpdateOutcome> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
        assert_eq!(outcomes[1].id, missing_id);
    }

    #[actix_web::test]
    async fn test_generate_rejects_inverted_period() {
        let secret = b"secret";
        let admin = account(Uuid::new_v4(), RoleType::Admin);
        let token = Authority::new(secret).issue_for(&admin);

        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").service(generate_payroll))
        ).await;

        let req = test::TestRequest::post()
            .uri("/payroll")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(GeneratePayroll {
                worker_id: Uuid::new_v4(),
                period_start: date(2026, 6, 14),
                period_end: date(2026, 6, 1),
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
