use std::collections::HashMap;

use actix_web::{post, put, web, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::{NotSet, Set, Unchanged}, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, entity::{payroll, payroll_payment, prelude::*, sea_orm_active_enums::PaymentStatus, user}, error::ApiError};

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(add_payment)
        .service(batch_payments)
        .service(set_total_paid)
        .service(update_payment);
}

#[post("")]
async fn add_payment(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<CreatePayment>) -> actix_web::Result<impl Responder> {
    fetch_owned_payroll(db.get_ref(), admin.company_id, payload.payroll_id).await?;

    let now = Local::now().fixed_offset();

    let payment = PayrollPayment::insert(payroll_payment::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        payroll_id: Set(payload.payroll_id),
        amount: Set(payload.amount),
        payment_date: Set(payload.payment_date),
        status: Set(payload.status.clone().unwrap_or(PaymentStatus::Completed)),
        notes: Set(payload.notes.clone()),
        ..Default::default()
    }).exec_with_returning(db.get_ref()).await.map_err(ApiError::from)?;

    Ok(HttpResponse::Created().json(payment))
}

#[put("/{payment_id}")]
async fn update_payment(db: web::Data<DatabaseConnection>, admin: Admin, path: web::Path<Uuid>, payload: web::Json<UpdatePayment>) -> actix_web::Result<impl Responder> {
    let payment_id = path.into_inner();

    let Some(payment) = PayrollPayment::find_by_id(payment_id)
        .one(db.get_ref()).await.map_err(ApiError::from)?
    else {
        return Err(ApiError::NotFound("payment not found").into())
    };

    fetch_owned_payroll(db.get_ref(), admin.company_id, payment.payroll_id).await?;

    let updated = PayrollPayment::update(payroll_payment::ActiveModel {
        id: Unchanged(payment.id),
        updated_at: Set(Local::now().fixed_offset()),
        amount: payload.amount.map_or(NotSet, Set),
        payment_date: payload.payment_date.map_or(NotSet, Set),
        status: payload.status.clone().map_or(NotSet, Set),
        notes: payload.notes.clone().map_or(NotSet, |notes| Set(Some(notes))),
        ..Default::default()
    }).exec(db.get_ref()).await.map_err(ApiError::from)?;

    Ok(web::Json(updated))
}

/// Sets the absolute total paid against a payroll record.
///
/// This is a replace, not an increment: every existing payment row for the
/// payroll is deleted, then a single completed payment dated today is
/// inserted when the amount is positive.
#[put("/total/{payroll_id}")]
async fn set_total_paid(db: web::Data<DatabaseConnection>, admin: Admin, path: web::Path<Uuid>, payload: web::Json<SetTotalPaid>) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();

    fetch_owned_payroll(db.get_ref(), admin.company_id, payroll_id).await?;

    let payment = replace_payments(db.get_ref(), payroll_id, payload.amount)
        .await.map_err(ApiError::from)?;

    Ok(web::Json(SetTotalPaidResponse { payment }))
}

#[post("/batch")]
async fn batch_payments(db: web::Data<DatabaseConnection>, user: user::Model, payload: web::Json<BatchPaymentsRequest>) -> actix_web::Result<impl Responder> {
    let owned: Vec<Uuid> = Payroll::find()
        .filter(payroll::Column::CompanyId.eq(user.company_id))
        .filter(payroll::Column::Id.is_in(payload.payroll_ids.clone()))
        .all(db.get_ref()).await.map_err(ApiError::from)?
        .into_iter()
        .map(|record| record.id)
        .collect();

    let payments = PayrollPayment::find()
        .filter(payroll_payment::Column::PayrollId.is_in(owned))
        .order_by_asc(payroll_payment::Column::PaymentDate)
        .all(db.get_ref()).await.map_err(ApiError::from)?;

    Ok(web::Json(group_payments(&payload.payroll_ids, payments)))
}

async fn fetch_owned_payroll(db: &DatabaseConnection, company_id: Uuid, payroll_id: Uuid) -> Result<payroll::Model, actix_web::Error> {
    let record = Payroll::find_by_id(payroll_id)
        .one(db).await.map_err(ApiError::from)?;

    match record {
        Some(record) if record.company_id == company_id => Ok(record),
        _ => Err(ApiError::NotFound("payroll record not found").into()),
    }
}

pub(super) async fn replace_payments(db: &DatabaseConnection, payroll_id: Uuid, amount: Decimal) -> Result<Option<payroll_payment::Model>, DbErr> {
    PayrollPayment::delete_many()
        .filter(payroll_payment::Column::PayrollId.eq(payroll_id))
        .exec(db).await?;

    if amount <= Decimal::ZERO {
        return Ok(None);
    }

    let now = Local::now().fixed_offset();

    let payment = PayrollPayment::insert(payroll_payment::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        payroll_id: Set(payroll_id),
        amount: Set(amount),
        payment_date: Set(Local::now().date_naive()),
        status: Set(PaymentStatus::Completed),
        notes: Set(None),
        ..Default::default()
    }).exec_with_returning(db).await?;

    Ok(Some(payment))
}

/// Every requested id gets an entry; ids without payments map to empty
/// lists rather than going missing from the result.
pub(super) fn group_payments(ids: &[Uuid], payments: Vec<payroll_payment::Model>) -> HashMap<Uuid, Vec<payroll_payment::Model>> {
    let mut groups: HashMap<Uuid, Vec<payroll_payment::Model>> =
        ids.iter().map(|&id| (id, Vec::new())).collect();

    for payment in payments {
        if let Some(group) = groups.get_mut(&payment.payroll_id) {
            group.push(payment);
        }
    }

    groups
}

/// Derived at read time, never stored on the record.
pub(super) fn totals(net_pay: Decimal, payments: &[payroll_payment::Model]) -> (Decimal, Decimal) {
    let total_paid: Decimal = payments.iter()
        .filter(|payment| payment.status == PaymentStatus::Completed)
        .map(|payment| payment.amount)
        .sum();

    (total_paid, net_pay - total_paid)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    fn payment(payroll_id: Uuid, amount: Decimal, status: PaymentStatus) -> payroll_payment::Model {
        payroll_payment::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            payroll_id,
            amount,
            payment_date: Local::now().date_naive(),
            status,
            notes: None,
        }
    }

    #[actix_web::test]
    async fn test_replace_payments_deletes_then_inserts_one() {
        let payroll_id = Uuid::new_v4();
        let inserted = payment(payroll_id, dec!(150), PaymentStatus::Completed);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 2 }])
            .append_query_results([vec![inserted.clone()]])
            .into_connection();

        let result = replace_payments(&db, payroll_id, dec!(150)).await.unwrap();

        assert_eq!(result, Some(inserted));
    }

    #[actix_web::test]
    async fn test_replace_payments_with_zero_amount_only_deletes() {
        let payroll_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();

        let result = replace_payments(&db, payroll_id, dec!(0)).await.unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn test_group_payments_keeps_empty_ids() {
        let paid = Uuid::new_v4();
        let unpaid = Uuid::new_v4();

        let first = payment(paid, dec!(100), PaymentStatus::Completed);
        let second = payment(paid, dec!(50), PaymentStatus::Completed);
        let foreign = payment(Uuid::new_v4(), dec!(25), PaymentStatus::Completed);

        let groups = group_payments(&[paid, unpaid], vec![first.clone(), second.clone(), foreign]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&paid], vec![first, second]);
        assert_eq!(groups[&unpaid], Vec::new());
    }

    #[test]
    fn test_totals_count_completed_payments_only() {
        let payroll_id = Uuid::new_v4();

        let payments = vec![
            payment(payroll_id, dec!(100), PaymentStatus::Completed),
            payment(payroll_id, dec!(50), PaymentStatus::Pending),
        ];

        let (total_paid, remaining_balance) = totals(dec!(152.56), &payments);

        assert_eq!(total_paid, dec!(100));
        assert_eq!(remaining_balance, dec!(52.56));
    }
}
