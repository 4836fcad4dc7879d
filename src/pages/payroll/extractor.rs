use std::str::FromStr;

use super::*;

impl FromRequest for payroll::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let payroll_id = req.match_info().get("payroll_id").expect("This extractor must be used under `payroll_id` path");
            let Ok(payroll_id) = Uuid::from_str(payroll_id) else {
                return Err(actix_web::error::ErrorBadRequest("invalid `payroll_id`"))
            };

            let db = req.app_data::<web::Data<DatabaseConnection>>().expect("DatabaseConnection must be attached");

            let Some(record) = Payroll::find_by_id(payroll_id)
                .one(db.as_ref()).await.map_err(ApiError::from)?
            else {
                return Err(ApiError::NotFound("payroll record not found").into())
            };

            Ok(record)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::Local;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    #[actix_web::test]
    async fn test_payroll_extractor() {
        #[get("/{payroll_id}")]
        async fn test_handler(record: payroll::Model) -> impl Responder {
            web::Json(record)
        }

        let record = payroll::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            company_id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            project_id: None,
            pay_period_start: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            pay_period_end: NaiveDate::from_ymd_opt(2026, 6, 14).unwrap(),
            total_hours: dec!(8),
            overtime_hours: dec!(0),
            hourly_rate: dec!(20),
            gross_pay: dec!(160),
            nib_deduction: dec!(7.44),
            other_deductions: dec!(0),
            total_deductions: dec!(7.44),
            net_pay: dec!(152.56),
            status: PayrollStatus::Pending,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ record.clone() ],
                Vec::new(),
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db.into_connection()))
                .service(test_handler)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}", record.id))
            .to_request();

        let returned: payroll::Model = test::call_and_read_body_json(&app, req).await;
        assert_eq!(returned, record);

        let missing_req = test::TestRequest::default()
            .uri(&format!("/{}", Uuid::new_v4()))
            .to_request();

        let response = test::call_service(&app, missing_req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
