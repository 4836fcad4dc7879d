use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20260212_093045_init::{PayrollSettings, Users, Workers};

const DEMO_COMPANY: u128 = 0x517e9a1;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2026-02-18T11:45:30.000Z").cast_as("timestamptz");
        let company = format!("{:032x}", DEMO_COMPANY);

        let hashed_password = &sha2::Sha256::digest("admin:admin")[..];

        manager
            .exec_stmt(Query::insert()
                .into_table(Users::Table)
                .columns(["id", "created_at", "updated_at", "company_id", "username", "password", "role"])
                .values_panic([
                    Expr::val(format!("{:032x}", 1_u128)).cast_as("uuid"),
                    time.clone(),
                    time.clone(),
                    Expr::val(company.clone()).cast_as("uuid"),
                    "admin".into(),
                    hashed_password.into(),
                    Expr::val("admin").cast_as("role_type"),
                ])
                .to_owned()
        ).await.unwrap();

        manager
            .exec_stmt(Query::insert()
                .into_table(PayrollSettings::Table)
                .columns(["company_id", "created_at", "updated_at", "nib_enabled", "nib_rate", "nib_employer_rate"])
                .values_panic([
                    Expr::val(company.clone()).cast_as("uuid"),
                    time.clone(),
                    time.clone(),
                    true.into(),
                    4.65_f64.into(),
                    6.65_f64.into(),
                ])
                .to_owned()
        ).await.unwrap();

        let crew = [
            ("Dwight Rolle", "Mason"),
            ("Shanti Ferguson", "Carpenter"),
            ("Andre Knowles", "Electrician"),
            ("Keisha Moss", "Site Supervisor"),
            ("Leon Bastian", "Laborer"),
        ];

        for (i, (name, position)) in crew.into_iter().enumerate() {
            let uuid = format!("{:032x}", 100 + i as u128);
            let hourly_rate = rand::random_range(16..=34) as f64 + 0.50;

            manager
                .exec_stmt(Query::insert()
                    .into_table(Workers::Table)
                    .columns(["id", "created_at", "updated_at", "company_id", "name", "position", "department", "hourly_rate", "nib_exempt"])
                    .values_panic([
                        Expr::val(uuid).cast_as("uuid"),
                        time.clone(),
                        time.clone(),
                        Expr::val(company.clone()).cast_as("uuid"),
                        name.into(),
                        position.into(),
                        "Field".into(),
                        hourly_rate.into(),
                        false.into(),
                    ])
                    .to_owned()
            ).await.unwrap();
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for i in 0..5_u128 {
            let uuid = format!("{:032x}", 100 + i);

            manager
                .exec_stmt(Query::delete()
                    .from_table(Workers::Table)
                    .and_where(Expr::col("id").eq(Expr::val(uuid).cast_as("uuid")))
                    .to_owned()
            ).await.unwrap();
        }

        manager
            .exec_stmt(Query::delete()
                .from_table(PayrollSettings::Table)
                .and_where(Expr::col("company_id").eq(Expr::val(format!("{:032x}", DEMO_COMPANY)).cast_as("uuid")))
                .to_owned()
        ).await.unwrap();

        manager
            .exec_stmt(Query::delete()
                .from_table(Users::Table)
                .and_where(Expr::col("id").eq(Expr::val(format!("{:032x}", 1_u128)).cast_as("uuid")))
                .to_owned()
        ).await.unwrap();

        Ok(())
    }
}
