use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::util::{default_table_statement, DefaultColumn};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager.create_type(schema.create_enum_from_active_enum::<RoleType>()).await.unwrap();
        manager.create_type(schema.create_enum_from_active_enum::<ApprovalStatus>()).await.unwrap();
        manager.create_type(schema.create_enum_from_active_enum::<PayrollStatus>()).await.unwrap();
        manager.create_type(schema.create_enum_from_active_enum::<PaymentStatus>()).await.unwrap();
        manager.create_type(schema.create_enum_from_active_enum::<TransactionType>()).await.unwrap();
        manager.create_type(schema.create_enum_from_active_enum::<TransactionStatus>()).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Users::Table)
                .col(ColumnDef::new(Users::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Users::Username)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Users::Password)
                    .binary()
                    .not_null()) // Password is stored as a sha256 digest
                .col(ColumnDef::new(Users::Role)
                    .custom(RoleType::name())
                    .not_null())
                .take()
            ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Workers::Table)
                .col(ColumnDef::new(Workers::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Workers::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Workers::Position)
                    .text())
                .col(ColumnDef::new(Workers::Department)
                    .text())
                .col(ColumnDef::new(Workers::HourlyRate)
                    .decimal_len(8, 2)
                    .not_null())
                .col(ColumnDef::new(Workers::NibExempt)
                    .boolean()
                    .not_null()
                    .default(false))
                .take()
            ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Timesheets::Table)
                .col(ColumnDef::new(Timesheets::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Timesheets::WorkerId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Timesheets::ProjectId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Timesheets::WorkDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Timesheets::ClockIn)
                    .time())
                .col(ColumnDef::new(Timesheets::ClockOut)
                    .time())
                .col(ColumnDef::new(Timesheets::BreakMinutes)
                    .integer()
                    .not_null()
                    .default(0))
                // Full worked hours for the day, overtime inclusive
                .col(ColumnDef::new(Timesheets::TotalHours)
                    .decimal_len(8, 2)
                    .not_null())
                .col(ColumnDef::new(Timesheets::OvertimeHours)
                    .decimal_len(8, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Timesheets::Status)
                    .custom(ApprovalStatus::name())
                    .not_null())
                .take()
            ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Timesheets::Table, Timesheets::WorkerId)
            .to(Workers::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        manager
            .create_table(TableCreateStatement::new()
                .if_not_exists()
                .table(PayrollSettings::Table)
                .col(ColumnDef::new(PayrollSettings::CompanyId)
                    .uuid()
                    .primary_key())
                .col(ColumnDef::new(PayrollSettings::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null())
                .col(ColumnDef::new(PayrollSettings::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null())
                .col(ColumnDef::new(PayrollSettings::NibEnabled)
                    .boolean()
                    .not_null()
                    .default(true))
                .col(ColumnDef::new(PayrollSettings::NibRate)
                    .decimal_len(5, 2)
                    .not_null())
                .col(ColumnDef::new(PayrollSettings::NibEmployerRate)
                    .decimal_len(5, 2)
                    .not_null())
                .take()
            ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Payroll::Table)
                .col(ColumnDef::new(Payroll::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payroll::WorkerId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payroll::ProjectId)
                    .uuid())
                .col(ColumnDef::new(Payroll::PayPeriodStart)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Payroll::PayPeriodEnd)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Payroll::TotalHours)
                    .decimal_len(8, 2)
                    .not_null())
                .col(ColumnDef::new(Payroll::OvertimeHours)
                    .decimal_len(8, 2)
                    .not_null())
                .col(ColumnDef::new(Payroll::HourlyRate)
                    .decimal_len(8, 2)
                    .not_null())
                .col(ColumnDef::new(Payroll::GrossPay)
                    .decimal_len(12, 2)
                    .not_null())
                .col(ColumnDef::new(Payroll::NibDeduction)
                    .decimal_len(12, 2)
                    .not_null())
                .col(ColumnDef::new(Payroll::OtherDeductions)
                    .decimal_len(12, 2)
                    .not_null())
                .col(ColumnDef::new(Payroll::TotalDeductions)
                    .decimal_len(12, 2)
                    .not_null())
                .col(ColumnDef::new(Payroll::NetPay)
                    .decimal_len(12, 2)
                    .not_null())
                .col(ColumnDef::new(Payroll::Status)
                    .custom(PayrollStatus::name())
                    .not_null())
                .take()
            ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Payroll::Table, Payroll::WorkerId)
            .to(Workers::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        // One record per worker and period; racing generators hit this
        // instead of minting duplicates
        manager.create_index(Index::create()
            .name("idx_payroll_worker_period")
            .table(Payroll::Table)
            .col(Payroll::WorkerId)
            .col(Payroll::PayPeriodStart)
            .col(Payroll::PayPeriodEnd)
            .unique()
            .to_owned()
        ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(PayrollPayments::Table)
                .col(ColumnDef::new(PayrollPayments::PayrollId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(PayrollPayments::Amount)
                    .decimal_len(12, 2)
                    .not_null())
                .col(ColumnDef::new(PayrollPayments::PaymentDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPayments::Status)
                    .custom(PaymentStatus::name())
                    .not_null())
                .col(ColumnDef::new(PayrollPayments::Notes)
                    .text())
                .take()
            ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(PayrollPayments::Table, PayrollPayments::PayrollId)
            .to(Payroll::Table, DefaultColumn::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .take()
        ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Transactions::Table)
                .col(ColumnDef::new(Transactions::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Transactions::TransactionType)
                    .custom(TransactionType::name())
                    .not_null())
                .col(ColumnDef::new(Transactions::Reference)
                    .text()
                    .unique_key())
                .col(ColumnDef::new(Transactions::Amount)
                    .decimal_len(12, 2)
                    .not_null())
                .col(ColumnDef::new(Transactions::Description)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Transactions::Status)
                    .custom(TransactionStatus::name())
                    .not_null())
                .col(ColumnDef::new(Transactions::TransactionDate)
                    .date()
                    .not_null())
                .take()
            ).await.unwrap();

        manager
            .create_table(TableCreateStatement::new()
                .if_not_exists()
                .table(OnboardingMilestones::Table)
                .col(ColumnDef::new(OnboardingMilestones::Id)
                    .uuid()
                    .primary_key()
                    .default(Expr::cust("GEN_RANDOM_UUID()")))
                .col(ColumnDef::new(OnboardingMilestones::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(OnboardingMilestones::Milestone)
                    .text()
                    .not_null())
                .col(ColumnDef::new(OnboardingMilestones::AchievedAt)
                    .timestamp_with_time_zone()
                    .not_null())
                .take()
            ).await.unwrap();

        // Reaching a milestone twice must stay a no-op
        manager.create_index(Index::create()
            .name("idx_onboarding_milestones_company_milestone")
            .table(OnboardingMilestones::Table)
            .col(OnboardingMilestones::CompanyId)
            .col(OnboardingMilestones::Milestone)
            .unique()
            .to_owned()
        ).await.unwrap();

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(TableDropStatement::new()
            .table(OnboardingMilestones::Table)
            .take()
        ).await.unwrap();

        manager.drop_table(TableDropStatement::new()
            .table(Transactions::Table)
            .take()
        ).await.unwrap();

        manager.drop_table(TableDropStatement::new()
            .table(PayrollPayments::Table)
            .take()
        ).await.unwrap();

        manager.drop_table(TableDropStatement::new()
            .table(Payroll::Table)
            .take()
        ).await.unwrap();

        manager.drop_table(TableDropStatement::new()
            .table(PayrollSettings::Table)
            .take()
        ).await.unwrap();

        manager.drop_table(TableDropStatement::new()
            .table(Timesheets::Table)
            .take()
        ).await.unwrap();

        manager.drop_table(TableDropStatement::new()
            .table(Workers::Table)
            .take()
        ).await.unwrap();

        manager.drop_table(TableDropStatement::new()
            .table(Users::Table)
            .take()
        ).await.unwrap();

        manager.drop_type(TypeDropStatement::new().name(TransactionStatus::name()).to_owned()).await.unwrap();
        manager.drop_type(TypeDropStatement::new().name(TransactionType::name()).to_owned()).await.unwrap();
        manager.drop_type(TypeDropStatement::new().name(PaymentStatus::name()).to_owned()).await.unwrap();
        manager.drop_type(TypeDropStatement::new().name(PayrollStatus::name()).to_owned()).await.unwrap();
        manager.drop_type(TypeDropStatement::new().name(ApprovalStatus::name()).to_owned()).await.unwrap();
        manager.drop_type(TypeDropStatement::new().name(RoleType::name()).to_owned()).await.unwrap();

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Users {
    Table,
    CompanyId,
    Username,
    Password,
    Role,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "staff")]
    Staff,
}

#[derive(Iden)]
pub(crate) enum Workers {
    Table,
    CompanyId,
    Name,
    Position,
    Department,
    HourlyRate,
    NibExempt,
}

#[derive(Iden)]
enum Timesheets {
    Table,
    CompanyId,
    WorkerId,
    ProjectId,
    WorkDate,
    ClockIn,
    ClockOut,
    BreakMinutes,
    TotalHours,
    OvertimeHours,
    Status,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_status")]
enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Iden)]
pub(crate) enum PayrollSettings {
    Table,
    CompanyId,
    CreatedAt,
    UpdatedAt,
    NibEnabled,
    NibRate,
    NibEmployerRate,
}

#[derive(Iden)]
enum Payroll {
    Table,
    CompanyId,
    WorkerId,
    ProjectId,
    PayPeriodStart,
    PayPeriodEnd,
    TotalHours,
    OvertimeHours,
    HourlyRate,
    GrossPay,
    NibDeduction,
    OtherDeductions,
    TotalDeductions,
    NetPay,
    Status,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payroll_status")]
enum PayrollStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "void")]
    Void,
}

#[derive(Iden)]
enum PayrollPayments {
    Table,
    PayrollId,
    Amount,
    PaymentDate,
    Status,
    Notes,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Iden)]
enum Transactions {
    Table,
    CompanyId,
    TransactionType,
    Reference,
    Amount,
    Description,
    Status,
    TransactionDate,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
enum TransactionType {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "liability")]
    Liability,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "cleared")]
    Cleared,
    #[sea_orm(string_value = "void")]
    Void,
}
