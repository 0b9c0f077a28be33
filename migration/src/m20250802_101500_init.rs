use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::util::{default_table_statement, DefaultColumn};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager
            .create_type(
                schema.create_enum_from_active_enum::<RoleType>()
            ).await.unwrap();

        manager
            .create_type(
                schema.create_enum_from_active_enum::<PayrollStatus>()
            ).await.unwrap();

        manager
            .create_type(
                schema.create_enum_from_active_enum::<AttendanceStatus>()
            ).await.unwrap();

        manager
            .create_type(
                schema.create_enum_from_active_enum::<LeaveStatus>()
            ).await.unwrap();

        manager
            .create_type(
                schema.create_enum_from_active_enum::<PayCycle>()
            ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Company::Table)
                .col(ColumnDef::new(Company::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Company::Code)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Company::Email)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Company::Password)
                    .binary()
                    .not_null()) // Stored as a salted hash, never plaintext
                .take()
            ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(User::Table)
                .col(ColumnDef::new(User::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(User::LoginId)
                    .text()
                    .not_null())
                .col(ColumnDef::new(User::FirstName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(User::LastName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(User::Email)
                    .text()
                    .not_null())
                .col(ColumnDef::new(User::Password)
                    .binary()
                    .not_null())
                .col(ColumnDef::new(User::Role)
                    .custom(RoleType::name())
                    .not_null())
                .col(ColumnDef::new(User::JoinedOn)
                    .date()
                    .not_null())
                .take()
            ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(User::Table, User::CompanyId)
            .to(Company::Table, DefaultColumn::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .on_update(ForeignKeyAction::Cascade)
            .take()
        ).await.unwrap();

        // The login-id namespace invariant, and the backstop for the
        // count-then-insert serial allocation.
        manager.create_index(Index::create()
            .name("idx_user_company_login_id")
            .table(User::Table)
            .col(User::CompanyId)
            .col(User::LoginId)
            .unique()
            .take()
        ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Employee::Table)
                .col(ColumnDef::new(Employee::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Employee::UserId)
                    .uuid())
                .col(ColumnDef::new(Employee::EmployeeCode)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::FirstName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::LastName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::Email)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::Designation)
                    .text())
                .col(ColumnDef::new(Employee::Department)
                    .text())
                .col(ColumnDef::new(Employee::GrossSalary)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Employee::JoinedOn)
                    .date()
                    .not_null())
                .take()
            ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Employee::Table, Employee::CompanyId)
            .to(Company::Table, DefaultColumn::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .on_update(ForeignKeyAction::Cascade)
            .take()
        ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Employee::Table, Employee::UserId)
            .to(User::Table, DefaultColumn::Id)
            .on_delete(ForeignKeyAction::SetNull)
            .on_update(ForeignKeyAction::Cascade)
            .take()
        ).await.unwrap();

        manager.create_index(Index::create()
            .name("idx_employee_company_code")
            .table(Employee::Table)
            .col(Employee::CompanyId)
            .col(Employee::EmployeeCode)
            .unique()
            .take()
        ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Settings::Table)
                .col(ColumnDef::new(Settings::PfPercentage)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Settings::TaxPercentage)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Settings::BasicPercentage)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Settings::HraPercentage)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Settings::OtherDeductions)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Settings::BonusPercentage)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Settings::PayCycle)
                    .custom(PayCycle::name())
                    .not_null())
                .col(ColumnDef::new(Settings::PayDate)
                    .small_integer()
                    .not_null())
                .col(ColumnDef::new(Settings::UpdatedBy)
                    .uuid())
                .take()
            ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Attendance::Table)
                .col(ColumnDef::new(Attendance::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Attendance::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Attendance::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Attendance::Status)
                    .custom(AttendanceStatus::name())
                    .not_null())
                .col(ColumnDef::new(Attendance::CheckIn)
                    .time())
                .col(ColumnDef::new(Attendance::CheckOut)
                    .time())
                .col(ColumnDef::new(Attendance::MarkedBy)
                    .uuid())
                .col(ColumnDef::new(Attendance::Remarks)
                    .text())
                .take()
            ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Attendance::Table, Attendance::EmployeeId)
            .to(Employee::Table, DefaultColumn::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .on_update(ForeignKeyAction::Cascade)
            .take()
        ).await.unwrap();

        // One row per employee per day; marking twice updates in place.
        manager.create_index(Index::create()
            .name("idx_attendance_employee_date")
            .table(Attendance::Table)
            .col(Attendance::EmployeeId)
            .col(Attendance::Date)
            .unique()
            .take()
        ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Leave::Table)
                .col(ColumnDef::new(Leave::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Leave::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Leave::EmployeeName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Leave::LeaveType)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Leave::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Leave::EndDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Leave::Reason)
                    .text())
                .col(ColumnDef::new(Leave::Status)
                    .custom(LeaveStatus::name())
                    .not_null())
                .take()
            ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Leave::Table, Leave::EmployeeId)
            .to(Employee::Table, DefaultColumn::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .on_update(ForeignKeyAction::Cascade)
            .take()
        ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Payroll::Table)
                .col(ColumnDef::new(Payroll::CompanyId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payroll::EmployeeId)
                    .uuid()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Payroll::EmployeeName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Payroll::Department)
                    .text())
                .col(ColumnDef::new(Payroll::GrossSalary)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Payroll::AttendanceDays)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::ApprovedLeaves)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::Deductions)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Payroll::NetPay)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Payroll::Status)
                    .custom(PayrollStatus::name())
                    .not_null())
                .take()
            ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Payroll::Table, Payroll::EmployeeId)
            .to(Employee::Table, DefaultColumn::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .on_update(ForeignKeyAction::Cascade)
            .take()
        ).await.unwrap();

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(
            TableDropStatement::new()
                .table(Payroll::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(Leave::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(Attendance::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(Settings::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(Employee::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(User::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(Company::Table)
                .take()
        ).await.unwrap();

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(PayCycle::name())
                    .to_owned()
            ).await.unwrap();

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(LeaveStatus::name())
                    .to_owned()
            ).await.unwrap();

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(AttendanceStatus::name())
                    .to_owned()
            ).await.unwrap();

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(PayrollStatus::name())
                    .to_owned()
            ).await.unwrap();

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(RoleType::name())
                    .to_owned()
            ).await.unwrap();

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Company {
    Table,
    Name,
    Code,
    Email,
    Password,
}

#[derive(Iden)]
pub(crate) enum User {
    Table,
    CompanyId,
    LoginId,
    FirstName,
    LastName,
    Email,
    Password,
    Role,
    JoinedOn,
}

#[derive(Iden)]
enum Employee {
    Table,
    CompanyId,
    UserId,
    EmployeeCode,
    FirstName,
    LastName,
    Email,
    Designation,
    Department,
    GrossSalary,
    JoinedOn,
}

#[derive(Iden)]
enum Settings {
    Table,
    PfPercentage,
    TaxPercentage,
    BasicPercentage,
    HraPercentage,
    OtherDeductions,
    BonusPercentage,
    PayCycle,
    PayDate,
    UpdatedBy,
}

#[derive(Iden)]
enum Attendance {
    Table,
    CompanyId,
    EmployeeId,
    Date,
    Status,
    CheckIn,
    CheckOut,
    MarkedBy,
    Remarks,
}

#[derive(Iden)]
enum Leave {
    Table,
    CompanyId,
    EmployeeId,
    EmployeeName,
    LeaveType,
    StartDate,
    EndDate,
    Reason,
    Status,
}

#[derive(Iden)]
enum Payroll {
    Table,
    CompanyId,
    EmployeeId,
    EmployeeName,
    Department,
    GrossSalary,
    AttendanceDays,
    ApprovedLeaves,
    Deductions,
    NetPay,
    Status,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "hr")]
    Hr,
    #[sea_orm(string_value = "payroll")]
    Payroll,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payroll_status")]
enum PayrollStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processed")]
    Processed,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
enum AttendanceStatus {
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "late")]
    Late,
    #[sea_orm(string_value = "on_leave")]
    OnLeave,
    #[sea_orm(string_value = "present")]
    Present,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_status")]
enum LeaveStatus {
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "pay_cycle")]
enum PayCycle {
    #[sea_orm(string_value = "biweekly")]
    Biweekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "weekly")]
    Weekly,
}
