use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20250802_101500_init::{Company, User};

#[derive(DeriveMigrationName)]
pub struct Migration;

const DEMO_COMPANY_ID: u128 = 1;
const DEMO_HR_ID: u128 = 2;

// Follows the generated format: code + initials + joining year + serial.
const DEMO_LOGIN_ID: &str = "ACMEJADO20250001";
const DEMO_PASSWORD: &str = "changeme";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2025-08-04T09:30:00.000Z").cast_as("timestamptz");

        // Company passwords salt with the registration email
        let company_password = &sha2::Sha256::digest(format!("{DEMO_PASSWORD}:hr@acme.example"))[..];

        manager
            .exec_stmt(Query::insert()
                .into_table(Company::Table)
                .columns(["id", "created_at", "updated_at", "name", "code", "email", "password"])
                .values_panic([
                    Expr::val(format!("{:032x}", DEMO_COMPANY_ID)).cast_as("uuid"),
                    time.clone(),
                    time.clone(),
                    "Acme Corp".into(),
                    "ACME".into(),
                    "hr@acme.example".into(),
                    company_password.into(),
                ])
                .to_owned()
        ).await.unwrap();

        // User passwords salt with the login id
        let hr_password = &sha2::Sha256::digest(format!("{DEMO_PASSWORD}:{DEMO_LOGIN_ID}"))[..];

        manager
            .exec_stmt(Query::insert()
                .into_table(User::Table)
                .columns(["id", "created_at", "updated_at", "company_id", "login_id", "first_name", "last_name", "email", "password", "role", "joined_on"])
                .values_panic([
                    Expr::val(format!("{:032x}", DEMO_HR_ID)).cast_as("uuid"),
                    time.clone(),
                    time.clone(),
                    Expr::val(format!("{:032x}", DEMO_COMPANY_ID)).cast_as("uuid"),
                    DEMO_LOGIN_ID.into(),
                    "Jane".into(),
                    "Doe".into(),
                    "jane.doe@acme.example".into(),
                    hr_password.into(),
                    Expr::val("hr").cast_as("role_type"),
                    Expr::val("2025-01-06").cast_as("date"),
                ])
                .to_owned()
        ).await.unwrap();

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete()
                .from_table(User::Table)
                .and_where(Expr::col("id").eq(Expr::val(format!("{:032x}", DEMO_HR_ID)).cast_as("uuid")))
                .to_owned()
        ).await.unwrap();

        manager
            .exec_stmt(Query::delete()
                .from_table(Company::Table)
                .and_where(Expr::col("id").eq(Expr::val(format!("{:032x}", DEMO_COMPANY_ID)).cast_as("uuid")))
                .to_owned()
        ).await.unwrap();

        Ok(())
    }
}
