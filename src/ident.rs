use chrono::Datelike as _;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use sea_orm::prelude::Date;
use uuid::Uuid;

use crate::{entity::{company, employee, prelude::*, user}, error::ApiError};

/// First two characters of a name, uppercased. Login ids and employee
/// codes are meant to be read back by humans, so the raw name feeds the
/// id directly instead of a hash.
fn initials(name: &str) -> Result<String, ApiError> {
    let initials: String = name.trim().chars().take(2).flat_map(char::to_uppercase).collect();

    if initials.is_empty() {
        return Err(ApiError::InvalidInput("first and last name must not be empty".to_string()))
    }

    Ok(initials)
}

pub fn login_prefix(company_code: &str, first_name: &str, last_name: &str, year: i32) -> Result<String, ApiError> {
    Ok(format!("{company_code}{}{}{year:04}", initials(first_name)?, initials(last_name)?))
}

pub fn employee_prefix(first_name: &str, last_name: &str, year: i32) -> Result<String, ApiError> {
    Ok(format!("{}{}{year:04}", initials(first_name)?, initials(last_name)?))
}

fn with_serial(prefix: String, taken: u64) -> String {
    format!("{prefix}{:04}", taken + 1)
}

/// `<COMPANY_CODE><FI><LI><YYYY><NNNN>`, serial scoped to the company and
/// prefix. The count-then-insert window is closed by the unique index on
/// `(company_id, login_id)`; callers retry on a unique-violation.
pub async fn next_login_id(
    db: &DatabaseConnection,
    company: &company::Model,
    first_name: &str,
    last_name: &str,
    joined_on: Date,
) -> Result<String, ApiError> {
    let prefix = login_prefix(&company.code, first_name, last_name, joined_on.year())?;

    let taken = User::find()
        .filter(user::Column::CompanyId.eq(company.id))
        .filter(user::Column::LoginId.starts_with(prefix.as_str()))
        .count(db).await?;

    Ok(with_serial(prefix, taken))
}

/// `<FI><LI><YYYY><NNNN>`. No company code in the text, but the serial is
/// still counted within the owning company so both generators share one
/// scoping rule.
pub async fn next_employee_code(
    db: &DatabaseConnection,
    company_id: Uuid,
    first_name: &str,
    last_name: &str,
    joined_on: Date,
) -> Result<String, ApiError> {
    let prefix = employee_prefix(first_name, last_name, joined_on.year())?;

    let taken = Employee::find()
        .filter(employee::Column::CompanyId.eq(company_id))
        .filter(employee::Column::EmployeeCode.starts_with(prefix.as_str()))
        .count(db).await?;

    Ok(with_serial(prefix, taken))
}
