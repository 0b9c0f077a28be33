use actix_web::{get, post, web, HttpResponse};
use chrono::Local;
use sea_orm::{prelude::Date, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr};
use serde::{Deserialize, Serialize};

use crate::{auth::Hr, consts, entity::{company, employee, prelude::*, sea_orm_active_enums::RoleType, user}, error::ApiError, ident};

use super::auth::{provision_login, CreateLogin};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_employee)
        .service(list_employees);
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateEmployee {
    first_name: String,
    last_name: String,
    email: String,
    /// Role of the paired login account, not the job title.
    role: RoleType,
    designation: Option<String>,
    department: Option<String>,
    gross_salary: f64,
    joined_on: Date,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProvisionedEmployee {
    employee: employee::Model,
    login_id: String,
    temp_password: String,
}

#[post("")]
async fn create_employee(db: web::Data<DatabaseConnection>, hr: Hr, payload: web::Json<CreateEmployee>) -> Result<HttpResponse, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::InvalidInput("email is required".to_string()))
    }

    if payload.gross_salary <= 0.0 {
        return Err(ApiError::InvalidInput("gross salary must be positive".to_string()))
    }

    let Some(company) = Company::find_by_id(hr.company_id).one(db.as_ref()).await? else {
        return Err(ApiError::NotFound("company not found".to_string()))
    };

    // Login first, then the profile pointing at it. Not transactional: a
    // failure here leaves an orphan login and surfaces as a 500.
    let (user, temp_password) = provision_login(db.as_ref(), &company, &CreateLogin {
        first_name: payload.first_name.clone(),
        last_name: payload.last_name.clone(),
        email: payload.email.clone(),
        role: payload.role.clone(),
        joined_on: payload.joined_on,
    }).await?;

    let employee = insert_profile(db.as_ref(), &company, &user, &payload).await?;

    Ok(HttpResponse::Created()
        .json(web::Json(ProvisionedEmployee {
            employee,
            login_id: user.login_id,
            temp_password,
        })))
}

async fn insert_profile(db: &DatabaseConnection, company: &company::Model, user: &user::Model, details: &CreateEmployee) -> Result<employee::Model, ApiError> {
    for _ in 0..consts::MAX_ID_ATTEMPTS {
        let employee_code = ident::next_employee_code(db, company.id, &details.first_name, &details.last_name, details.joined_on).await?;

        let model = employee::ActiveModel {
            created_at: Set(Local::now().fixed_offset()),
            updated_at: Set(Local::now().fixed_offset()),
            company_id: Set(company.id),
            user_id: Set(Some(user.id)),
            employee_code: Set(employee_code),
            first_name: Set(details.first_name.trim().to_string()),
            last_name: Set(details.last_name.trim().to_string()),
            email: Set(details.email.trim().to_lowercase()),
            designation: Set(details.designation.clone()),
            department: Set(details.department.clone()),
            gross_salary: Set(details.gross_salary),
            joined_on: Set(details.joined_on),
            ..Default::default()
        };

        match Employee::insert(model).exec_with_returning(db).await {
            Ok(employee) => return Ok(employee),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => continue,
            Err(err) => return Err(err.into()),
        }
    }

    Err(ApiError::Db(DbErr::Custom("employee code allocation kept conflicting".to_string())))
}

#[get("")]
async fn list_employees(db: web::Data<DatabaseConnection>, hr: Hr) -> Result<HttpResponse, ApiError> {
    let employees = Employee::find()
        .filter(employee::Column::CompanyId.eq(hr.company_id))
        .all(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(employees)))
}
