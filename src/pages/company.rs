use actix_web::{post, web, HttpResponse};
use chrono::Local;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, SqlErr};
use serde::{Deserialize, Serialize};

use crate::{auth::Authority, credential, entity::{company, prelude::*}, error::ApiError};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(register)
        .service(login);
}

#[derive(Debug, Serialize, Deserialize)]
struct RegisterCompany {
    name: String,
    code: String,
    email: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompanyLogin {
    email: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompanySession {
    token: String,
    company: company::Model,
}

#[post("/register")]
async fn register(db: web::Data<DatabaseConnection>, payload: web::Json<RegisterCompany>) -> Result<HttpResponse, ApiError> {
    let name = payload.name.trim();
    let code = payload.code.trim().to_uppercase();
    let email = payload.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() {
        return Err(ApiError::InvalidInput("name and email are required".to_string()))
    }

    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::InvalidInput("company code must be alphanumeric".to_string()))
    }

    if payload.password.len() < 6 {
        return Err(ApiError::InvalidInput("password must be at least 6 characters".to_string()))
    }

    let model = company::ActiveModel {
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        name: Set(name.to_string()),
        code: Set(code),
        email: Set(email.clone()),
        password: Set(credential::hash_secret(&payload.password, &email)),
        ..Default::default()
    };

    let company = match Company::insert(model).exec_with_returning(db.as_ref()).await {
        Ok(company) => company,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(ApiError::InvalidInput("company code or email is already registered".to_string()))
        },
        Err(err) => return Err(err.into()),
    };

    Ok(HttpResponse::Created()
        .json(web::Json(company)))
}

#[post("/login")]
async fn login(db: web::Data<DatabaseConnection>, authority: web::Data<Authority>, credentials: web::Json<CompanyLogin>) -> Result<HttpResponse, ApiError> {
    let email = credentials.email.trim().to_lowercase();

    let hashed = credential::hash_secret(&credentials.password, &email);

    let Some(company) = Company::find()
        .filter(company::Column::Email.eq(&email))
        .filter(company::Column::Password.eq(hashed))
        .one(db.get_ref()).await?
    else {
        return Err(ApiError::BadCredentials)
    };

    Ok(HttpResponse::Ok()
        .json(web::Json(CompanySession {
            token: authority.issue_for(&company),
            company,
        })))
}
