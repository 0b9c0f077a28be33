use actix_web::{get, post, put, web, HttpResponse, Responder};
use chrono::Local;
use sea_orm::{prelude::Date, ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr};
use serde::{Deserialize, Serialize};

use crate::{auth::{Authority, Hr}, consts, credential, entity::{company, prelude::*, sea_orm_active_enums::RoleType, user}, error::ApiError, ident};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_login)
        .service(login)
        .service(whoami)
        .service(change_password);
}

#[derive(Debug, Serialize, Deserialize)]
struct Login {
    login_id: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Session {
    token: String,
    user: user::Model,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CreateLogin {
    pub(super) first_name: String,
    pub(super) last_name: String,
    pub(super) email: String,
    pub(super) role: RoleType,
    pub(super) joined_on: Date,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProvisionedLogin {
    user: user::Model,
    /// Returned exactly once, for manual hand-off; only the hash is stored.
    temp_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChangePassword {
    current_password: String,
    new_password: String,
}

#[post("/create")]
async fn create_login(db: web::Data<DatabaseConnection>, hr: Hr, payload: web::Json<CreateLogin>) -> Result<HttpResponse, ApiError> {
    let Some(company) = Company::find_by_id(hr.company_id).one(db.as_ref()).await? else {
        return Err(ApiError::NotFound("company not found".to_string()))
    };

    let (user, temp_password) = provision_login(db.as_ref(), &company, &payload).await?;

    Ok(HttpResponse::Created()
        .json(web::Json(ProvisionedLogin { user, temp_password })))
}

/// Allocates a login id, draws the one-time password and writes the
/// account. When a concurrent allocation takes the same serial the unique
/// index rejects the insert and the loop re-counts.
pub(super) async fn provision_login(db: &DatabaseConnection, company: &company::Model, details: &CreateLogin) -> Result<(user::Model, String), ApiError> {
    for _ in 0..consts::MAX_ID_ATTEMPTS {
        let login_id = ident::next_login_id(db, company, &details.first_name, &details.last_name, details.joined_on).await?;

        let plaintext = credential::temp_password(consts::TEMP_PASSWORD_BYTES)?;

        let model = user::ActiveModel {
            created_at: Set(Local::now().fixed_offset()),
            updated_at: Set(Local::now().fixed_offset()),
            company_id: Set(company.id),
            login_id: Set(login_id.clone()),
            first_name: Set(details.first_name.trim().to_string()),
            last_name: Set(details.last_name.trim().to_string()),
            email: Set(details.email.trim().to_lowercase()),
            password: Set(credential::hash_secret(&plaintext, &login_id)),
            role: Set(details.role.clone()),
            joined_on: Set(details.joined_on),
            ..Default::default()
        };

        match User::insert(model).exec_with_returning(db).await {
            Ok(user) => return Ok((user, plaintext)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => continue,
            Err(err) => return Err(err.into()),
        }
    }

    Err(ApiError::Db(DbErr::Custom("login id allocation kept conflicting".to_string())))
}

#[post("/login")]
async fn login(db: web::Data<DatabaseConnection>, authority: web::Data<Authority>, credentials: web::Json<Login>) -> Result<HttpResponse, ApiError> {
    let hashed = credential::hash_secret(&credentials.password, &credentials.login_id);

    let Some(user) = User::find()
        .filter(user::Column::LoginId.eq(&credentials.login_id))
        .filter(user::Column::Password.eq(hashed))
        .one(db.get_ref()).await?
    else {
        return Err(ApiError::BadCredentials)
    };

    Ok(HttpResponse::Ok()
        .json(web::Json(Session {
            token: authority.issue_for(&user),
            user,
        })))
}

#[get("")]
async fn whoami(user: user::Model) -> impl Responder {
    web::Json(user)
}

#[put("/change-password")]
async fn change_password(db: web::Data<DatabaseConnection>, user: user::Model, payload: web::Json<ChangePassword>) -> Result<HttpResponse, ApiError> {
    if payload.new_password.len() < 6 {
        return Err(ApiError::InvalidInput("new password must be at least 6 characters".to_string()))
    }

    // The token embeds a snapshot of the user; re-read so the comparison
    // runs against the current hash.
    let Some(stored) = User::find_by_id(user.id).one(db.as_ref()).await? else {
        return Err(ApiError::NotFound("account not found".to_string()))
    };

    if stored.password != credential::hash_secret(&payload.current_password, &stored.login_id) {
        return Err(ApiError::BadCredentials)
    }

    let updated = User::update(user::ActiveModel {
        id: Unchanged(stored.id),
        updated_at: Set(Local::now().fixed_offset()),
        password: Set(credential::hash_secret(&payload.new_password, &stored.login_id)),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(updated)))
}
