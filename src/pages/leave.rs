use actix_web::{get, post, put, web, HttpResponse};
use chrono::Local;
use sea_orm::{prelude::Date, ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::{auth::Hr, entity::{employee, leave, prelude::*, sea_orm_active_enums::LeaveStatus, user}, error::ApiError};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(request_leave)
        .service(list_leaves)
        .service(employee_leaves)
        .service(approve_leave)
        .service(reject_leave);
}

#[derive(Debug, Serialize, Deserialize)]
struct RequestLeave {
    leave_type: String,
    start_date: Date,
    end_date: Date,
    reason: Option<String>,
}

/// The only transitions are `pending -> approved` and `pending ->
/// rejected`. Re-applying the current terminal status is a no-op;
/// everything else is rejected, so a settled request can never go back to
/// pending.
fn next_status(current: &LeaveStatus, requested: LeaveStatus) -> Result<Option<LeaveStatus>, ApiError> {
    if *current == requested {
        return Ok(None)
    }

    match current {
        LeaveStatus::Pending => Ok(Some(requested)),
        _ => Err(ApiError::InvalidInput("leave request is already settled".to_string())),
    }
}

#[post("")]
async fn request_leave(db: web::Data<DatabaseConnection>, user: user::Model, payload: web::Json<RequestLeave>) -> Result<HttpResponse, ApiError> {
    if payload.leave_type.trim().is_empty() {
        return Err(ApiError::InvalidInput("leave type is required".to_string()))
    }

    if payload.end_date < payload.start_date {
        return Err(ApiError::InvalidInput("end date is earlier than start date".to_string()))
    }

    let Some(employee) = Employee::find()
        .filter(employee::Column::UserId.eq(user.id))
        .one(db.as_ref()).await?
    else {
        return Err(ApiError::NotFound("no employee profile for this account".to_string()))
    };

    let model = Leave::insert(leave::ActiveModel {
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        company_id: Set(employee.company_id),
        employee_id: Set(employee.id),
        employee_name: Set(format!("{} {}", employee.first_name, employee.last_name)),
        leave_type: Set(payload.leave_type.trim().to_string()),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        reason: Set(payload.reason.clone()),
        status: Set(LeaveStatus::Pending),
        ..Default::default()
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created()
        .json(web::Json(model)))
}

#[get("")]
async fn list_leaves(db: web::Data<DatabaseConnection>, hr: Hr) -> Result<HttpResponse, ApiError> {
    let records = Leave::find()
        .filter(leave::Column::CompanyId.eq(hr.company_id))
        .all(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(records)))
}

#[get("/employee/{employee_id}")]
async fn employee_leaves(db: web::Data<DatabaseConnection>, employee: employee::Model) -> Result<HttpResponse, ApiError> {
    let records = Leave::find()
        .filter(leave::Column::EmployeeId.eq(employee.id))
        .all(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(records)))
}

#[put("/approve/{leave_id}")]
async fn approve_leave(db: web::Data<DatabaseConnection>, _hr: Hr, record: leave::Model) -> Result<HttpResponse, ApiError> {
    settle(db.as_ref(), record, LeaveStatus::Approved).await
}

#[put("/reject/{leave_id}")]
async fn reject_leave(db: web::Data<DatabaseConnection>, _hr: Hr, record: leave::Model) -> Result<HttpResponse, ApiError> {
    settle(db.as_ref(), record, LeaveStatus::Rejected).await
}

async fn settle(db: &DatabaseConnection, record: leave::Model, requested: LeaveStatus) -> Result<HttpResponse, ApiError> {
    let Some(status) = next_status(&record.status, requested)? else {
        return Ok(HttpResponse::Ok().json(web::Json(record)))
    };

    let model = Leave::update(leave::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        status: Set(status),
        ..Default::default()
    }).exec(db).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(model)))
}
