use actix_web::{get, web, HttpResponse};
use sea_orm::{prelude::DateTimeWithTimeZone, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entity::{employee, payroll, prelude::*, sea_orm_active_enums::PayrollStatus}, error::ApiError};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(download_payslip)
        .service(get_payslip);
}

#[derive(Debug, Serialize, Deserialize)]
struct Payslip {
    employee_id: Uuid,
    employee_code: String,
    employee_name: String,
    department: Option<String>,
    gross_salary: f64,
    attendance_days: i32,
    approved_leaves: i32,
    deductions: f64,
    net_pay: f64,
    processed_on: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize, Deserialize)]
struct PayslipDocument {
    url: String,
}

async fn processed_payroll(db: &DatabaseConnection, employee: &employee::Model) -> Result<payroll::Model, ApiError> {
    let record = Payroll::find()
        .filter(payroll::Column::EmployeeId.eq(employee.id))
        .filter(payroll::Column::Status.eq(PayrollStatus::Processed))
        .one(db).await?;

    record.ok_or_else(|| ApiError::NotFound("no processed payroll for this employee".to_string()))
}

#[get("/{employee_id}")]
async fn get_payslip(db: web::Data<DatabaseConnection>, employee: employee::Model) -> Result<HttpResponse, ApiError> {
    let record = processed_payroll(db.as_ref(), &employee).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(Payslip {
            employee_id: employee.id,
            employee_code: employee.employee_code,
            employee_name: record.employee_name,
            department: record.department,
            gross_salary: record.gross_salary,
            attendance_days: record.attendance_days,
            approved_leaves: record.approved_leaves,
            deductions: record.deductions,
            net_pay: record.net_pay,
            processed_on: record.updated_at,
        })))
}

/// No document renderer exists; the dashboard gets a stable URL for the
/// processed record instead of a generated file.
#[get("/download/{employee_id}")]
async fn download_payslip(db: web::Data<DatabaseConnection>, employee: employee::Model) -> Result<HttpResponse, ApiError> {
    let record = processed_payroll(db.as_ref(), &employee).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(PayslipDocument {
            url: format!("/files/payslips/{}.pdf", record.id),
        })))
}
