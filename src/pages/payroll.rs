use std::collections::BTreeMap;

use actix_web::{get, post, put, web, HttpResponse};
use chrono::{Datelike as _, Local};
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::{Hr, PayrollAccess}, consts, entity::{attendance, employee, leave, payroll, prelude::*, sea_orm_active_enums::{AttendanceStatus, LeaveStatus, PayCycle, PayrollStatus}, settings}, error::ApiError, utils};

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(list_payroll)
        .service(payroll_summary)
        .service(payroll_reports)
        .service(process_payroll)
        .service(get_settings)
        .service(update_settings);
}

/// Flat percentage model: the stored basic/HRA/bonus/other fields take no
/// part in the calculation.
fn compute_pay(gross_salary: f64, pf_percentage: f64, tax_percentage: f64) -> (f64, f64) {
    let deductions = gross_salary * (pf_percentage + tax_percentage) / 100.0;

    (deductions, gross_salary - deductions)
}

/// Sums processed records into (year, month) buckets of their creation
/// time, ascending, keeping only the newest buckets.
fn monthly_trend(records: &[payroll::Model]) -> Vec<TrendBucket> {
    let mut buckets: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();

    for record in records {
        let bucket = buckets.entry((record.created_at.year(), record.created_at.month())).or_default();

        bucket.0 += record.net_pay;
        bucket.1 += record.deductions;
    }

    let mut trend: Vec<TrendBucket> = buckets.into_iter()
        .map(|((year, month), (payout, deductions))| TrendBucket {
            label: utils::month_label(month).to_string(),
            year,
            month,
            payout,
            deductions,
        })
        .collect();

    if trend.len() > consts::TREND_MONTHS {
        trend = trend.split_off(trend.len() - consts::TREND_MONTHS);
    }

    trend
}

fn department_distribution(employees: &[employee::Model]) -> Vec<DepartmentBucket> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();

    for department in employees.iter().filter_map(|employee| employee.department.as_deref()) {
        *counts.entry(department).or_default() += 1;
    }

    counts.into_iter()
        .map(|(department, count)| DepartmentBucket { department: department.to_string(), count })
        .collect()
}

fn summarize(trend: &[TrendBucket], total_employees: u64) -> PayrollSummary {
    let total_payout: f64 = trend.iter().map(|bucket| bucket.payout).sum();
    let total_deductions: f64 = trend.iter().map(|bucket| bucket.deductions).sum();

    let average_payout = if trend.is_empty() { 0.0 } else { total_payout / trend.len() as f64 };

    PayrollSummary {
        total_payout,
        average_payout,
        total_deductions,
        total_employees,
    }
}

/// The newest settings version wins; a payroll run keeps whatever it read
/// even if a new version lands mid-flight.
async fn effective_settings(db: &DatabaseConnection) -> Result<Option<settings::Model>, ApiError> {
    Ok(Settings::find()
        .order_by_desc(settings::Column::CreatedAt)
        .one(db).await?)
}

#[post("/process/{employee_id}")]
async fn process_payroll(db: web::Data<DatabaseConnection>, _officer: PayrollAccess, employee: employee::Model) -> Result<HttpResponse, ApiError> {
    let (pf_percentage, tax_percentage) = effective_settings(db.as_ref()).await?
        .map(|settings| (settings.pf_percentage, settings.tax_percentage))
        .unwrap_or((consts::DEFAULT_PF_PERCENTAGE, consts::DEFAULT_TAX_PERCENTAGE));

    let (deductions, net_pay) = compute_pay(employee.gross_salary, pf_percentage, tax_percentage);

    let attendance_days = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee.id))
        .filter(attendance::Column::Status.is_in([AttendanceStatus::Present, AttendanceStatus::Late]))
        .count(db.as_ref()).await? as i32;

    let approved_leaves = Leave::find()
        .filter(leave::Column::EmployeeId.eq(employee.id))
        .filter(leave::Column::Status.eq(LeaveStatus::Approved))
        .count(db.as_ref()).await? as i32;

    let existing = Payroll::find()
        .filter(payroll::Column::EmployeeId.eq(employee.id))
        .one(db.as_ref()).await?;

    let employee_name = format!("{} {}", employee.first_name, employee.last_name);

    // One payroll row per employee; a re-run overwrites it, so the stored
    // values always reflect the latest processing.
    let record = match existing {
        Some(record) => {
            Payroll::update(payroll::ActiveModel {
                id: Unchanged(record.id),
                updated_at: Set(Local::now().fixed_offset()),
                employee_name: Set(employee_name),
                department: Set(employee.department.clone()),
                gross_salary: Set(employee.gross_salary),
                attendance_days: Set(attendance_days),
                approved_leaves: Set(approved_leaves),
                deductions: Set(deductions),
                net_pay: Set(net_pay),
                status: Set(PayrollStatus::Processed),
                ..Default::default()
            }).exec(db.as_ref()).await?
        },
        None => {
            Payroll::insert(payroll::ActiveModel {
                created_at: Set(Local::now().fixed_offset()),
                updated_at: Set(Local::now().fixed_offset()),
                company_id: Set(employee.company_id),
                employee_id: Set(employee.id),
                employee_name: Set(employee_name),
                department: Set(employee.department.clone()),
                gross_salary: Set(employee.gross_salary),
                attendance_days: Set(attendance_days),
                approved_leaves: Set(approved_leaves),
                deductions: Set(deductions),
                net_pay: Set(net_pay),
                status: Set(PayrollStatus::Processed),
                ..Default::default()
            }).exec_with_returning(db.as_ref()).await?
        },
    };

    Ok(HttpResponse::Ok()
        .json(web::Json(record)))
}

#[get("")]
async fn list_payroll(db: web::Data<DatabaseConnection>, officer: PayrollAccess) -> Result<HttpResponse, ApiError> {
    let records = Payroll::find()
        .filter(payroll::Column::CompanyId.eq(officer.company_id))
        .all(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(records)))
}

#[get("/summary")]
async fn payroll_summary(db: web::Data<DatabaseConnection>, officer: PayrollAccess) -> Result<HttpResponse, ApiError> {
    let records = Payroll::find()
        .filter(payroll::Column::CompanyId.eq(officer.company_id))
        .filter(payroll::Column::Status.eq(PayrollStatus::Processed))
        .all(db.as_ref()).await?;

    let total_employees = Employee::find()
        .filter(employee::Column::CompanyId.eq(officer.company_id))
        .count(db.as_ref()).await?;

    let trend = monthly_trend(&records);

    Ok(HttpResponse::Ok()
        .json(web::Json(summarize(&trend, total_employees))))
}

#[get("/reports")]
async fn payroll_reports(db: web::Data<DatabaseConnection>, officer: PayrollAccess) -> Result<HttpResponse, ApiError> {
    let records = Payroll::find()
        .filter(payroll::Column::CompanyId.eq(officer.company_id))
        .filter(payroll::Column::Status.eq(PayrollStatus::Processed))
        .all(db.as_ref()).await?;

    let employees = Employee::find()
        .filter(employee::Column::CompanyId.eq(officer.company_id))
        .all(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(PayrollReports {
            monthly_trend: monthly_trend(&records),
            department_distribution: department_distribution(&employees),
        })))
}

#[get("/settings")]
async fn get_settings(db: web::Data<DatabaseConnection>, _officer: PayrollAccess) -> Result<HttpResponse, ApiError> {
    let view = effective_settings(db.as_ref()).await?
        .map(SettingsView::from)
        .unwrap_or_default();

    Ok(HttpResponse::Ok()
        .json(web::Json(view)))
}

fn validate_settings(update: &SettingsUpdate) -> Result<(), ApiError> {
    let percentages = [
        ("pf_percentage", update.pf_percentage),
        ("tax_percentage", update.tax_percentage),
        ("basic_percentage", update.basic_percentage),
        ("hra_percentage", update.hra_percentage),
        ("bonus_percentage", update.bonus_percentage),
    ];

    for (field, value) in percentages {
        if !(0.0..=100.0).contains(&value) {
            return Err(ApiError::InvalidInput(format!("{field} must be between 0 and 100")))
        }
    }

    if update.other_deductions < 0.0 {
        return Err(ApiError::InvalidInput("other_deductions must not be negative".to_string()))
    }

    if !(1..=31).contains(&update.pay_date) {
        return Err(ApiError::InvalidInput("pay_date must be a day of month between 1 and 31".to_string()))
    }

    Ok(())
}

#[put("/settings")]
async fn update_settings(db: web::Data<DatabaseConnection>, hr: Hr, payload: web::Json<SettingsUpdate>) -> Result<HttpResponse, ApiError> {
    validate_settings(&payload)?;

    // Appends a version instead of overwriting, so in-flight payroll runs
    // keep the percentages they started with.
    let model = Settings::insert(settings::ActiveModel {
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        pf_percentage: Set(payload.pf_percentage),
        tax_percentage: Set(payload.tax_percentage),
        basic_percentage: Set(payload.basic_percentage),
        hra_percentage: Set(payload.hra_percentage),
        other_deductions: Set(payload.other_deductions),
        bonus_percentage: Set(payload.bonus_percentage),
        pay_cycle: Set(payload.pay_cycle.clone()),
        pay_date: Set(payload.pay_date),
        updated_by: Set(Some(hr.id)),
        ..Default::default()
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(model)))
}
