use actix_web::{get, post, put, web, HttpResponse};
use chrono::Local;
use sea_orm::{prelude::{Date, Time}, ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Hr, entity::{attendance, employee, prelude::*, sea_orm_active_enums::AttendanceStatus, user}, error::ApiError};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(mark_attendance)
        .service(employee_attendance)
        .service(attendance_by_date)
        .service(correct_attendance);
}

#[derive(Debug, Serialize, Deserialize)]
struct MarkAttendance {
    employee_id: Uuid,
    date: Date,
    status: AttendanceStatus,
    check_in: Option<Time>,
    check_out: Option<Time>,
    remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CorrectAttendance {
    status: AttendanceStatus,
    check_in: Option<Time>,
    check_out: Option<Time>,
    remarks: Option<String>,
}

fn check_times(check_in: Option<Time>, check_out: Option<Time>) -> Result<(), ApiError> {
    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        if check_out < check_in {
            return Err(ApiError::InvalidInput("check-out is earlier than check-in".to_string()))
        }
    }

    Ok(())
}

#[post("/mark")]
async fn mark_attendance(db: web::Data<DatabaseConnection>, hr: Hr, payload: web::Json<MarkAttendance>) -> Result<HttpResponse, ApiError> {
    check_times(payload.check_in, payload.check_out)?;

    let Some(employee) = Employee::find_by_id(payload.employee_id).one(db.as_ref()).await? else {
        return Err(ApiError::NotFound("employee not found".to_string()))
    };

    if employee.company_id != hr.company_id {
        return Err(ApiError::NotFound("employee not found".to_string()))
    }

    let existing = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee.id))
        .filter(attendance::Column::Date.eq(payload.date))
        .one(db.as_ref()).await?;

    // Keyed on (employee, date): marking the same day twice updates the
    // single row instead of duplicating it.
    match existing {
        Some(record) => {
            let model = Attendance::update(attendance::ActiveModel {
                id: Unchanged(record.id),
                updated_at: Set(Local::now().fixed_offset()),
                status: Set(payload.status.clone()),
                check_in: Set(payload.check_in),
                check_out: Set(payload.check_out),
                marked_by: Set(Some(hr.id)),
                remarks: Set(payload.remarks.clone()),
                ..Default::default()
            }).exec(db.as_ref()).await?;

            Ok(HttpResponse::Ok().json(web::Json(model)))
        },
        None => {
            let model = Attendance::insert(attendance::ActiveModel {
                created_at: Set(Local::now().fixed_offset()),
                updated_at: Set(Local::now().fixed_offset()),
                company_id: Set(employee.company_id),
                employee_id: Set(employee.id),
                date: Set(payload.date),
                status: Set(payload.status.clone()),
                check_in: Set(payload.check_in),
                check_out: Set(payload.check_out),
                marked_by: Set(Some(hr.id)),
                remarks: Set(payload.remarks.clone()),
                ..Default::default()
            }).exec_with_returning(db.as_ref()).await?;

            Ok(HttpResponse::Created().json(web::Json(model)))
        },
    }
}

#[get("/employee/{employee_id}")]
async fn employee_attendance(db: web::Data<DatabaseConnection>, employee: employee::Model) -> Result<HttpResponse, ApiError> {
    let records = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee.id))
        .all(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(records)))
}

#[get("/date/{date}")]
async fn attendance_by_date(db: web::Data<DatabaseConnection>, user: user::Model, date: web::Path<Date>) -> Result<HttpResponse, ApiError> {
    let records = Attendance::find()
        .filter(attendance::Column::CompanyId.eq(user.company_id))
        .filter(attendance::Column::Date.eq(date.into_inner()))
        .all(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(records)))
}

#[put("/update/{attendance_id}")]
async fn correct_attendance(db: web::Data<DatabaseConnection>, hr: Hr, record: attendance::Model, payload: web::Json<CorrectAttendance>) -> Result<HttpResponse, ApiError> {
    check_times(payload.check_in, payload.check_out)?;

    let model = Attendance::update(attendance::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        status: Set(payload.status.clone()),
        check_in: Set(payload.check_in),
        check_out: Set(payload.check_out),
        marked_by: Set(Some(hr.id)),
        remarks: Set(payload.remarks.clone()),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok()
        .json(web::Json(model)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};
    use chrono::{NaiveDate, NaiveTime};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{auth::Authority, entity::sea_orm_active_enums::RoleType};

    use super::*;

    fn sample_hr(company_id: Uuid) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            company_id,
            login_id: "ACMEJADO20250001".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@acme.example".to_string(),
            password: Vec::new(),
            role: RoleType::Hr,
            joined_on: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        }
    }

    fn sample_employee(company_id: Uuid) -> employee::Model {
        employee::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            company_id,
            user_id: None,
            employee_code: "BOSM20250001".to_string(),
            first_name: "Bob".to_string(),
            last_name: "Smith".to_string(),
            email: "bob@acme.example".to_string(),
            designation: None,
            department: Some("Finance".to_string()),
            gross_salary: 50_000.0,
            joined_on: NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
        }
    }

    fn sample_attendance(employee: &employee::Model, status: AttendanceStatus) -> attendance::Model {
        attendance::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            company_id: employee.company_id,
            employee_id: employee.id,
            date: NaiveDate::from_ymd_opt(2025, 7, 21).unwrap(),
            status,
            check_in: NaiveTime::from_hms_opt(9, 0, 0),
            check_out: None,
            marked_by: None,
            remarks: None,
        }
    }

    #[actix_web::test]
    async fn test_mark_attendance_inserts_first_mark() {
        let secret = b"secret";

        let hr = sample_hr(Uuid::new_v4());
        let employee = sample_employee(hr.company_id);
        let created = sample_attendance(&employee, AttendanceStatus::Present);

        let token = Authority::new(secret).issue_for(&hr);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ employee.clone() ],
            ])
            .append_query_results([
                vec![ ],
                vec![ created.clone() ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(mark_attendance)
        ).await;

        let req = test::TestRequest::default()
            .uri("/mark")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(MarkAttendance {
                employee_id: employee.id,
                date: created.date,
                status: AttendanceStatus::Present,
                check_in: created.check_in,
                check_out: None,
                remarks: None,
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let returned: attendance::Model = test::read_body_json(response).await;
        assert_eq!(returned, created);
    }

    #[actix_web::test]
    async fn test_mark_attendance_overwrites_same_day() {
        let secret = b"secret";

        let hr = sample_hr(Uuid::new_v4());
        let employee = sample_employee(hr.company_id);
        let existing = sample_attendance(&employee, AttendanceStatus::Present);
        let updated = attendance::Model {
            status: AttendanceStatus::Late,
            ..existing.clone()
        };

        let token = Authority::new(secret).issue_for(&hr);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ employee.clone() ],
            ])
            .append_query_results([
                vec![ existing.clone() ],
                vec![ updated.clone() ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(mark_attendance)
        ).await;

        let req = test::TestRequest::default()
            .uri("/mark")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(MarkAttendance {
                employee_id: employee.id,
                date: existing.date,
                status: AttendanceStatus::Late,
                check_in: existing.check_in,
                check_out: None,
                remarks: None,
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);

        let returned: attendance::Model = test::read_body_json(response).await;
        assert_eq!(returned.status, AttendanceStatus::Late);
        assert_eq!(returned.id, existing.id);
    }

    #[actix_web::test]
    async fn test_mark_attendance_rejects_inverted_times() {
        let secret = b"secret";

        let hr = sample_hr(Uuid::new_v4());
        let token = Authority::new(secret).issue_for(&hr);

        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(mark_attendance)
        ).await;

        let req = test::TestRequest::default()
            .uri("/mark")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(MarkAttendance {
                employee_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2025, 7, 21).unwrap(),
                status: AttendanceStatus::Present,
                check_in: NaiveTime::from_hms_opt(17, 0, 0),
                check_out: NaiveTime::from_hms_opt(9, 0, 0),
                remarks: None,
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
