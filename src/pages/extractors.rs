use std::str::FromStr;

use actix_web::{dev, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::{entity::{attendance, employee, leave, prelude::*, user}, error::ApiError};

/// Path-id extractors. Each resolves the record behind a path parameter
/// and checks it belongs to the caller's company; a record owned by
/// another tenant is indistinguishable from a missing one.

impl FromRequest for employee::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let user = user::Model::from_request(&req, &mut dev::Payload::None).await?;

            let employee_id = req.match_info().get("employee_id").expect("This extractor must be used under an `employee_id` path");
            let Ok(employee_id) = Uuid::from_str(employee_id) else {
                return Err(ApiError::InvalidInput("invalid `employee_id`".to_string()).into())
            };

            let db = req.app_data::<web::Data<DatabaseConnection>>().expect("DatabaseConnection must be attached");

            let employee = Employee::find_by_id(employee_id)
                .one(db.as_ref()).await.map_err(ApiError::from)?;

            match employee {
                Some(employee) if employee.company_id == user.company_id => Ok(employee),
                _ => Err(ApiError::NotFound("employee not found".to_string()).into()),
            }
        })
    }
}

impl FromRequest for attendance::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let user = user::Model::from_request(&req, &mut dev::Payload::None).await?;

            let attendance_id = req.match_info().get("attendance_id").expect("This extractor must be used under an `attendance_id` path");
            let Ok(attendance_id) = Uuid::from_str(attendance_id) else {
                return Err(ApiError::InvalidInput("invalid `attendance_id`".to_string()).into())
            };

            let db = req.app_data::<web::Data<DatabaseConnection>>().expect("DatabaseConnection must be attached");

            let record = Attendance::find_by_id(attendance_id)
                .one(db.as_ref()).await.map_err(ApiError::from)?;

            match record {
                Some(record) if record.company_id == user.company_id => Ok(record),
                _ => Err(ApiError::NotFound("attendance record not found".to_string()).into()),
            }
        })
    }
}

impl FromRequest for leave::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let user = user::Model::from_request(&req, &mut dev::Payload::None).await?;

            let leave_id = req.match_info().get("leave_id").expect("This extractor must be used under a `leave_id` path");
            let Ok(leave_id) = Uuid::from_str(leave_id) else {
                return Err(ApiError::InvalidInput("invalid `leave_id`".to_string()).into())
            };

            let db = req.app_data::<web::Data<DatabaseConnection>>().expect("DatabaseConnection must be attached");

            let record = Leave::find_by_id(leave_id)
                .one(db.as_ref()).await.map_err(ApiError::from)?;

            match record {
                Some(record) if record.company_id == user.company_id => Ok(record),
                _ => Err(ApiError::NotFound("leave request not found".to_string()).into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{get, http::StatusCode, test, App, Responder};
    use chrono::{Local, NaiveDate};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{auth::Authority, entity::sea_orm_active_enums::RoleType};

    use super::*;

    fn sample_user(company_id: Uuid) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            company_id,
            login_id: "ACMEBODO20250001".to_string(),
            first_name: "Bob".to_string(),
            last_name: "Doe".to_string(),
            email: "bob@acme.example".to_string(),
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
            employee_code: "JADO20250001".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@acme.example".to_string(),
            designation: Some("Engineer".to_string()),
            department: Some("Engineering".to_string()),
            gross_salary: 50_000.0,
            joined_on: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        }
    }

    #[get("/{employee_id}")]
    async fn test_handler(employee: employee::Model) -> impl Responder {
        web::Json(employee)
    }

    #[actix_web::test]
    async fn test_employee_extractor() {
        let secret = b"secret";

        let user = sample_user(Uuid::new_v4());
        let employee = sample_employee(user.company_id);

        let token = Authority::new(secret).issue_for(&user);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ employee.clone() ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(test_handler)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}", employee.id))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let returned: employee::Model = test::call_and_read_body_json(&app, req).await;
        assert_eq!(returned, employee);
    }

    #[actix_web::test]
    async fn test_employee_extractor_hides_other_companies() {
        let secret = b"secret";

        let user = sample_user(Uuid::new_v4());
        let foreign_employee = sample_employee(Uuid::new_v4());

        let token = Authority::new(secret).issue_for(&user);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ foreign_employee.clone() ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(test_handler)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}", foreign_employee.id))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_employee_extractor_rejects_malformed_ids() {
        let secret = b"secret";

        let user = sample_user(Uuid::new_v4());
        let token = Authority::new(secret).issue_for(&user);

        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(test_handler)
        ).await;

        let req = test::TestRequest::default()
            .uri("/not-a-uuid")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
