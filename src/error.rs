use actix_web::{body, http::{header::ContentType, StatusCode}, HttpResponse};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Every handler failure funnels through here so the frontend always gets
/// a status code plus a `{"message": ...}` body it can display verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid credentials")]
    BadCredentials,

    #[error("database error")]
    Db(#[from] DbErr),

    #[error("unable to generate credentials")]
    Credential,
}

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
}

impl actix_web::error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        match self {
            ApiError::Db(err) => error!("database operation failed: {err}"),
            ApiError::Credential => error!("credential generation failed"),
            _ => {}
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(ErrorBody { message: self.to_string() })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) | ApiError::BadCredentials => StatusCode::BAD_REQUEST,
            ApiError::Db(_) | ApiError::Credential => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::error::ResponseError as _;

    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::BadCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Db(DbErr::Custom("x".into())).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Credential.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
