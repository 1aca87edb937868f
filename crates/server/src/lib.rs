use std::collections::HashMap;

use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::ApiResponse;
pub use server::{app, run_with_listener};

mod accounts;
mod budgets;
mod categories;
mod investments;
mod server;
mod transactions;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(EngineError::Validation { field, message }) => {
                let mut errors = HashMap::new();
                errors.insert(field.to_string(), vec![message.clone()]);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiResponse::<()>::validation_error(message, errors),
                )
            }
            ServerError::Engine(err @ EngineError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, ApiResponse::error(err.to_string()))
            }
            ServerError::Engine(err @ EngineError::Forbidden(_)) => {
                (StatusCode::FORBIDDEN, ApiResponse::error(err.to_string()))
            }
            ServerError::Engine(EngineError::Database(db_err)) => {
                tracing::error!("database error: {db_err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("internal server error"),
                )
            }
            ServerError::Generic(message) => {
                (StatusCode::BAD_REQUEST, ApiResponse::error(message))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::validation("amount", "must be > 0"))
            .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::not_found("account")).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::forbidden("nope")).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "boom".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
