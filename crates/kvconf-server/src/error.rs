use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kvconf_consul::kvconf_core::ConfigError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    /// Error del cliente de configuracion
    Config(ConfigError),

    /// Parametros invalidos
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(err) => match err {
                ConfigError::NotFound { .. } => StatusCode::NOT_FOUND,
                ConfigError::Unreachable { .. } | ConfigError::InvalidResponse { .. } => {
                    StatusCode::BAD_GATEWAY
                },
                ConfigError::InvalidNumber { .. } | ConfigError::InvalidBoolean { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                },
                ConfigError::InitializationFailed(_) | ConfigError::InvalidSettings(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                },
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Config(err) => err.to_string(),
            AppError::BadRequest(msg) => msg,
        };

        let body = Json(ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(ConfigError::not_found("k")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ConfigError::unreachable("k", "refused")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(ConfigError::invalid_number("k", "abc")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::BadRequest("unknown scope".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
