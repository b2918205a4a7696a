use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use laxhq_core::LaxError;

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<LaxError>() {
            match e {
                LaxError::MemberNotFound(_)
                | LaxError::TeamNotFound(_)
                | LaxError::ClubNotFound(_)
                | LaxError::EntitlementNotFound(_)
                | LaxError::UnknownProduct(_) => StatusCode::NOT_FOUND,
                LaxError::MemberExists(_)
                | LaxError::TeamExists(_)
                | LaxError::ClubExists(_)
                | LaxError::AlreadyOnRoster { .. } => StatusCode::CONFLICT,
                LaxError::NotInitialized
                | LaxError::InvalidId(_)
                | LaxError::InvalidRole(_)
                | LaxError::InvalidCapability(_)
                | LaxError::InvalidCatalog(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {:#}", self.0);
        }
        let body = serde_json::json!({ "error": format!("{:#}", self.0) });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError(LaxError::MemberNotFound("jane".to_string()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = AppError(LaxError::TeamExists("varsity".to_string()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_errors_map_to_500() {
        let err = AppError(anyhow::anyhow!("boom"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
