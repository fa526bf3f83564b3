//! Maps [`Error`] onto HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::Error;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::InvalidCredentials | Error::Unauthorized | Error::InvalidToken => {
            StatusCode::UNAUTHORIZED
        }
        Error::DuplicateIdentity(_) => StatusCode::CONFLICT,
        Error::NotFound { .. } | Error::UnknownKey { .. } => StatusCode::NOT_FOUND,
        Error::Database(_) | Error::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        // Do not leak backend details to clients.
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: self.code().to_owned(),
            message,
        };
        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use sea_orm::DbErr;

    use super::*;

    async fn render(err: Error) -> (StatusCode, Option<HeaderValue>, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let challenge = response.headers().get(header::WWW_AUTHENTICATE).cloned();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, challenge, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (Error::InvalidInput("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (Error::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (Error::Unauthorized, StatusCode::UNAUTHORIZED),
            (Error::InvalidToken, StatusCode::UNAUTHORIZED),
            (Error::DuplicateIdentity("a@x.com".into()), StatusCode::CONFLICT),
            (Error::NotFound { entity: "book", id: 7 }, StatusCode::NOT_FOUND),
            (
                Error::UnknownKey { entity: "book", key: "abc".into() },
                StatusCode::NOT_FOUND,
            ),
        ];

        for (err, expected) in cases {
            let code = err.code();
            let (status, _, body) = render(err).await;
            assert_eq!(status, expected);
            assert_eq!(body.error, code);
        }
    }

    #[tokio::test]
    async fn unauthorized_responses_carry_a_bearer_challenge() {
        let (_, challenge, body) = render(Error::Unauthorized).await;
        assert_eq!(challenge, Some(HeaderValue::from_static("Bearer")));
        assert_eq!(body.error, "unauthorized");

        let (_, challenge, _) = render(Error::NotFound { entity: "book", id: 1 }).await;
        assert!(challenge.is_none());
    }

    #[tokio::test]
    async fn internal_errors_are_redacted() {
        let err = Error::Database(DbErr::Custom("relation \"books\" does not exist".into()));
        let (status, _, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "internal_error");
        assert_eq!(body.message, "internal server error");
    }

    #[tokio::test]
    async fn not_found_names_the_missing_record() {
        let (_, _, body) = render(Error::NotFound { entity: "book", id: 42 }).await;
        assert_eq!(body.message, "book 42 not found");
    }
}
