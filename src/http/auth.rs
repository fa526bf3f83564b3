//! Login, registration and logout handlers, plus the bearer-token gate.

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

use crate::auth_service::{AuthService, Credentials, IssuedToken, RegisterUser};
use crate::entity::user;
use crate::error::{Error, Result};

/// Raw token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. A missing header, another
/// scheme or an empty token rejects with `Unauthorized`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(Error::Unauthorized)?;

        parse_bearer(value).map(|token| Self(token.to_owned()))
    }
}

fn parse_bearer(value: &str) -> Result<&str> {
    let (scheme, token) = value.trim().split_once(' ').ok_or(Error::Unauthorized)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(Error::Unauthorized);
    }
    Ok(token)
}

/// Middleware for gated routes.
///
/// Resolves the bearer token and stores the resulting
/// [`AuthenticatedUser`](crate::AuthenticatedUser) in the request extensions
/// before handing the request on.
pub async fn require_auth(
    State(auth): State<AuthService>,
    BearerToken(token): BearerToken,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let caller = auth.authenticate(&token).await?;
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTimeWithTimeZone,
    pub user: user::Model,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: "Bearer",
            expires_at: issued.expires_at,
            user: issued.user,
        }
    }
}

/// `POST /register`
pub async fn register(
    State(auth): State<AuthService>,
    payload: Result<Json<RegisterUser>, JsonRejection>,
) -> Result<(StatusCode, Json<user::Model>)> {
    let Json(input) = payload?;
    let user = auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /login`
pub async fn login(
    State(auth): State<AuthService>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(credentials) = payload?;
    let issued = auth.login(credentials).await?;
    Ok(Json(issued.into()))
}

/// `POST /logout`. Revokes the token the request was made with.
pub async fn logout(
    State(auth): State<AuthService>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode> {
    auth.logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Bearer abc123", "abc123")]
    #[case("bearer abc123", "abc123")]
    #[case("BEARER   abc123  ", "abc123")]
    fn bearer_scheme_is_case_insensitive(#[case] header: &str, #[case] expected: &str) {
        assert_eq!(parse_bearer(header).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("Bearer")]
    #[case("Bearer    ")]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("abc123")]
    fn malformed_headers_are_unauthorized(#[case] header: &str) {
        assert!(matches!(parse_bearer(header), Err(Error::Unauthorized)));
    }
}
