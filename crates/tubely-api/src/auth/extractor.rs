use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use tubely_core::AppError;
use uuid::Uuid;

use super::JwtService;
use crate::error::HttpAppError;
use crate::state::AuthState;

/// The token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Couldn't find JWT".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Malformed authorization header".to_string()))?;

    Ok(token)
}

/// Resolve the calling user from request headers.
pub fn authenticate(headers: &HeaderMap, jwt: &JwtService) -> Result<Uuid, AppError> {
    jwt.validate(bearer_token(headers)?)
}

/// Authenticated caller, extracted from the bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        let user_id = authenticate(&parts.headers, &auth.jwt)?;
        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-min-32-characters-long";

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_or_malformed_header_is_unauthorized() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AppError::Unauthorized(_))
        ));
        assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
    }

    #[tokio::test]
    async fn test_auth_user_extracted_from_auth_state() {
        let state = AuthState::new(JwtService::new(SECRET));
        let user_id = Uuid::new_v4();
        let token = state.jwt.issue(user_id, Duration::hours(1)).unwrap();
        let (mut parts, _) = Request::builder()
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(())
            .unwrap()
            .into_parts();

        let auth = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(auth.user_id, user_id);
    }

    #[tokio::test]
    async fn test_auth_user_rejects_foreign_signature() {
        let state = AuthState::new(JwtService::new(SECRET));
        let token = JwtService::new("another-secret-key-min-32-characters")
            .issue(Uuid::new_v4(), Duration::hours(1))
            .unwrap();
        let (mut parts, _) = Request::builder()
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(())
            .unwrap()
            .into_parts();

        let HttpAppError(err) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
