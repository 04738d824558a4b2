use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::AppError;
use uuid::Uuid;

/// Issuer stamped on and required of access tokens.
pub const TOKEN_ISSUER: &str = "tubely-access";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 token validation (and issuance, for tooling and tests)
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign an access token for `user_id` valid for `expires_in`.
    pub fn issue(&self, user_id: Uuid, expires_in: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate signature, issuer and expiry; return the user id from `sub`.
    pub fn validate(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Couldn't validate JWT: {}", e)))?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid subject in JWT".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-min-32-characters-long";

    #[test]
    fn test_issue_then_validate_returns_subject() {
        let service = JwtService::new(SECRET);
        let user_id = Uuid::new_v4();
        let token = service.issue(user_id, Duration::hours(1)).unwrap();
        assert_eq!(service.validate(&token).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = JwtService::new(SECRET)
            .issue(Uuid::new_v4(), Duration::hours(1))
            .unwrap();
        let err = JwtService::new("another-secret").validate(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let service = JwtService::new(SECRET);
        let token = service.issue(Uuid::new_v4(), Duration::hours(-2)).unwrap();
        assert!(matches!(
            service.validate(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_non_uuid_subject_is_unauthorized() {
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: "not-a-uuid".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            JwtService::new(SECRET).validate(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        assert!(JwtService::new(SECRET).validate("not.a.jwt").is_err());
    }
}
