use actix_web::{HttpMessage, dev::ServiceRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
};

/// Session entry holding the signed-in user's token.
pub const SESSION_TOKEN_KEY: &str = "token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub user_id: Uuid,
    pub email: String,
    pub exp: usize,
}

pub struct ClaimsSpec {
    pub user_id: Uuid,
    pub email: String,
}

/// Generates JWT token based on user object and JWT configuration options
pub fn generate_jwt(spec: ClaimsSpec, config: &JwtConfig) -> Res<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.expiration_hours))
        .ok_or_else(|| AppError::Internal("Token expiration overflow".to_string()))?
        .timestamp();

    let claims = JwtClaims {
        user_id: spec.user_id,
        email: spec.email,
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims object from JWT token.
/// Requires JWT secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Claims stored by the extraction middleware, if the session carried a valid token.
///
/// A rejected token is only logged at debug level; callers decide what to send.
pub fn session_claims(req: &ServiceRequest) -> Option<JwtClaims> {
    match req.extensions().get::<Res<JwtClaims>>() {
        Some(Ok(claims)) => Some(claims.clone()),
        Some(Err(err)) => {
            log::debug!("Session token rejected: {}", err);
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 1,
        }
    }

    #[test]
    fn issued_token_carries_user() {
        let user_id = Uuid::new_v4();
        let cfg = config("a-test-secret-that-is-long-enough-000");
        let token = generate_jwt(
            ClaimsSpec {
                user_id,
                email: "user@nextmail.com".to_string(),
            },
            &cfg,
        )
        .unwrap();

        let claims = validate_jwt(&token, &cfg.secret).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "user@nextmail.com");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = generate_jwt(
            ClaimsSpec {
                user_id: Uuid::new_v4(),
                email: "user@nextmail.com".to_string(),
            },
            &config("a-test-secret-that-is-long-enough-000"),
        )
        .unwrap();

        let res = validate_jwt(&token, "another-secret-that-is-long-enough-111");
        assert!(matches!(res, Err(AppError::JWT(_))));
    }

    #[test]
    fn session_claims_reads_extraction_result() {
        let req = actix_web::test::TestRequest::default().to_srv_request();
        assert!(session_claims(&req).is_none());

        let expired = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        req.extensions_mut()
            .insert::<Res<JwtClaims>>(Err(AppError::JWT(expired)));
        assert!(session_claims(&req).is_none());

        let claims = JwtClaims {
            user_id: Uuid::new_v4(),
            email: "user@nextmail.com".to_string(),
            exp: 0,
        };
        req.extensions_mut().insert::<Res<JwtClaims>>(Ok(claims.clone()));
        assert_eq!(session_claims(&req).map(|c| c.user_id), Some(claims.user_id));
    }
}
