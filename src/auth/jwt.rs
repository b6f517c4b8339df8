use jsonwebtoken::{decode, DecodingKey, Validation};
use std::env;

use super::model::Claims;

const DEFAULT_JWT_SECRET: &str = "hipaa-compliance-jwt-secret-change-in-production";

fn get_jwt_secret() -> String {
    env::var("SESSION_JWT_SECRET").unwrap_or_else(|_| {
        log::warn!("SESSION_JWT_SECRET not set, using default secret. SET THIS IN PRODUCTION!");
        DEFAULT_JWT_SECRET.to_string()
    })
}

/// Validate and decode a session token issued by the identity provider.
pub fn validate_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    validate_token_with_secret(token, &get_jwt_secret())
}

fn validate_token_with_secret(
    token: &str,
    secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trips() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "b9c3f9f4-0000-0000-0000-000000000001".to_string(),
            exp: now + 600,
            iat: now,
            email: Some("officer@example.com".to_string()),
        };
        let token = token_for(&claims, "secret-a");
        let decoded = validate_token_with_secret(&token, "secret-a").unwrap();
        assert_eq!(decoded.sub, claims.sub);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "user".to_string(),
            exp: now + 600,
            iat: now,
            email: None,
        };
        let token = token_for(&claims, "secret-a");
        assert!(validate_token_with_secret(&token, "secret-b").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "user".to_string(),
            exp: now.saturating_sub(3600),
            iat: now.saturating_sub(7200),
            email: None,
        };
        let token = token_for(&claims, "secret-a");
        assert!(validate_token_with_secret(&token, "secret-a").is_err());
    }
}
