// JWT token generation and validation service

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::auth::{error::AuthError, middleware::AuthContext, models::Role};

/// Default token lifetime: one day
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 86_400;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

impl Claims {
    /// Identity carried by the token
    pub fn identity(&self) -> AuthContext {
        AuthContext {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Token service for JWT operations
pub struct TokenService {
    secret: String,
    ttl_seconds: i64,
}

impl TokenService {
    /// Create a new TokenService with secret key and token lifetime
    pub fn new(secret: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    /// Sign a token for the given identity
    pub fn sign(&self, id: i32, email: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_token_service() -> TokenService {
        TokenService::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS)
    }

    fn encode_claims(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_sign_then_verify_round_trips_identity() {
        let service = test_token_service();
        let token = service.sign(42, "user@example.com", Role::Admin).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_identity_matches_claims() {
        let service = test_token_service();
        let token = service.sign(7, "seven@example.com", Role::User).unwrap();
        let identity = service.verify(&token).unwrap().identity();

        assert_eq!(
            identity,
            AuthContext {
                id: 7,
                email: "seven@example.com".to_string(),
                role: Role::User,
            }
        );
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: 1,
            email: "test@example.com".to_string(),
            role: Role::User,
            iat: now - 1000,
            exp: now - 500,
        };
        let token = encode_claims(&claims, SECRET);

        let result = test_token_service().verify(&token);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = test_token_service();
        let token = service.sign(1, "user@example.com", Role::User).unwrap();

        // Swap the payload for one claiming the admin role
        let forged_claims = Claims {
            id: 1,
            email: "user@example.com".to_string(),
            role: Role::Admin,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 60,
        };
        let forged = encode_claims(&forged_claims, "some_other_secret");
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let tampered = parts.join(".");

        assert!(matches!(service.verify(&tampered), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1", 60);
        let service2 = TokenService::new("secret2", 60);

        let token = service1.sign(1, "test@example.com", Role::User).unwrap();

        assert!(service1.verify(&token).is_ok());
        assert!(matches!(service2.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.verify("").is_err());
        assert!(service.verify("not.a.token").is_err());
        assert!(service.verify("invalid_token_format").is_err());
        assert!(service
            .verify("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_token_missing_role_is_rejected() {
        #[derive(Serialize)]
        struct LegacyClaims {
            id: i32,
            email: String,
            exp: i64,
        }

        let legacy = LegacyClaims {
            id: 1,
            email: "old@example.com".to_string(),
            exp: Utc::now().timestamp() + 600,
        };
        let token = encode(
            &Header::default(),
            &legacy,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            test_token_service().verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    proptest! {
        #[test]
        fn prop_claims_round_trip(
            id in 1i32..1_000_000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)",
            admin in any::<bool>()
        ) {
            let role = if admin { Role::Admin } else { Role::User };
            let service = test_token_service();
            let token = service.sign(id, &email, role)?;
            let claims = service.verify(&token)?;

            prop_assert_eq!(claims.id, id);
            prop_assert_eq!(claims.email, email);
            prop_assert_eq!(claims.role, role);
        }

        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let result = test_token_service().verify(&malformed);
            prop_assert!(result.is_err());
        }
    }
}
