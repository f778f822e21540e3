use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token generation failed: {0}")]
    TokenGeneration(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, username: &str, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username: username.to_string(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Mints and verifies HS256 bearer tokens. Constructed once in `main` and
/// handed to the router so the signing key never lives in a global.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl TokenService {
    pub fn new(secret: &str, expiry_hours: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Issue a token for a freshly authenticated user.
    pub fn mint(&self, user_id: i64, username: &str) -> Result<String, AuthError> {
        self.encode_claims(&Claims::new(user_id, username, self.expiry_hours as i64))
    }

    /// Validate signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }
}

/// Argon2id password hashing with per-password random salt.
#[derive(Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    pub fn new() -> Self {
        Self
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Returns `Ok(false)` for a wrong password; `Err` only for malformed
    /// hashes or hasher failures.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_then_verify_roundtrip() {
        let tokens = TokenService::new("test-secret", 1);
        let token = tokens.mint(42, "maria").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "maria");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let ours = TokenService::new("secret-a", 1);
        let theirs = TokenService::new("secret-b", 1);

        let token = theirs.mint(1, "maria").unwrap();
        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let tokens = TokenService::new("test-secret", 1);
        // Expired two hours ago, well past the default validation leeway
        let stale = Claims::new(1, "maria", -2);
        let token = tokens.encode_claims(&stale).unwrap();

        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn rejects_garbage_token() {
        let tokens = TokenService::new("test-secret", 1);
        assert!(tokens.verify("not-a-jwt").is_err());
    }

    #[test]
    fn password_hash_verify_roundtrip() {
        let passwords = PasswordService::new();
        let hash = passwords.hash("s3nha-forte").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(passwords.verify("s3nha-forte", &hash).unwrap());
        assert!(!passwords.verify("senha-errada", &hash).unwrap());
    }

    #[test]
    fn verify_fails_on_malformed_hash() {
        let passwords = PasswordService::new();
        assert!(passwords.verify("qualquer", "not-a-phc-string").is_err());
    }
}
