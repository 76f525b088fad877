//! Authentication and the credential collaborator

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (customer ID)
    pub sub: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `customer_id` - Customer identifier
/// * `roles` - The customer's roles
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    customer_id: &str,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: customer_id.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            AuthError::TokenExpired
        } else {
            AuthError::InvalidToken
        }
    })?;

    Ok(token_data.claims)
}

/// Checks if the claims carry the required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == "admin")
}

/// Role names issued at login
pub mod roles {
    pub const CUSTOMER: &str = "customer";
    pub const ADMIN: &str = "admin";
}

/// One-way password hashing with constant-time verification
///
/// Wraps bcrypt; the cost is configurable so tests can trade strength
/// for speed.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Creates a hasher at the library's default cost
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Creates a hasher with an explicit cost factor
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes a plain-text password
    pub fn hash(&self, plain: &str) -> Result<String, AuthError> {
        hash(plain, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Verifies a plain-text password against a stored hash
    ///
    /// An undecodable hash counts as a failed verification rather than an
    /// error surface for the caller.
    pub fn verify(&self, plain: &str, hashed: &str) -> bool {
        verify(plain, hashed).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
