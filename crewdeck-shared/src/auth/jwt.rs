/// Session-bound JWTs
///
/// Tokens are HS256-signed and always carry a `sid` claim naming the login
/// session they were minted for. Signature and expiry are checked here;
/// whether the session behind `sid` is still alive is the auth extractor's
/// job, so revoking a session kills its tokens even though they still verify
/// cryptographically.
///
/// # Token Types
///
/// - **access** — 24 hours, sent with every API request
/// - **refresh** — 30 days, exchanged for new access tokens
///
/// # Example
///
/// ```
/// use crewdeck_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), TokenType::Access);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sid, claims.sid);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ISSUER: &str = "crewdeck";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// Access or refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    /// How long a freshly minted token of this type lives
    pub fn lifetime(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }
}

/// Claims carried by every crewdeck token
///
/// `sub`, `iss`, `iat`, `exp`, and `nbf` are the registered claims; `sid`
/// (session id) and `token_type` are ours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User the token authenticates
    pub sub: Uuid,

    /// Always "crewdeck"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Not valid before (Unix timestamp)
    pub nbf: i64,

    /// Login session the token is bound to
    pub sid: Uuid,

    /// Access or refresh
    pub token_type: TokenType,
}

impl Claims {
    /// Claims with the standard lifetime for the token type
    pub fn new(user_id: Uuid, session_id: Uuid, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, session_id, token_type, token_type.lifetime())
    }

    /// Claims with an explicit lifetime
    pub fn with_expiration(
        user_id: Uuid,
        session_id: Uuid,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let issued = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: issued.timestamp(),
            exp: (issued + expires_in).timestamp(),
            nbf: issued.timestamp(),
            sid: session_id,
            token_type,
        }
    }
}

/// Signs claims into a compact JWT
///
/// # Errors
///
/// Returns `JwtError::CreateError` when encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Verifies a token's signature, expiry, `nbf`, and issuer
///
/// Does NOT consult the database; a verified token may still belong to a
/// revoked session.
///
/// # Errors
///
/// `JwtError::Expired` for expired tokens, `JwtError::InvalidIssuer` for a
/// foreign issuer, `JwtError::ValidationError` for everything else.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    Ok(data.claims)
}

/// Verifies a token and requires it to be an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    match claims.token_type {
        TokenType::Access => Ok(claims),
        TokenType::Refresh => Err(JwtError::ValidationError(
            "refresh token used where an access token is required".to_string(),
        )),
    }
}

/// Verifies a token and requires it to be a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    match claims.token_type {
        TokenType::Refresh => Ok(claims),
        TokenType::Access => Err(JwtError::ValidationError(
            "access token used where a refresh token is required".to_string(),
        )),
    }
}

/// Mints a new access token from a valid refresh token
///
/// The new token keeps the refresh token's `sub` and `sid`, so refresh can
/// never outlive the session it came from.
///
/// # Errors
///
/// Returns an error when the refresh token is invalid or expired.
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh = validate_refresh_token(refresh_token, secret)?;
    create_token(
        &Claims::new(refresh.sub, refresh.sid, TokenType::Access),
        secret,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret-0123456789abcdef";

    fn mint(token_type: TokenType) -> (Claims, String) {
        let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), token_type);
        let token = create_token(&claims, SECRET).expect("encode");
        (claims, token)
    }

    #[test]
    fn test_round_trip_preserves_identity_claims() {
        let (claims, token) = mint(TokenType::Access);
        let validated = validate_token(&token, SECRET).expect("decode");

        assert_eq!(validated.sub, claims.sub);
        assert_eq!(validated.sid, claims.sid);
        assert_eq!(validated.iss, "crewdeck");
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_lifetimes_differ_by_type() {
        assert!(TokenType::Refresh.lifetime() > TokenType::Access.lifetime());

        let access = Claims::new(Uuid::new_v4(), Uuid::new_v4(), TokenType::Access);
        assert_eq!(access.exp - access.iat, 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let (_, token) = mint(TokenType::Access);
        assert!(validate_token(&token, "a-different-secret").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TokenType::Access,
            Duration::hours(-1),
        );
        let token = create_token(&claims, SECRET).expect("encode");

        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let (_, access) = mint(TokenType::Access);
        let (_, refresh) = mint(TokenType::Refresh);

        assert!(validate_access_token(&access, SECRET).is_ok());
        assert!(validate_access_token(&refresh, SECRET).is_err());
        assert!(validate_refresh_token(&refresh, SECRET).is_ok());
        assert!(validate_refresh_token(&access, SECRET).is_err());
    }

    #[test]
    fn test_refresh_keeps_user_and_session() {
        let (claims, refresh) = mint(TokenType::Refresh);

        let access = refresh_access_token(&refresh, SECRET).expect("refresh");
        let validated = validate_access_token(&access, SECRET).expect("decode");

        assert_eq!(validated.sub, claims.sub);
        assert_eq!(validated.sid, claims.sid);
    }

    #[test]
    fn test_refresh_rejects_access_tokens() {
        let (_, access) = mint(TokenType::Access);
        assert!(refresh_access_token(&access, SECRET).is_err());
    }
}
