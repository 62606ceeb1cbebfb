/// Password hashing using Argon2id
///
/// # Security
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use crewdeck_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id
///
/// Produces a PHC string that embeds the algorithm, parameters, and a
/// 16-byte random salt:
///
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    // 64 MB memory, 3 iterations, 4 lanes
    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("bad argon2 parameters: {e}")))?;

    let hasher = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let hash = hasher
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Comparison is constant-time inside the argon2 crate.
///
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it doesn't
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    // The PHC string carries its own parameters
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Validates password strength
///
/// Requirements:
/// - At least 8 characters
/// - At least one uppercase letter, one lowercase letter, one digit, and
///   one special character
///
/// # Example
///
/// ```
/// use crewdeck_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("MyP@ssw0rd!").is_ok());
/// assert!(validate_password_strength("Sh0rt!").is_err());
/// assert!(validate_password_strength("Password123").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }

    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one digit".to_string());
    }

    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embeds_parameters_and_salt() {
        let first = hash_password("board meeting at nine").expect("hash");
        let second = hash_password("board meeting at nine").expect("hash");

        assert!(first.starts_with("$argon2id$"));
        assert!(first.contains("m=65536,t=3,p=4"));
        // Fresh salt every time, so equal passwords never hash alike
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_distinguishes_mismatch_from_garbage() {
        let hash = hash_password("kanban4Life!").expect("hash");

        assert!(verify_password("kanban4Life!", &hash).unwrap());
        assert_eq!(verify_password("kanban4life!", &hash).unwrap(), false);
        assert_eq!(verify_password("", &hash).unwrap(), false);

        // A corrupt stored hash is an error, not a failed login
        assert!(verify_password("kanban4Life!", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_roundtrip_handles_awkward_passwords() {
        for password in ["  padded  ", "emoji-🗂️-board", "tab\there"] {
            let hash = hash_password(password).expect("hash");
            assert!(
                verify_password(password, &hash).unwrap(),
                "{password:?} failed to verify"
            );
        }
    }

    #[test]
    fn test_strength_check_accepts_mixed_passwords() {
        for password in ["Crewdeck#2026", "d0ck-The-Crew!", "T4sk board?!"] {
            assert!(
                validate_password_strength(password).is_ok(),
                "{password:?} unexpectedly rejected"
            );
        }
    }

    #[test]
    fn test_strength_check_names_the_missing_class() {
        let cases = [
            ("C2d!", "8 characters"),
            ("crewdeck#1", "uppercase"),
            ("CREWDECK#1", "lowercase"),
            ("Crewdeck#!", "digit"),
            ("Crewdeck11", "special"),
        ];

        for (password, needle) in cases {
            let err = validate_password_strength(password).unwrap_err();
            assert!(err.contains(needle), "{password:?}: got {err:?}");
        }
    }
}
