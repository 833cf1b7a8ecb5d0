use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use sha2::Sha256;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Password Hashing (Argon2id)
// =============================================================================

/// Argon2id hasher keyed with the server-side pepper
///
/// An empty pepper yields the unkeyed default hasher, so hashes written
/// without `PASSWORD_PEPPER` keep verifying until one is configured.
fn argon2_with_pepper(pepper: &str) -> Result<Argon2<'_>> {
    if pepper.is_empty() {
        return Ok(Argon2::default());
    }
    Argon2::new_with_secret(
        pepper.as_bytes(),
        Algorithm::Argon2id,
        Version::V0x13,
        Params::default(),
    )
    .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// Hash a password for storage
///
/// A fresh random salt is drawn for every call and the result is a
/// PHC-format string (`$argon2id$v=19$m=19456,t=2,p=1$...`) stored in
/// `UserRecord::password_hash`.
///
/// # Arguments
/// * `password` - The plaintext password from the client
/// * `pepper` - The server-side secret pepper (may be empty)
///
/// # Security Note
/// Argon2id is memory-hard, so offline guessing against a leaked database
/// costs far more than a plain digest. The pepper is mixed in as the Argon2
/// secret and never stored next to the hashes.
pub fn hash_password(password: &str, pepper: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2_with_pepper(pepper)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC string
///
/// # Arguments
/// * `password` - The candidate plaintext password
/// * `pepper` - The pepper the hash was created with
/// * `stored` - The PHC string from `UserRecord::password_hash`
///
/// # Returns
/// * `true` only when the password matches. A malformed stored hash is
///   logged and treated as a mismatch.
pub fn verify_password(password: &str, pepper: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    match argon2_with_pepper(pepper) {
        Ok(argon2) => argon2.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            tracing::error!("Failed to build password hasher: {}", e);
            false
        }
    }
}

// =============================================================================
// Session Tokens
// =============================================================================

/// Sign `data` with HMAC-SHA256, hex encoded
///
/// # Arguments
/// * `data` - The data to sign
/// * `secret` - The signing key (`TOKEN_SECRET`)
pub fn sign(data: &str, secret: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return String::new();
        }
    };
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify HMAC-SHA256 signature
///
/// # Arguments
/// * `data` - The data that was signed
/// * `signature` - The hex-encoded HMAC signature
/// * `secret` - The signing key (`TOKEN_SECRET`)
///
/// # Security Note
/// The comparison goes through `Mac::verify_slice`, which runs in constant
/// time. Malformed hex is rejected before any comparison.
pub fn verify_hmac(data: &str, signature: &str, secret: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    mac.update(data.as_bytes());

    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format");
            return false;
        }
    };

    mac.verify_slice(&sig_bytes).is_ok()
}

/// Issue a token `username.expires_at.signature`
///
/// # Arguments
/// * `username` - The account the token is issued for
/// * `expires_at` - Expiry as a Unix timestamp in seconds
/// * `secret` - The signing key (`TOKEN_SECRET`)
///
/// # Security Note
/// Usernames never contain `.`, so the first two segments split back
/// unambiguously. The token is not encrypted: anyone holding it can read the
/// username and expiry, but cannot alter either without the secret.
pub fn issue_token(username: &str, expires_at: i64, secret: &str) -> String {
    let payload = format!("{}.{}", username, expires_at);
    let signature = sign(&payload, secret);
    format!("{}.{}", payload, signature)
}

/// Check a token's signature and expiry
///
/// # Arguments
/// * `token` - The token as sent by the client
/// * `secret` - The signing key (`TOKEN_SECRET`)
/// * `now` - Current Unix timestamp in seconds
///
/// # Returns
/// * The username the token was issued for, or `None` when the token is
///   malformed, forged or expired
pub fn verify_token(token: &str, secret: &str, now: i64) -> Option<String> {
    let mut parts = token.rsplitn(3, '.');
    let signature = parts.next()?;
    let expires_at = parts.next()?;
    let username = parts.next()?;

    let payload = format!("{}.{}", username, expires_at);
    if !verify_hmac(&payload, signature, secret) {
        tracing::warn!("Token signature mismatch");
        return None;
    }

    let expires_at: i64 = expires_at.parse().ok()?;
    if now >= expires_at {
        tracing::debug!("Token for {} expired at {}", username, expires_at);
        return None;
    }

    Some(username.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    #[test]
    fn test_hash_password_is_phc_argon2id() {
        let stored = hash_password("hunter22", "pepper").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(PasswordHash::new(&stored).is_ok());
    }

    #[test]
    fn test_hash_password_salted_per_call() {
        let first = hash_password("same-pass", "pepper").unwrap();
        let second = hash_password("same-pass", "pepper").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same-pass", "pepper", &first));
        assert!(verify_password("same-pass", "pepper", &second));
    }

    #[test]
    fn test_verify_password() {
        let stored = hash_password("hunter22", "pepper").unwrap();
        assert!(verify_password("hunter22", "pepper", &stored));
        assert!(!verify_password("hunter23", "pepper", &stored));
    }

    #[test]
    fn test_verify_password_requires_same_pepper() {
        let stored = hash_password("hunter22", "pepper1").unwrap();
        assert!(!verify_password("hunter22", "pepper2", &stored));
        assert!(!verify_password("hunter22", "", &stored));
    }

    #[test]
    fn test_verify_password_without_pepper() {
        let stored = hash_password("hunter22", "").unwrap();
        assert!(verify_password("hunter22", "", &stored));
    }

    #[test]
    fn test_verify_password_malformed_hash() {
        let legacy = "ab".repeat(32);
        assert!(!verify_password("hunter22", "pepper", &legacy));
        assert!(!verify_password("hunter22", "pepper", ""));
    }

    #[test]
    fn test_verify_hmac_valid() {
        let signature = sign("test data", SECRET);
        assert!(verify_hmac("test data", &signature, SECRET));
    }

    #[test]
    fn test_verify_hmac_wrong_secret() {
        let signature = sign("test data", SECRET);
        assert!(!verify_hmac("test data", &signature, "wrong-secret"));
    }

    #[test]
    fn test_verify_hmac_invalid_hex() {
        assert!(!verify_hmac("test data", "not-hex", SECRET));
    }

    #[test]
    fn test_token_roundtrip() {
        let token = issue_token("alice", 2_000, SECRET);
        assert_eq!(verify_token(&token, SECRET, 1_000), Some("alice".to_string()));
    }

    #[test]
    fn test_token_expired() {
        let token = issue_token("alice", 2_000, SECRET);
        assert_eq!(verify_token(&token, SECRET, 2_000), None);
    }

    #[test]
    fn test_token_tampered_username() {
        let token = issue_token("alice", 2_000, SECRET);
        let forged = token.replacen("alice", "mallory", 1);
        assert_eq!(verify_token(&forged, SECRET, 1_000), None);
    }

    #[test]
    fn test_token_garbage() {
        assert_eq!(verify_token("", SECRET, 0), None);
        assert_eq!(verify_token("just-one-part", SECRET, 0), None);
    }
}
