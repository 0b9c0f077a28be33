use rand::{rngs::OsRng, TryRngCore as _};
use sha2::{Digest, Sha256};

use crate::error::ApiError;

/// Draws `bytes` from the OS random source and renders them as lowercase
/// hex, giving a `2 * bytes` character temporary password. The plaintext is
/// handed to the caller exactly once and never stored.
pub fn temp_password(bytes: usize) -> Result<String, ApiError> {
    let mut buf = vec![0u8; bytes];
    OsRng.try_fill_bytes(&mut buf).map_err(|_| ApiError::Credential)?;

    Ok(buf.iter().map(|b| format!("{b:02x}")).collect())
}

/// SHA-256 over `secret:salt`. User passwords salt with the login id,
/// company passwords with the registration email.
pub fn hash_secret(secret: &str, salt: &str) -> Vec<u8> {
    Sha256::digest(format!("{secret}:{salt}")).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_password_is_hex_of_requested_size() {
        let password = temp_password(5).unwrap();

        assert_eq!(password.len(), 10);
        assert!(password.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_temp_passwords_differ() {
        assert_ne!(temp_password(8).unwrap(), temp_password(8).unwrap());
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_secret("hunter2", "ACMEJADO20250001"), hash_secret("hunter2", "ACMEJADO20250001"));
    }

    #[test]
    fn test_salt_changes_hash() {
        assert_ne!(hash_secret("hunter2", "a"), hash_secret("hunter2", "b"));
        assert_ne!(hash_secret("hunter2", "a"), hash_secret("hunter3", "a"));
    }
}
