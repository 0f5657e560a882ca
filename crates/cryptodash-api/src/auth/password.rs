//! 비밀번호 해싱.
//!
//! Argon2id, PHC 문자열 형식 (솔트 포함)으로 저장합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 불일치")]
    Mismatch,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 평문 비밀번호를 해싱합니다.
///
/// ```rust,ignore
/// let hash = hash_password("hunter22").unwrap();
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::HashingFailed)
}

/// 저장된 해시와 평문 비밀번호를 비교합니다.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hodl-forever").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("hodl-forever", &hash).is_ok());
        assert!(matches!(
            verify_password("paper-hands", &hash),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn test_same_password_gets_fresh_salt() {
        let a = hash_password("satoshi").unwrap();
        let b = hash_password("satoshi").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("satoshi", &a).is_ok());
        assert!(verify_password("satoshi", &b).is_ok());
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(matches!(
            verify_password("satoshi", "plaintext-from-legacy-table"),
            Err(PasswordError::InvalidHashFormat)
        ));
    }
}
