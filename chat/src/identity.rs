use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use abi::errors::Error;

/// argon2id PHC string, salt included
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::internal_with_details(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| Error::internal_with_details(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("secret-pwd").unwrap();
        assert_ne!(hash, "secret-pwd");
        assert!(verify_password("secret-pwd", &hash).unwrap());
        assert!(!verify_password("other-pwd", &hash).unwrap());
        assert!(verify_password("secret-pwd", "not a phc string").is_err());
    }
}
