use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha512};

/// Hex SHA-512 digest, the format provisioned into `wachtwoord_hash`.
pub fn sha512_hex(password: &str) -> String {
    hex::encode(Sha512::digest(password.as_bytes()))
}

/// Argon2 PHC string, accepted alongside the legacy digest.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Checks `password` against a stored SHA-512 hex digest or argon2 PHC string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if stored.starts_with("$argon2") {
        return match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored argon2 hash is malformed");
                false
            }
        };
    }

    sha512_hex(password).eq_ignore_ascii_case(stored.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_digest_is_fixed_length_hex() {
        let digest = sha512_hex("geheim");
        assert_eq!(digest.len(), 128);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(verify_password("geheim", &digest));
        assert!(verify_password("geheim", &digest.to_uppercase()));
        assert!(!verify_password("Geheim", &digest));
    }

    #[test]
    fn argon2_hashes_verify() {
        let hash = hash_password("geheim").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("geheim", &hash));
        assert!(!verify_password("fout", &hash));
    }

    #[test]
    fn malformed_hashes_never_match() {
        assert!(!verify_password("geheim", "$argon2id$broken"));
        assert!(!verify_password("", ""));
    }
}
