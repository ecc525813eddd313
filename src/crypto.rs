//! Password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::Error;

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    /// Create Argon2 instance with these parameters.
    fn to_argon2(self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Internal {
            operation: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    /// Secure defaults for production (Argon2id RFC recommendations)
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Hash a plaintext secret with a freshly generated salt.
///
/// Uses the provided parameters or secure defaults if None. The output is a
/// PHC-format string that embeds algorithm, parameters, and salt.
pub fn hash_and_salt_with_params(plaintext: &str, params: Option<Argon2Params>) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = if let Some(p) = params {
        p.to_argon2()?
    } else {
        Argon2Params::default().to_argon2()?
    };

    let hash = argon2.hash_password(plaintext.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash password: {e}"),
    })?;

    Ok(hash.to_string())
}

/// Hash a plaintext secret using the default secure parameters.
pub fn hash_and_salt(plaintext: &str) -> Result<String, Error> {
    hash_and_salt_with_params(plaintext, None)
}

/// Verify a plaintext secret against a stored hash.
///
/// Note: Verification uses the parameters embedded in the hash itself.
pub fn verify(plaintext: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Internal {
        operation: format!("parse hash: {e}"),
    })?;

    // Verification always uses params from the hash
    let argon2 = Argon2::default();
    Ok(argon2.verify_password(plaintext.as_bytes(), &parsed_hash).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let plaintext = "test_password_123";
        let hash = hash_and_salt(plaintext).unwrap();

        // Hash should not be empty, and never equal to the plaintext
        assert!(!hash.is_empty());
        assert_ne!(hash, plaintext);

        // Should verify correctly
        assert!(verify(plaintext, &hash).unwrap());

        // Should fail with wrong input
        assert!(!verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_inputs_different_hashes() {
        let hash1 = hash_and_salt("password1").unwrap();
        let hash2 = hash_and_salt("password2").unwrap();

        // Different inputs should produce different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_same_input_different_hashes() {
        let plaintext = "same_password";

        let hash1 = hash_and_salt(plaintext).unwrap();
        let hash2 = hash_and_salt(plaintext).unwrap();

        // Same input should produce different hashes due to salt
        assert_ne!(hash1, hash2);

        // But both should verify correctly
        assert!(verify(plaintext, &hash1).unwrap());
        assert!(verify(plaintext, &hash2).unwrap());
    }

    #[test]
    fn test_reduced_cost_params() {
        let params = Argon2Params {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };
        let hash = hash_and_salt_with_params("secret", Some(params)).unwrap();

        // Verification reads parameters from the hash, not from our defaults
        assert!(verify("secret", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let result = verify("secret", "not-a-phc-string");
        assert!(result.is_err());
    }
}
