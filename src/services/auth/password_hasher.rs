use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use crate::config::SecuritySettings;

/// Length of the derived key in bytes
pub const HASH_LENGTH: usize = 32;

/// Salted PBKDF2-HMAC-SHA256 password hashing.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    salt_length: usize,
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(salt_length: usize, iterations: u32) -> Self {
        Self { salt_length, iterations }
    }

    pub fn from_settings(settings: &SecuritySettings) -> Self {
        Self::new(settings.salt_length, settings.hash_iterations)
    }

    /// A fresh random salt of the configured length
    pub fn generate_salt(&self) -> Vec<u8> {
        (0..self.salt_length).map(|_| rand::random::<u8>()).collect()
    }

    pub fn hash(&self, password: &str, salt: &[u8]) -> Vec<u8> {
        let mut derived = [0u8; HASH_LENGTH];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, self.iterations, &mut derived);
        derived.to_vec()
    }

    /// Re-derives the hash and compares it in constant time
    pub fn verify(&self, password: &str, salt: &[u8], expected: &[u8]) -> bool {
        let derived = self.hash(password, salt);
        derived.ct_eq(expected).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(16, 1_000)
    }

    #[test]
    fn salts_have_the_configured_length_and_differ() {
        let hasher = hasher();
        let a = hasher.generate_salt();
        let b = hasher.generate_salt();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn correct_password_verifies() {
        let hasher = hasher();
        let salt = hasher.generate_salt();
        let hash = hasher.hash("Laerke", &salt);
        assert_eq!(hash.len(), HASH_LENGTH);
        assert!(hasher.verify("Laerke", &salt, &hash));
    }

    #[test]
    fn wrong_password_or_salt_fails() {
        let hasher = hasher();
        let salt = hasher.generate_salt();
        let hash = hasher.hash("Sophie", &salt);
        assert!(!hasher.verify("sophie", &salt, &hash));
        assert!(!hasher.verify("Sophie", &hasher.generate_salt(), &hash));
    }

    #[test]
    fn truncated_hash_never_verifies() {
        let hasher = hasher();
        let salt = hasher.generate_salt();
        let hash = hasher.hash("Ida", &salt);
        assert!(!hasher.verify("Ida", &salt, &hash[..16]));
    }
}
