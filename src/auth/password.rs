//! Password hashing
//!
//! Hashes are standard bcrypt strings (`$2b$<cost>$...`), so the salt and
//! cost travel with each stored value.

use bcrypt::BcryptError;

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
// Minimum cost bcrypt accepts
#[cfg(test)]
const COST: u32 = 4;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, COST)
}

/// Check a password against a stored hash
///
/// Malformed stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("correct horse").expect("hash");
        assert!(stored.starts_with("$2b$"));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("correct horsE", &stored));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same").expect("hash");
        let b = hash_password("same").expect("hash");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_default_cost_hash_verifies() {
        let stored = bcrypt::hash("s3cret!", bcrypt::DEFAULT_COST).expect("hash");
        assert!(verify_password("s3cret!", &stored));
    }

    #[test]
    fn test_malformed_hashes_fail() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "not-a-hash"));
        assert!(!verify_password("x", "$2b$04$short"));
        assert!(!verify_password("x", "sha256$00$00"));
    }
}
