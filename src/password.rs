// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing.
//!
//! Stored credentials are bcrypt hashes; the hash string is opaque to the
//! API surface (`/pget` returns it verbatim).

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a plaintext password for storage.
pub fn get_password_hash(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Compare a plaintext password against a stored hash.
///
/// An unparsable stored hash counts as a mismatch, not an error; login
/// must not distinguish corrupt credentials from wrong ones.
pub fn verify_password(plain_password: &str, hashed_password: &str) -> bool {
    verify(plain_password, hashed_password).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // DEFAULT_COST is slow by design; tests use the minimum cost.
    fn quick_hash(password: &str) -> String {
        hash(password, 4).unwrap()
    }

    #[test]
    fn verify_accepts_matching_password() {
        let hashed = quick_hash("s3cret");
        assert!(verify_password("s3cret", &hashed));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hashed = quick_hash("s3cret");
        assert!(!verify_password("wrong", &hashed));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("s3cret", "not-a-bcrypt-hash"));
    }
}
