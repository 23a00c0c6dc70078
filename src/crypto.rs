// src/crypto.rs
use sha2::{Digest, Sha256};

/// Unsalted SHA-256 of the password as lowercase hex.
///
/// Equal inputs always give equal digests, which is what lookup-by-hash relies on.
/// The stored digest only records that a password was generated; nothing is ever
/// authenticated against it, so there is no salt or key stretching.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    hex::encode(digest)
}
