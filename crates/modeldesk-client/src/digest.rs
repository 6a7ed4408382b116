//! Password digests
//!
//! The raw password never leaves the client. Registration sends its
//! SHA-256; login salts that digest with the one-time challenge hash.

use sha2::{Digest, Sha256};

fn sha256_hex(input: &str) -> String {
	format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Hex SHA-256 of the password, as sent on registration
pub fn password_digest(password: &str) -> String {
	sha256_hex(password)
}

/// `sha256("<challenge hash>:<sha256(password)>")`, as sent on login
pub fn login_digest(challenge_hash: &str, password: &str) -> String {
	sha256_hex(&format!("{}:{}", challenge_hash, password_digest(password)))
}
