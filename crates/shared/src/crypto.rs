//! Cryptographic utilities for digest-based password encodings and
//! generated credentials.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Character set used for generated temporary passwords. Excludes
/// easily-confused characters (0/O, 1/l/I).
const PASSWORD_CHARSET: &[u8] = b"abcdefghijkmnpqrstuvwxyz23456789";

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a random password of the given length from the unambiguous
/// lowercase alphanumeric character set.
pub fn generate_password(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..PASSWORD_CHARSET.len());
            PASSWORD_CHARSET[idx] as char
        })
        .collect()
}

/// Generates a random string of decimal digits, used as the variable
/// suffix of generated temporary account IDs.
pub fn generate_digits(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect()
}
