//! Share link token generation.

use rand::RngCore;
use rand::rngs::OsRng;

/// Token entropy in bytes.
const TOKEN_BYTES: usize = 32;

/// Generate a 256-bit token from the OS CSPRNG, hex-encoded (64 chars).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Whether `token` has the shape of a generated token. Anything else cannot
/// match a stored link.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_BYTES * 2 && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
