//! HMAC-SHA256 signatures for time-limited blob URLs.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use stablehub_core::error::AppError;
use stablehub_core::result::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a signed URL is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The URL's expiry instant has passed.
    #[error("signed URL has expired")]
    Expired,
    /// The signature does not match the path and expiry.
    #[error("signed URL signature is invalid")]
    Invalid,
    /// The signature is not valid base64.
    #[error("signed URL signature is malformed")]
    Malformed,
}

/// Signs and verifies `(path, expires)` pairs with a shared secret.
#[derive(Clone)]
pub struct UrlSigner {
    keyed: HmacSha256,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner").finish_non_exhaustive()
    }
}

impl UrlSigner {
    /// Create a signer from a secret key.
    pub fn new(secret: &[u8]) -> AppResult<Self> {
        let keyed = <HmacSha256 as Mac>::new_from_slice(secret)
            .map_err(|e| AppError::configuration(format!("Invalid signing secret: {e}")))?;
        Ok(Self { keyed })
    }

    fn mac(&self, path: &str, expires: i64) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(path.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac
    }

    /// Produce the URL-safe signature for `path` valid until `expires`
    /// (Unix seconds).
    pub fn sign(&self, path: &str, expires: i64) -> String {
        URL_SAFE_NO_PAD.encode(self.mac(path, expires).finalize().into_bytes())
    }

    /// Check a signature at `now` (Unix seconds). Comparison is constant-time.
    pub fn verify(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
        now: i64,
    ) -> Result<(), SignatureError> {
        let provided = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SignatureError::Malformed)?;
        self.mac(path, expires)
            .verify_slice(&provided)
            .map_err(|_| SignatureError::Invalid)?;
        if now >= expires {
            return Err(SignatureError::Expired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-signing-secret-with-enough-bytes!!";

    fn signer() -> UrlSigner {
        UrlSigner::new(SECRET).expect("signer")
    }

    #[test]
    fn test_sign_then_verify() {
        let signer = signer();
        let sig = signer.sign("org/horse/xray.png", 2_000);
        assert_eq!(signer.verify("org/horse/xray.png", 2_000, &sig, 1_000), Ok(()));
    }

    #[test]
    fn test_rejects_tampering() {
        let signer = signer();
        let sig = signer.sign("org/horse/xray.png", 2_000);

        assert_eq!(
            signer.verify("org/horse/other.png", 2_000, &sig, 1_000),
            Err(SignatureError::Invalid)
        );
        assert_eq!(
            signer.verify("org/horse/xray.png", 9_999, &sig, 1_000),
            Err(SignatureError::Invalid)
        );
        assert_eq!(
            UrlSigner::new(b"another-secret")
                .expect("signer")
                .verify("org/horse/xray.png", 2_000, &sig, 1_000),
            Err(SignatureError::Invalid)
        );
        assert_eq!(
            signer.verify("org/horse/xray.png", 2_000, "not base64!", 1_000),
            Err(SignatureError::Malformed)
        );
    }

    #[test]
    fn test_rejects_expired() {
        let signer = signer();
        let sig = signer.sign("a.png", 2_000);
        assert_eq!(
            signer.verify("a.png", 2_000, &sig, 2_000),
            Err(SignatureError::Expired)
        );
    }
}
