//! # Base64url
//!
//! URL-safe, unpadded base64, the alphabet of compact token segments.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

pub fn b64u_encode(content: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(content)
}

/// Decode base64url without padding. Padded input or `+`/`/` is rejected.
pub fn b64u_decode(b64u: &str) -> Result<Vec<u8>, Error> {
    URL_SAFE_NO_PAD
        .decode(b64u)
        .map_err(|e| Error::Decode(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid base64url: {0}")]
    Decode(String),
}
