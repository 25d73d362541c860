//! Signed-URL verification.
//!
//! A signed path is `/<digest>/<hex>` where `digest` is the lowercase hex
//! HMAC-SHA-1 of the original URL bytes under the shared secret, and `hex`
//! is the lowercase hex encoding of those URL bytes. The MAC algorithm and
//! 40-character digest length are fixed for wire compatibility with the
//! sibling signer.

use std::fmt;

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Why a signed path failed verification.
///
/// All variants map to the same client-visible outcome (`403 Bad signature`);
/// the distinction exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    /// The URL segment was not even-length lowercase-compatible hex.
    MalformedHex,
    /// The decoded URL bytes were not valid UTF-8.
    MalformedUtf8,
    /// The claimed digest did not match the computed one.
    Mismatch,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignatureError::MalformedHex => write!(f, "malformed hex-encoded url"),
            SignatureError::MalformedUtf8 => write!(f, "decoded url is not valid UTF-8"),
            SignatureError::Mismatch => write!(f, "digest mismatch"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Verifies a claimed digest against a hex-encoded URL and returns the URL.
///
/// # Arguments
///
/// * `secret` - The shared HMAC secret
/// * `received_digest` - The digest claimed by the request path
/// * `encoded_url` - The hex-encoded URL from the request path
///
/// # Errors
///
/// Returns a [`SignatureError`] if the hex does not decode, the decoded
/// bytes are not UTF-8, or the digest does not match.
pub fn decode_signed_url(
    secret: &[u8],
    received_digest: &str,
    encoded_url: &str,
) -> Result<String, SignatureError> {
    let url_bytes = hex::decode(encoded_url).map_err(|_| SignatureError::MalformedHex)?;
    let url = String::from_utf8(url_bytes).map_err(|_| SignatureError::MalformedUtf8)?;
    let expected = url_digest(secret, &url);
    // The digest is compared as produced: lowercase hex, case-sensitive.
    if !constant_time_eq(&expected, received_digest) {
        return Err(SignatureError::Mismatch);
    }
    Ok(url)
}

/// Produces the signed path `/<digest>/<hex>` for a URL.
///
/// The inverse of [`decode_signed_url`]; used by embedders that generate
/// signed paths and by the test suite.
pub fn sign_url(secret: &[u8], url: &str) -> String {
    format!("/{}/{}", url_digest(secret, url), hex::encode(url.as_bytes()))
}

fn url_digest(secret: &[u8], url: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(url.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        diff |= a_byte ^ b_byte;
    }

    diff == 0
}
