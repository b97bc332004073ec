//! GDS request signature generation and validation utilities.
//!
//! The signed message is the canonical string
//!
//! ```text
//! METHOD\n
//! MD5(body) as 16 raw bytes\n
//! Date header\n
//! URL path\n
//! ```
//!
//! keyed with the user's secret under HMAC-SHA1 and base64-encoded. The digest
//! bytes go into the message unencoded; clients depend on that exact layout.

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac, digest::InvalidLength};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Build the canonical string that is signed for a request
pub fn canonical_string(verb: &str, body: &[u8], date: &str, path: &str) -> Vec<u8> {
    let digest = md5::compute(body);

    let mut message = Vec::with_capacity(verb.len() + digest.len() + date.len() + path.len() + 4);
    message.extend_from_slice(verb.as_bytes());
    message.push(b'\n');
    message.extend_from_slice(&digest[..]);
    message.push(b'\n');
    message.extend_from_slice(date.as_bytes());
    message.push(b'\n');
    message.extend_from_slice(path.as_bytes());
    message.push(b'\n');
    message
}

fn keyed_mac(secret: &str, message: &[u8]) -> Result<HmacSha1, InvalidLength> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())?;
    mac.update(message);
    Ok(mac)
}

/// Generate the base64 HMAC-SHA1 signature for a request
pub fn create_signature(
    secret: &str,
    verb: &str,
    body: &[u8],
    date: &str,
    path: &str,
) -> Result<String, InvalidLength> {
    let mac = keyed_mac(secret, &canonical_string(verb, body, date, path))?;
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check a client-supplied signature against the expected one.
///
/// Only the canonical padded base64 form decodes, so this accepts exactly the
/// string [`create_signature`] would produce, compared in constant time.
pub fn validate_signature(
    secret: &str,
    verb: &str,
    body: &[u8],
    date: &str,
    path: &str,
    signature: &str,
) -> bool {
    let Ok(signature_bytes) = STANDARD.decode(signature) else {
        return false;
    };

    keyed_mac(secret, &canonical_string(verb, body, date, path))
        .map(|mac| mac.verify_slice(&signature_bytes).is_ok())
        .unwrap_or(false)
}
