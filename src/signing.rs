use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Header carrying the payload signature when a webhook has a secret.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Compute the signature header value for an encoded payload:
/// `sha256=<hex of HMAC-SHA256(secret, body)>`.
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| Hmac::<Sha256>::new_from_slice(b"-").expect("hmac accepts any key length"));
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Receiver-side check of a signature header value, in constant time.
pub fn verify_signature(secret: &str, body: &[u8], header_value: &str) -> bool {
    let Some(signature_hex) = header_value.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| Hmac::<Sha256>::new_from_slice(b"-").expect("hmac accepts any key length"));
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}
