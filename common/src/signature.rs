use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex-encoded HMAC-SHA256 digest of `payload` under `secret`.
///
/// Razorpay signs two payload shapes with the same scheme: the raw webhook
/// body exactly as delivered, and the `order_id|payment_id` string a client
/// submits after a hosted checkout completes.
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a hex signature against the expected digest of `payload`.
/// The comparison is constant-time.
pub fn verify(payload: &[u8], signature: &str, secret: &str) -> bool {
    let expected = sign(payload, secret);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

/// Builds the pipe-joined payload used by the synchronous checkout
/// verification flow.
pub fn payment_payload(order_id: &str, payment_id: &str) -> String {
    format!("{}|{}", order_id, payment_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "rzp_test_secret";

    #[test]
    fn round_trip() {
        let payload = br#"{"event":"payment_link.paid","payload":{}}"#;
        let sig = sign(payload, SECRET);
        assert!(verify(payload, &sig, SECRET));
    }

    #[test]
    fn rejects_mutated_payload() {
        let payload = b"plink_1|pay_1";
        let sig = sign(payload, SECRET);
        assert!(!verify(b"plink_1|pay_2", &sig, SECRET));
    }

    #[test]
    fn rejects_mutated_signature() {
        let payload = b"plink_1|pay_1";
        let mut sig = sign(payload, SECRET);
        // flip the last hex digit
        let last = sig.pop().unwrap();
        sig.push(if last == '0' { '1' } else { '0' });
        assert!(!verify(payload, &sig, SECRET));
    }

    #[test]
    fn rejects_wrong_secret() {
        let payload = b"plink_1|pay_1";
        let sig = sign(payload, SECRET);
        assert!(!verify(payload, &sig, "other_secret"));
    }

    #[test]
    fn pipe_joined_payload() {
        assert_eq!(payment_payload("plink_1", "pay_9"), "plink_1|pay_9");
    }
}
