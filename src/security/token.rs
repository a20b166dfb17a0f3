/// Opaque session tokens and one-time verification codes
use rand::Rng;

/// Generate a fresh unguessable session token: 32 CSPRNG bytes, hex-encoded.
pub fn new_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    hex::encode(bytes)
}

/// Generate a 4-digit one-time verification code for SMS/email delivery.
pub fn new_verification_code() -> String {
    let mut rng = rand::thread_rng();
    (0..4).map(|_| rng.gen_range(0..=9).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = new_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(new_token(), new_token());
    }

    #[test]
    fn test_verification_code_is_four_digits() {
        for _ in 0..20 {
            let code = new_verification_code();
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
