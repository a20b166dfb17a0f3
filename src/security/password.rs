/// Secret digests and generated human-readable passwords
use rand::seq::SliceRandom as _;
use rand::Rng;
use sha2::{Digest, Sha256};

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*-_+=";

/// Deterministic one-way digest of a secret.
///
/// Submitted passwords are compared by digest equality, so the same input
/// must always produce the same output.
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Generate a password readable enough to deliver over SMS or email.
///
/// Contains at least one digit, one symbol and one uppercase letter, padded
/// with lowercase letters to a length randomized within 10..=14, then
/// shuffled. Not a hardened secret; accounts rotate it on recovery anyway.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    let length = rng.gen_range(10..=14);

    let mut chars: Vec<char> = vec![
        pick(&mut rng, DIGITS),
        pick(&mut rng, SYMBOLS),
        pick(&mut rng, UPPER),
    ];
    while chars.len() < length {
        chars.push(pick(&mut rng, LOWER));
    }
    chars.shuffle(&mut rng);

    chars.into_iter().collect()
}

fn pick(rng: &mut impl Rng, set: &[u8]) -> char {
    set[rng.gen_range(0..set.len())] as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(hash_secret("sdsdsds"), hash_secret("sdsdsds"));
        assert_ne!(hash_secret("sdsdsds"), hash_secret("sdsdsdS"));
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = hash_secret("12345");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_password_character_classes() {
        for _ in 0..50 {
            let password = generate_password();
            assert!(password.len() >= 10 && password.len() <= 14);
            assert!(password.chars().any(|c| c.is_ascii_digit()));
            assert!(password.chars().any(|c| c.is_ascii_uppercase()));
            assert!(password.chars().any(|c| c.is_ascii_lowercase()));
            assert!(password.chars().any(|c| SYMBOLS.contains(&(c as u8))));
        }
    }

    #[test]
    fn test_generated_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }
}
