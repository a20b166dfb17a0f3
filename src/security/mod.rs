/// Security primitives: secret digests, session tokens, generated passwords
pub mod password;
pub mod token;

pub use password::{generate_password, hash_secret};
pub use token::{new_token, new_verification_code};
