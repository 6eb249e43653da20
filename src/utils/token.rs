use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::consts::invite_const::INVITE_TOKEN_LEN;

/// Returns `(raw, digest)`. The raw token goes out in the redemption link
/// exactly once; only the digest is persisted.
pub fn generate_invite_token() -> (String, String) {
    let raw = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(INVITE_TOKEN_LEN)
        .map(char::from)
        .collect::<String>();

    let digest = digest_of(&raw);
    (raw, digest)
}

pub fn digest_of(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());

    format!("{:x}", hasher.finalize())
}
