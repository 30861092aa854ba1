//! API key generation and hashing.
//!
//! Keys authenticate scripted clients through the `X-Api-Key` header. Only
//! the SHA-256 digest and a short display prefix are ever stored.

use rand::Rng;

/// Length of the random part of a key (alphanumeric characters).
pub const KEY_LENGTH: usize = 40;

/// Fixed marker every key starts with, so leaked keys are recognizable.
pub const KEY_MARKER: &str = "rc_";

/// Number of leading characters stored as a human-visible prefix.
pub const KEY_PREFIX_LENGTH: usize = 10;

/// A freshly minted API key.
pub struct GeneratedApiKey {
    /// Returned to the caller once and never persisted.
    pub plaintext: String,
    pub prefix: String,
    /// SHA-256 hex digest of `plaintext`; this is what the database stores.
    pub hash: String,
}

pub fn generate_api_key() -> GeneratedApiKey {
    let random: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect();
    let plaintext = format!("{KEY_MARKER}{random}");

    GeneratedApiKey {
        prefix: extract_prefix(&plaintext).to_string(),
        hash: hash_api_key(&plaintext),
        plaintext,
    }
}

/// Digest used both when storing a key and when looking one up.
pub fn hash_api_key(key: &str) -> String {
    crate::hashing::sha256_hex(key.as_bytes())
}

pub fn extract_prefix(key: &str) -> &str {
    let end = key
        .char_indices()
        .nth(KEY_PREFIX_LENGTH)
        .map_or(key.len(), |(i, _)| i);
    &key[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_shape() {
        let key = generate_api_key();
        assert_eq!(key.plaintext.len(), KEY_MARKER.len() + KEY_LENGTH);
        assert!(key.plaintext.starts_with(KEY_MARKER));
        assert!(key.plaintext[KEY_MARKER.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn prefix_matches_start() {
        let key = generate_api_key();
        assert_eq!(key.prefix.len(), KEY_PREFIX_LENGTH);
        assert!(key.plaintext.starts_with(&key.prefix));
    }

    #[test]
    fn hash_is_stable_hex() {
        let key = generate_api_key();
        assert_eq!(key.hash, hash_api_key(&key.plaintext));
        assert_eq!(key.hash.len(), 64);
        assert!(key.hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn keys_are_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_ne!(a.plaintext, b.plaintext);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn extract_prefix_handles_short_and_multibyte() {
        assert_eq!(extract_prefix("abc"), "abc");
        assert_eq!(extract_prefix("rc_abcdefghij"), "rc_abcdefg");
        assert_eq!(extract_prefix("ééééééééééééé").chars().count(), 10);
    }
}
