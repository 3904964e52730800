//! Content fingerprinting.

use sha2::{Digest, Sha256};
use tracing::debug;

use roster_model::Fingerprint;

/// Compute the SHA-256 fingerprint of raw file content.
///
/// Pure and infallible: any byte sequence hashes, and the same bytes always
/// give the same 64-character lowercase hex digest.
pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hex_hash = hex::encode(hasher.finalize());
    debug!(bytes = bytes.len(), fingerprint = %hex_hash, "computed fingerprint");
    Fingerprint::from_hex(hex_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_digest() {
        // Known SHA-256 hash for "Hello, World!"
        assert_eq!(
            fingerprint(b"Hello, World!").as_str(),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_empty_input_hashes() {
        assert_eq!(
            fingerprint(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_single_byte_change_changes_fingerprint() {
        let a = fingerprint(b"user_id,email\n1,a@x.com\n");
        let b = fingerprint(b"user_id,email\n1,b@x.com\n");
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn fingerprint_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(fingerprint(&bytes), fingerprint(&bytes));
        }

        #[test]
        fn fingerprint_is_fixed_width_hex(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let fp = fingerprint(&bytes);
            prop_assert_eq!(fp.as_str().len(), 64);
            prop_assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }

        #[test]
        fn distinct_inputs_get_distinct_fingerprints(
            a in proptest::collection::vec(any::<u8>(), 0..256),
            b in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(fingerprint(&a), fingerprint(&b));
        }
    }
}
