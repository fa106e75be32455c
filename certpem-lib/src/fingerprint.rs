//! Certificate fingerprints.

use crate::fields::DigestAlgorithm;
use crate::util;
use digest::Digest;

/// Digest DER-encoded certificate bytes.
///
/// Returns colon-separated uppercase hex, the same form `openssl x509
/// -fingerprint` prints.
pub fn compute_fingerprint(der_bytes: &[u8], algorithm: DigestAlgorithm) -> String {
    let digest = match algorithm {
        DigestAlgorithm::Sha1 => sha1::Sha1::digest(der_bytes).to_vec(),
        DigestAlgorithm::Sha256 => sha2::Sha256::digest(der_bytes).to_vec(),
        DigestAlgorithm::Sha384 => sha2::Sha384::digest(der_bytes).to_vec(),
        DigestAlgorithm::Sha512 => sha2::Sha512::digest(der_bytes).to_vec(),
    };
    util::hex_colon_upper(&digest)
}
