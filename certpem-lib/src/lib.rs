//! certpem-lib: Parse PEM-wrapped X.509 certificates.
//!
//! The PEM text is normalized to a bare base64 payload, decoded to DER, and
//! handed to `x509-parser`. The decoded object must be an X.509 certificate;
//! certification requests or revocation lists that arrive wrapped in
//! certificate markers are rejected with a descriptive error.

mod decoder;
mod display;
mod extract;
mod fields;
mod fingerprint;
mod oid;
mod parser;
mod pem;
mod util;

pub use decoder::{CertificateDecoder, CertificateVariant, DerCertificateDecoder};
pub use display::{display_text, to_json};
pub use fields::{
    CertificateInfo, DateTime, DigestAlgorithm, DistinguishedName, Extension, ExtensionValue,
    PublicKeyInfo, SanEntry, Validity,
};
pub use fingerprint::compute_fingerprint;
pub use parser::{parse_der, parse_pem_certificate, PemCertificateParser};
pub use pem::{der_to_pem, normalize_pem, BEGIN_CERTIFICATE, END_CERTIFICATE};

/// Errors returned by certpem-lib.
#[derive(Debug, thiserror::Error)]
pub enum CertError {
    /// The normalized payload is not valid base64.
    #[error("Invalid base64 certificate payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The decoded bytes are not a well-formed certificate encoding.
    #[error("Invalid certificate encoding: {0}")]
    CertificateFormat(#[source] x509_parser::error::X509Error),

    /// Decoding succeeded but produced something other than an X.509 certificate.
    #[error(
        "Expected decoded certificate to be of type {expected}, but it was of type {actual}"
    )]
    UnexpectedCertificateType {
        expected: &'static str,
        actual: &'static str,
    },

    /// Rendering certificate information as JSON failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
