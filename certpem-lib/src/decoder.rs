//! DER decoding, delegated to `x509-parser`.
//!
//! The decoder accepts anything `x509-parser` can decode from a PEM body that
//! might be mistaken for a certificate, and tags the result with its variant.
//! Narrowing to the X.509 certificate variant is the parser's job.

use crate::extract;
use crate::fields::{CertificateInfo, DistinguishedName};
use crate::CertError;
use x509_parser::nom;
use x509_parser::prelude::*;

/// A decoded object, tagged with the kind of structure it turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateVariant {
    /// An X.509 public-key certificate.
    X509(Box<CertificateInfo>),
    /// A PKCS#10 certification request.
    CertificationRequest {
        subject: DistinguishedName,
        raw_der: Vec<u8>,
    },
    /// An X.509 certificate revocation list.
    RevocationList {
        issuer: DistinguishedName,
        raw_der: Vec<u8>,
    },
}

impl CertificateVariant {
    pub const X509_TYPE_NAME: &'static str = "X.509 Certificate";
    pub const CERTIFICATION_REQUEST_TYPE_NAME: &'static str = "PKCS#10 CertificationRequest";
    pub const REVOCATION_LIST_TYPE_NAME: &'static str = "X.509 CertificateRevocationList";

    /// Type identifier of this variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            CertificateVariant::X509(_) => Self::X509_TYPE_NAME,
            CertificateVariant::CertificationRequest { .. } => {
                Self::CERTIFICATION_REQUEST_TYPE_NAME
            }
            CertificateVariant::RevocationList { .. } => Self::REVOCATION_LIST_TYPE_NAME,
        }
    }

    /// DER bytes of the decoded object.
    pub fn raw_der(&self) -> &[u8] {
        match self {
            CertificateVariant::X509(info) => &info.raw_der,
            CertificateVariant::CertificationRequest { raw_der, .. }
            | CertificateVariant::RevocationList { raw_der, .. } => raw_der,
        }
    }
}

/// Turns DER bytes into a [`CertificateVariant`].
pub trait CertificateDecoder {
    /// Decode `der`, failing with [`CertError::CertificateFormat`] when the
    /// bytes are not a well-formed encoding of any supported structure.
    fn decode(&self, der: &[u8]) -> Result<CertificateVariant, CertError>;
}

/// The `x509-parser` backed decoder.
///
/// Tries an X.509 certificate first, then a certification request, then a
/// revocation list. When nothing matches, the certificate decoding error is
/// the one reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerCertificateDecoder;

impl CertificateDecoder for DerCertificateDecoder {
    fn decode(&self, der: &[u8]) -> Result<CertificateVariant, CertError> {
        let certificate_error = match X509Certificate::from_der(der) {
            Ok((remaining, x509)) => {
                let info = extract::certificate_info(&x509, consumed(der, remaining))?;
                return Ok(CertificateVariant::X509(Box::new(info)));
            }
            Err(e) => flatten_error(e),
        };

        if let Ok((remaining, csr)) = X509CertificationRequest::from_der(der) {
            return Ok(CertificateVariant::CertificationRequest {
                subject: extract::distinguished_name(&csr.certification_request_info.subject),
                raw_der: consumed(der, remaining).to_vec(),
            });
        }

        if let Ok((remaining, crl)) = CertificateRevocationList::from_der(der) {
            return Ok(CertificateVariant::RevocationList {
                issuer: extract::distinguished_name(&crl.tbs_cert_list.issuer),
                raw_der: consumed(der, remaining).to_vec(),
            });
        }

        Err(CertError::CertificateFormat(certificate_error))
    }
}

/// The prefix of `input` a parser consumed, given what it left over.
fn consumed<'a>(input: &'a [u8], remaining: &[u8]) -> &'a [u8] {
    let len = input.len().saturating_sub(remaining.len());
    input.get(..len).unwrap_or(input)
}

fn flatten_error(err: nom::Err<X509Error>) -> X509Error {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
        nom::Err::Incomplete(_) => X509Error::InvalidCertificate,
    }
}
