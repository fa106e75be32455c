//! PEM certificate parsing: normalize, base64-decode, DER-decode, narrow.

use crate::decoder::{CertificateDecoder, CertificateVariant, DerCertificateDecoder};
use crate::fields::CertificateInfo;
use crate::pem::normalize_pem;
use crate::util;
use crate::CertError;

/// Parses PEM certificate text into a [`CertificateInfo`].
///
/// The parser holds no state beyond its decoder; with the default
/// [`DerCertificateDecoder`] it is a zero-sized `Copy` value that can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PemCertificateParser<D = DerCertificateDecoder> {
    decoder: D,
}

impl PemCertificateParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: CertificateDecoder> PemCertificateParser<D> {
    /// Use `decoder` in place of the `x509-parser` backed default.
    pub fn with_decoder(decoder: D) -> Self {
        PemCertificateParser { decoder }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Parse a PEM certificate. The boundary markers are optional.
    ///
    /// # Errors
    ///
    /// - [`CertError::Decode`] if the payload is not valid base64. The
    ///   decoder is not consulted.
    /// - [`CertError::CertificateFormat`] if the bytes are not a certificate
    ///   encoding the decoder understands.
    /// - [`CertError::UnexpectedCertificateType`] if the bytes decode to
    ///   something other than an X.509 certificate.
    pub fn parse(&self, pem: &str) -> Result<CertificateInfo, CertError> {
        let payload = normalize_pem(pem);
        let der = util::base64_decode(&payload)?;
        self.parse_der(&der)
    }

    /// Decode DER bytes and require an X.509 certificate.
    pub fn parse_der(&self, der: &[u8]) -> Result<CertificateInfo, CertError> {
        match self.decoder.decode(der)? {
            CertificateVariant::X509(info) => Ok(*info),
            other => Err(CertError::UnexpectedCertificateType {
                expected: CertificateVariant::X509_TYPE_NAME,
                actual: other.type_name(),
            }),
        }
    }
}

/// Parse a PEM certificate with the default decoder.
pub fn parse_pem_certificate(pem: &str) -> Result<CertificateInfo, CertError> {
    PemCertificateParser::new().parse(pem)
}

/// Parse a DER certificate with the default decoder.
pub fn parse_der(der: &[u8]) -> Result<CertificateInfo, CertError> {
    PemCertificateParser::new().parse_der(der)
}
