//! Owned certificate view built from the decoder's X.509 representation.

use serde::Serialize;

/// Digest algorithm for fingerprint computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Look up an algorithm by its lowercase name (`sha1`, `sha256`, ...).
    ///
    /// A dash between the family and the size is accepted (`sha-256`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Some(Self::Sha1),
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Display name, e.g. `SHA-256`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }
}

/// An X.509 certificate with its fields extracted into owned values.
///
/// Two values compare equal only if every extracted field and the DER
/// encoding they were taken from are identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    /// Certificate version (1, 2, or 3).
    pub version: u32,
    /// Serial number as colon-separated uppercase hex, leading zero bytes removed.
    pub serial: String,
    /// Signature algorithm name, or its dotted OID when unknown.
    pub signature_algorithm: String,
    pub issuer: DistinguishedName,
    pub subject: DistinguishedName,
    pub validity: Validity,
    pub public_key: PublicKeyInfo,
    pub extensions: Vec<Extension>,
    /// Signature bytes, lowercase hex.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub signature_hex: String,
    /// DER encoding of exactly this certificate, trailing input excluded.
    #[serde(skip)]
    pub raw_der: Vec<u8>,
}

/// Distinguished name as ordered (attribute, value) pairs.
///
/// Attribute types use OpenSSL short names where known (`CN`, `O`, `C`),
/// otherwise the dotted OID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistinguishedName {
    pub components: Vec<(String, String)>,
}

impl DistinguishedName {
    /// One-line form, e.g. `C = US, O = Org, CN = example.com`.
    ///
    /// Backslashes, commas and equals signs inside values are escaped.
    pub fn to_oneline(&self) -> String {
        self.components
            .iter()
            .map(|(key, value)| format!("{} = {}", key, escape_dn_value(value)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// First value of the given attribute, e.g. `get("CN")`.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.components
            .iter()
            .find(|(key, _)| key == attribute)
            .map(|(_, value)| value.as_str())
    }
}

fn escape_dn_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | ',' | '=') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl std::fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_oneline())
    }
}

/// A point in time taken from the certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTime {
    /// ISO 8601, UTC, second precision.
    pub iso8601: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl DateTime {
    pub(crate) fn from_timestamp(timestamp: i64) -> Self {
        let iso8601 = match time::OffsetDateTime::from_unix_timestamp(timestamp) {
            Ok(dt) => format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                dt.year(),
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second()
            ),
            Err(_) => timestamp.to_string(),
        };
        DateTime { iso8601, timestamp }
    }

    /// OpenSSL's date style: `Jun  4 11:04:38 2015 GMT`.
    pub fn to_openssl(&self) -> String {
        match time::OffsetDateTime::from_unix_timestamp(self.timestamp) {
            Ok(dt) => {
                let month: String = dt.month().to_string().chars().take(3).collect();
                format!(
                    "{} {:2} {:02}:{:02}:{:02} {} GMT",
                    month,
                    dt.day(),
                    dt.hour(),
                    dt.minute(),
                    dt.second(),
                    dt.year()
                )
            }
            Err(_) => self.iso8601.clone(),
        }
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_openssl())
    }
}

/// The certificate's validity window, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validity {
    pub not_before: DateTime,
    pub not_after: DateTime,
}

impl Validity {
    /// Whether `timestamp` (Unix seconds) falls inside the window.
    pub fn contains(&self, timestamp: i64) -> bool {
        self.not_before.timestamp <= timestamp && timestamp <= self.not_after.timestamp
    }
}

/// Subject public key summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicKeyInfo {
    /// "RSA", "EC", "Ed25519", "Ed448", or the dotted OID.
    pub algorithm: String,
    /// Key size in bits, where the decoder can tell.
    pub key_size: Option<u32>,
    /// Named curve for EC keys ("P-256", ...).
    pub curve: Option<String>,
    /// RSA modulus, uppercase hex without a sign byte.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modulus: Option<String>,
    /// RSA public exponent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponent: Option<u64>,
    /// SubjectPublicKeyInfo as a `PUBLIC KEY` PEM block.
    #[serde(skip)]
    pub pem: String,
}

/// A certificate extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extension {
    /// Dotted-decimal OID.
    pub oid: String,
    /// Readable name, or the OID when unknown.
    pub name: String,
    pub critical: bool,
    pub value: ExtensionValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum ExtensionValue {
    BasicConstraints { ca: bool, path_len: Option<u32> },
    KeyUsage(Vec<String>),
    ExtendedKeyUsage(Vec<String>),
    SubjectAltName(Vec<SanEntry>),
    SubjectKeyIdentifier(String),
    AuthorityKeyIdentifier(Option<String>),
    /// Extension value bytes, lowercase hex.
    Raw(String),
}

/// Subject Alternative Name entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum SanEntry {
    Dns(String),
    Email(String),
    Ip(String),
    Uri(String),
    DirName(String),
    Other(String),
}

impl std::fmt::Display for SanEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SanEntry::Dns(v) => write!(f, "DNS:{}", v),
            SanEntry::Email(v) => write!(f, "email:{}", v),
            SanEntry::Ip(v) => write!(f, "IP Address:{}", v),
            SanEntry::Uri(v) => write!(f, "URI:{}", v),
            SanEntry::DirName(v) => write!(f, "DirName:{}", v),
            SanEntry::Other(v) => write!(f, "othername:{}", v),
        }
    }
}

impl CertificateInfo {
    pub fn subject_string(&self) -> String {
        self.subject.to_oneline()
    }

    pub fn issuer_string(&self) -> String {
        self.issuer.to_oneline()
    }

    /// Serial number as colon-separated hex (e.g. "10:00").
    pub fn serial_hex(&self) -> &str {
        &self.serial
    }

    /// Serial number without separators, as `openssl x509 -serial` prints it.
    pub fn serial_compact(&self) -> String {
        self.serial.replace(':', "")
    }

    pub fn not_before(&self) -> &DateTime {
        &self.validity.not_before
    }

    pub fn not_after(&self) -> &DateTime {
        &self.validity.not_after
    }

    /// Subject and issuer are the same name.
    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }

    pub fn fingerprint(&self, algorithm: DigestAlgorithm) -> String {
        crate::fingerprint::compute_fingerprint(&self.raw_der, algorithm)
    }

    pub fn public_key_pem(&self) -> &str {
        &self.public_key.pem
    }

    /// Entries of the Subject Alternative Name extension, if present.
    pub fn san_entries(&self) -> &[SanEntry] {
        self.extensions
            .iter()
            .find_map(|ext| match &ext.value {
                ExtensionValue::SubjectAltName(entries) => Some(entries.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Look up an extension by dotted OID.
    pub fn extension(&self, oid: &str) -> Option<&Extension> {
        self.extensions.iter().find(|ext| ext.oid == oid)
    }

    /// The DER encoding this value was decoded from.
    pub fn to_der(&self) -> &[u8] {
        &self.raw_der
    }

    /// Re-encode as a PEM certificate block.
    pub fn to_pem(&self) -> String {
        crate::pem::der_to_pem(&self.raw_der)
    }
}
