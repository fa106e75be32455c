//! Copy fields out of `x509-parser`'s borrowed representation.

use crate::fields::{
    CertificateInfo, DateTime, DistinguishedName, Extension, ExtensionValue, PublicKeyInfo,
    SanEntry, Validity,
};
use crate::oid;
use crate::util;
use crate::CertError;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

/// Build a [`CertificateInfo`] from a decoded certificate and the DER bytes
/// it was decoded from.
pub(crate) fn certificate_info(
    x509: &X509Certificate<'_>,
    raw_der: &[u8],
) -> Result<CertificateInfo, CertError> {
    let tbs = &x509.tbs_certificate;

    // v1 = 0, v2 = 1, v3 = 2
    if tbs.version.0 > 2 {
        return Err(CertError::CertificateFormat(X509Error::InvalidVersion));
    }

    Ok(CertificateInfo {
        version: tbs.version.0 + 1,
        serial: serial_hex(tbs.raw_serial()),
        signature_algorithm: signature_algorithm_name(&x509.signature_algorithm),
        issuer: distinguished_name(&tbs.issuer),
        subject: distinguished_name(&tbs.subject),
        validity: Validity {
            not_before: DateTime::from_timestamp(tbs.validity.not_before.timestamp()),
            not_after: DateTime::from_timestamp(tbs.validity.not_after.timestamp()),
        },
        public_key: public_key_info(&tbs.subject_pki),
        extensions: tbs.extensions().iter().map(extension).collect(),
        signature_hex: hex::encode(&*x509.signature_value.data),
        raw_der: raw_der.to_vec(),
    })
}

pub(crate) fn distinguished_name(name: &X509Name<'_>) -> DistinguishedName {
    let components = name
        .iter()
        .flat_map(|rdn| rdn.iter())
        .map(|attr| {
            let key = util::attribute_short_name(&attr.attr_type().to_id_string());
            let value = match attr.as_str() {
                Ok(s) => s.to_string(),
                Err(_) => format!("#{}", hex::encode(attr.attr_value().data)),
            };
            (key, value)
        })
        .collect();
    DistinguishedName { components }
}

/// Leading zero bytes are dropped, but at least one byte is kept.
fn serial_hex(raw: &[u8]) -> String {
    let significant = match raw.iter().position(|&b| b != 0) {
        Some(pos) => raw.get(pos..).unwrap_or(raw),
        None => raw.get(raw.len().saturating_sub(1)..).unwrap_or(raw),
    };
    util::hex_colon_upper(significant)
}

fn signature_algorithm_name(algorithm: &AlgorithmIdentifier<'_>) -> String {
    let oid_str = algorithm.algorithm.to_id_string();
    let name = match oid_str.as_str() {
        oid::SHA1_WITH_RSA => "sha1WithRSAEncryption",
        oid::SHA256_WITH_RSA => "sha256WithRSAEncryption",
        oid::SHA384_WITH_RSA => "sha384WithRSAEncryption",
        oid::SHA512_WITH_RSA => "sha512WithRSAEncryption",
        oid::RSASSA_PSS => "rsassaPss",
        oid::ECDSA_WITH_SHA256 => "ecdsa-with-SHA256",
        oid::ECDSA_WITH_SHA384 => "ecdsa-with-SHA384",
        oid::ECDSA_WITH_SHA512 => "ecdsa-with-SHA512",
        oid::ED25519 => "ED25519",
        oid::ED448 => "ED448",
        _ => return oid_str,
    };
    name.to_string()
}

fn public_key_info(spki: &SubjectPublicKeyInfo<'_>) -> PublicKeyInfo {
    let mut info = PublicKeyInfo {
        algorithm: spki.algorithm.algorithm.to_id_string(),
        key_size: None,
        curve: None,
        modulus: None,
        exponent: None,
        pem: format!(
            "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----\n",
            util::base64_wrap(spki.raw)
        ),
    };

    match info.algorithm.as_str() {
        oid::RSA_ENCRYPTION => {
            info.algorithm = "RSA".into();
            if let Ok(PublicKey::RSA(rsa)) = spki.parsed() {
                let modulus = match rsa.modulus.split_first() {
                    Some((&0, rest)) if !rest.is_empty() => rest,
                    _ => rsa.modulus,
                };
                info.key_size = u32::try_from(rsa.key_size()).ok();
                info.modulus = Some(hex::encode_upper(modulus));
                info.exponent = rsa.try_exponent().ok();
            }
        }
        oid::EC_PUBLIC_KEY => {
            info.algorithm = "EC".into();
            let curve = named_curve(&spki.algorithm);
            info.key_size = match curve.as_deref() {
                Some("P-256") => Some(256),
                Some("P-384") => Some(384),
                Some("P-521") => Some(521),
                _ => None,
            };
            info.curve = curve;
        }
        oid::ED25519 => {
            info.algorithm = "Ed25519".into();
            info.key_size = Some(256);
        }
        oid::ED448 => {
            info.algorithm = "Ed448".into();
            info.key_size = Some(456);
        }
        _ => {}
    }
    info
}

fn named_curve(algorithm: &AlgorithmIdentifier<'_>) -> Option<String> {
    let curve = algorithm.parameters.as_ref()?.as_oid().ok()?.to_id_string();
    Some(match curve.as_str() {
        oid::CURVE_P256 => "P-256".into(),
        oid::CURVE_P384 => "P-384".into(),
        oid::CURVE_P521 => "P-521".into(),
        _ => curve,
    })
}

fn extension(ext: &X509Extension<'_>) -> Extension {
    let oid_str = ext.oid.to_id_string();

    let value = match ext.parsed_extension() {
        ParsedExtension::BasicConstraints(bc) => ExtensionValue::BasicConstraints {
            ca: bc.ca,
            path_len: bc.path_len_constraint,
        },
        ParsedExtension::KeyUsage(ku) => {
            let flags = [
                (ku.digital_signature(), "Digital Signature"),
                (ku.non_repudiation(), "Non Repudiation"),
                (ku.key_encipherment(), "Key Encipherment"),
                (ku.data_encipherment(), "Data Encipherment"),
                (ku.key_agreement(), "Key Agreement"),
                (ku.key_cert_sign(), "Certificate Sign"),
                (ku.crl_sign(), "CRL Sign"),
                (ku.encipher_only(), "Encipher Only"),
                (ku.decipher_only(), "Decipher Only"),
            ];
            ExtensionValue::KeyUsage(
                flags
                    .iter()
                    .filter(|(set, _)| *set)
                    .map(|(_, name)| name.to_string())
                    .collect(),
            )
        }
        ParsedExtension::ExtendedKeyUsage(eku) => {
            let flags = [
                (eku.any, "Any Extended Key Usage"),
                (eku.server_auth, "TLS Web Server Authentication"),
                (eku.client_auth, "TLS Web Client Authentication"),
                (eku.code_signing, "Code Signing"),
                (eku.email_protection, "E-mail Protection"),
                (eku.time_stamping, "Time Stamping"),
                (eku.ocsp_signing, "OCSP Signing"),
            ];
            let mut usages: Vec<String> = flags
                .iter()
                .filter(|(set, _)| *set)
                .map(|(_, name)| name.to_string())
                .collect();
            usages.extend(eku.other.iter().map(|oid| oid.to_id_string()));
            ExtensionValue::ExtendedKeyUsage(usages)
        }
        ParsedExtension::SubjectAlternativeName(san) => {
            ExtensionValue::SubjectAltName(san.general_names.iter().map(san_entry).collect())
        }
        ParsedExtension::SubjectKeyIdentifier(ski) => {
            ExtensionValue::SubjectKeyIdentifier(util::hex_colon_upper(ski.0))
        }
        ParsedExtension::AuthorityKeyIdentifier(aki) => ExtensionValue::AuthorityKeyIdentifier(
            aki.key_identifier
                .as_ref()
                .map(|ki| util::hex_colon_upper(ki.0)),
        ),
        _ => ExtensionValue::Raw(hex::encode(ext.value)),
    };

    Extension {
        name: extension_name(&oid_str),
        oid: oid_str,
        critical: ext.critical,
        value,
    }
}

fn extension_name(oid_str: &str) -> String {
    let name = match oid_str {
        oid::EXT_SUBJECT_KEY_ID => "Subject Key Identifier",
        oid::EXT_KEY_USAGE => "Key Usage",
        oid::EXT_SUBJECT_ALT_NAME => "Subject Alternative Name",
        oid::EXT_BASIC_CONSTRAINTS => "Basic Constraints",
        oid::EXT_CRL_DISTRIBUTION_POINTS => "CRL Distribution Points",
        oid::EXT_CERTIFICATE_POLICIES => "Certificate Policies",
        oid::EXT_AUTHORITY_KEY_ID => "Authority Key Identifier",
        oid::EXT_EXTENDED_KEY_USAGE => "Extended Key Usage",
        oid::EXT_AUTHORITY_INFO_ACCESS => "Authority Information Access",
        other => return other.to_string(),
    };
    name.to_string()
}

fn san_entry(name: &GeneralName<'_>) -> SanEntry {
    match name {
        GeneralName::DNSName(dns) => SanEntry::Dns(dns.to_string()),
        GeneralName::RFC822Name(email) => SanEntry::Email(email.to_string()),
        GeneralName::URI(uri) => SanEntry::Uri(uri.to_string()),
        GeneralName::IPAddress(bytes) => SanEntry::Ip(ip_address(bytes)),
        GeneralName::DirectoryName(dn) => SanEntry::DirName(distinguished_name(dn).to_oneline()),
        other => SanEntry::Other(format!("{:?}", other)),
    }
}

fn ip_address(bytes: &[u8]) -> String {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        std::net::Ipv4Addr::from(octets).to_string()
    } else if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        std::net::Ipv6Addr::from(octets).to_string()
    } else {
        hex::encode(bytes)
    }
}
