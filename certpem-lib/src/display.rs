//! Text and JSON rendering of certificate information.

use crate::fields::{CertificateInfo, DigestAlgorithm, Extension, ExtensionValue};
use crate::CertError;
use std::fmt::Write;

/// Render certificate information as indented, human-readable text.
pub fn display_text(cert: &CertificateInfo) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, cert);
    out
}

fn write_text(out: &mut String, cert: &CertificateInfo) -> std::fmt::Result {
    writeln!(out, "Certificate:")?;
    writeln!(out, "  Version: {}", cert.version)?;
    writeln!(out, "  Serial: {}", cert.serial)?;
    writeln!(out, "  Signature Algorithm: {}", cert.signature_algorithm)?;
    writeln!(out, "  Issuer: {}", cert.issuer)?;
    writeln!(out, "  Validity:")?;
    writeln!(out, "    Not Before: {}", cert.validity.not_before)?;
    writeln!(out, "    Not After:  {}", cert.validity.not_after)?;
    writeln!(out, "  Subject: {}", cert.subject)?;

    let key = &cert.public_key;
    write!(out, "  Public Key: {}", key.algorithm)?;
    if let Some(bits) = key.key_size {
        write!(out, " ({} bit)", bits)?;
    }
    if let Some(curve) = &key.curve {
        write!(out, " [{}]", curve)?;
    }
    if let Some(exponent) = key.exponent {
        write!(out, " exponent {}", exponent)?;
    }
    writeln!(out)?;

    if !cert.extensions.is_empty() {
        writeln!(out, "  Extensions:")?;
        for ext in &cert.extensions {
            write_extension(out, ext)?;
        }
    }

    writeln!(
        out,
        "  Fingerprint ({}): {}",
        DigestAlgorithm::Sha256.name(),
        cert.fingerprint(DigestAlgorithm::Sha256)
    )
}

fn write_extension(out: &mut String, ext: &Extension) -> std::fmt::Result {
    let critical = if ext.critical { " [critical]" } else { "" };
    write!(out, "    {}{}:", ext.name, critical)?;

    match &ext.value {
        ExtensionValue::BasicConstraints { ca, path_len } => {
            write!(out, " CA={}", ca)?;
            if let Some(n) = path_len {
                write!(out, ", pathlen:{}", n)?;
            }
            writeln!(out)
        }
        ExtensionValue::KeyUsage(usages) | ExtensionValue::ExtendedKeyUsage(usages) => {
            writeln!(out, " {}", usages.join(", "))
        }
        ExtensionValue::SubjectAltName(entries) => {
            let names: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
            writeln!(out, " {}", names.join(", "))
        }
        ExtensionValue::SubjectKeyIdentifier(id) => writeln!(out, " {}", id),
        ExtensionValue::AuthorityKeyIdentifier(Some(id)) => writeln!(out, " keyid:{}", id),
        ExtensionValue::AuthorityKeyIdentifier(None) => writeln!(out),
        ExtensionValue::Raw(hex) => match hex.get(..40) {
            Some(prefix) if hex.len() > 40 => writeln!(out, " {}...", prefix),
            _ => writeln!(out, " {}", hex),
        },
    }
}

/// Serialize certificate information to pretty-printed JSON.
pub fn to_json(cert: &CertificateInfo) -> Result<String, CertError> {
    Ok(serde_json::to_string_pretty(cert)?)
}
