//! PEM boundary handling: normalization to a bare base64 payload and
//! re-wrapping of DER bytes.

use crate::util;

/// Opening boundary of a PEM certificate block.
pub const BEGIN_CERTIFICATE: &str = "-----BEGIN CERTIFICATE-----";

/// Closing boundary of a PEM certificate block.
pub const END_CERTIFICATE: &str = "-----END CERTIFICATE-----";

/// Reduce PEM certificate text to its base64 payload.
///
/// Every occurrence of the boundary markers and every line break is removed,
/// then surrounding whitespace is trimmed. This never fails; a malformed
/// payload is reported by the base64 decode that follows.
pub fn normalize_pem(pem: &str) -> String {
    pem.replace(BEGIN_CERTIFICATE, "")
        .replace(END_CERTIFICATE, "")
        .replace(['\n', '\r'], "")
        .trim()
        .to_string()
}

/// Wrap DER-encoded certificate bytes in PEM boundaries, 64 columns per line.
pub fn der_to_pem(der: &[u8]) -> String {
    format!(
        "{}\n{}\n{}\n",
        BEGIN_CERTIFICATE,
        util::base64_wrap(der),
        END_CERTIFICATE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_markers_and_line_breaks() {
        let pem = "-----BEGIN CERTIFICATE-----\nAAEC\nAwQF\n-----END CERTIFICATE-----\n";
        assert_eq!(normalize_pem(pem), "AAECAwQF");
    }

    #[test]
    fn strips_crlf_line_endings() {
        let pem = "-----BEGIN CERTIFICATE-----\r\nAAEC\r\nAwQF\r\n-----END CERTIFICATE-----\r\n";
        assert_eq!(normalize_pem(pem), "AAECAwQF");
    }

    #[test]
    fn strips_every_marker_occurrence() {
        let pem = "-----BEGIN CERTIFICATE-----AAEC-----END CERTIFICATE-----\
                   -----BEGIN CERTIFICATE-----AwQF-----END CERTIFICATE-----";
        assert_eq!(normalize_pem(pem), "AAECAwQF");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_pem("  \t AAECAwQF \t "), "AAECAwQF");
    }

    #[test]
    fn bare_payload_is_unchanged() {
        assert_eq!(normalize_pem("AAECAwQF"), "AAECAwQF");
    }

    #[test]
    fn malformed_input_still_normalizes() {
        assert_eq!(normalize_pem("-----BEGIN CERTIFICATE-----\n!!\n"), "!!");
        assert_eq!(normalize_pem(""), "");
    }

    #[test]
    fn der_to_pem_wraps_at_64_columns() {
        let pem = der_to_pem(&[0u8; 96]);
        let lines: Vec<&str> = pem.lines().collect();
        assert_eq!(lines.first().copied(), Some(BEGIN_CERTIFICATE));
        assert_eq!(lines.last().copied(), Some(END_CERTIFICATE));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.get(1).map(|l| l.len()), Some(64));
        assert_eq!(lines.get(2).map(|l| l.len()), Some(64));
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(input in "[A-Za-z0-9+/= \t\r\n]{0,256}") {
            let once = normalize_pem(&input);
            prop_assert_eq!(normalize_pem(&once), once.clone());
        }

        #[test]
        fn normalized_output_has_no_markers_or_line_breaks(
            lines in proptest::collection::vec("[A-Za-z0-9+/=]{0,64}", 0..8)
        ) {
            let pem = format!(
                "{BEGIN_CERTIFICATE}\n{}\n{END_CERTIFICATE}\n{BEGIN_CERTIFICATE}\n{END_CERTIFICATE}",
                lines.join("\n")
            );
            let out = normalize_pem(&pem);
            prop_assert!(!out.contains(BEGIN_CERTIFICATE));
            prop_assert!(!out.contains(END_CERTIFICATE));
            prop_assert!(!out.contains('\n'));
            prop_assert_eq!(out, lines.concat());
        }
    }
}
