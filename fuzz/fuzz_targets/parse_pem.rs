#![no_main]

use certpem_lib::{parse_pem_certificate, DigestAlgorithm};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary text must never panic.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(cert) = parse_pem_certificate(text) {
        let _ = cert.subject_string();
        let _ = cert.issuer_string();
        let _ = cert.serial_compact();
        let _ = cert.not_after().to_openssl();
        let _ = cert.fingerprint(DigestAlgorithm::Sha256);
        let _ = cert.san_entries();
        let _ = certpem_lib::display_text(&cert);
        let _ = certpem_lib::to_json(&cert);
    }
});
