#![no_main]

use certpem_lib::{der_to_pem, parse_der, parse_pem_certificate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes as DER must survive a trip through PEM unchanged.
    if let Ok(cert) = parse_der(data) {
        let reparsed = parse_pem_certificate(&der_to_pem(data))
            .expect("PEM-wrapped DER that parsed directly must parse again");
        assert_eq!(cert, reparsed, "certificate changed after PEM roundtrip");
    }
});
