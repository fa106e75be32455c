//! certpem: Command-line tool for inspecting PEM-encoded X.509 certificates.

use anyhow::{Context, Result};
use certpem_lib::{CertificateInfo, DigestAlgorithm};
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "certpem",
    about = "Inspect PEM-encoded X.509 certificates",
    long_about = "certpem strips the PEM boundary markers from a certificate, decodes\n\
                  the base64 payload and prints the X.509 fields. Certification\n\
                  requests and CRLs wrapped in certificate markers are rejected.\n\n\
                  All commands read from stdin when no file is given.",
    after_help = "EXAMPLES:\n\
                  \n  certpem show cert.pem\
                  \n  certpem show --json cert.pem\
                  \n  certpem field subject cert.pem\
                  \n  certpem field fingerprint --digest sha384 cert.pem\
                  \n  certpem convert cert.pem cert.der\
                  \n  cat cert.pem | certpem show"
)]
struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display certificate information
    Show {
        /// Certificate file. Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Input is raw DER rather than PEM
        #[arg(long)]
        der: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Print a single field of the certificate
    Field {
        /// Field to print
        field: FieldName,
        /// Certificate file. Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Input is raw DER rather than PEM
        #[arg(long)]
        der: bool,
        /// Hash algorithm for fingerprint: sha256, sha384, sha512, sha1
        #[arg(long, default_value = "sha256", value_parser = parse_digest)]
        digest: DigestAlgorithm,
    },
    /// Re-encode the certificate as normalized PEM or raw DER
    #[command(after_help = "If OUTPUT is given, the format is inferred from its extension\n\
                      (.pem or .der). If OUTPUT is omitted, output goes to stdout\n\
                      and --to is required.")]
    Convert {
        /// Input certificate file. Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Output file. Format is inferred from extension (.pem or .der).
        output: Option<PathBuf>,
        /// Output format: pem, der
        #[arg(long, value_name = "FORMAT")]
        to: Option<OutputFormat>,
        /// Input is raw DER rather than PEM
        #[arg(long)]
        der: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum FieldName {
    Subject,
    Issuer,
    Serial,
    NotBefore,
    NotAfter,
    Fingerprint,
    PublicKey,
    SignatureAlgorithm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Pem,
    Der,
}

/// Maximum size of a certificate input (10 MiB).
const MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            let meta = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat file: {}", path.display()))?;
            if meta.len() > MAX_INPUT_BYTES {
                anyhow::bail!(
                    "File too large ({} bytes, max {} bytes): {}",
                    meta.len(),
                    MAX_INPUT_BYTES,
                    path.display()
                );
            }
            tracing::debug!(path = %path.display(), bytes = meta.len(), "reading certificate");
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => {
            let buf = read_capped(std::io::stdin().lock()).context("Failed to read from stdin")?;
            tracing::debug!(bytes = buf.len(), "read certificate from stdin");
            Ok(buf)
        }
    }
}

/// Read all of `reader`, rejecting input longer than [`MAX_INPUT_BYTES`].
fn read_capped(reader: impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(MAX_INPUT_BYTES + 1).read_to_end(&mut buf)?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        anyhow::bail!("Input too large (max {} bytes)", MAX_INPUT_BYTES);
    }
    Ok(buf)
}

fn parse_input(input: &[u8], der: bool) -> Result<CertificateInfo> {
    let cert = if der {
        certpem_lib::parse_der(input)?
    } else {
        let pem = std::str::from_utf8(input).context("PEM input is not valid UTF-8")?;
        certpem_lib::parse_pem_certificate(pem)?
    };
    tracing::debug!(subject = %cert.subject, serial = %cert.serial, "parsed certificate");
    Ok(cert)
}

fn load(file: Option<&Path>, der: bool) -> Result<CertificateInfo> {
    let input = read_input(file)?;
    let cert = parse_input(&input, der);
    if let (Err(e), Some(path)) = (&cert, file) {
        tracing::warn!(path = %path.display(), error = %e, "certificate rejected");
    }
    cert
}

fn parse_digest(s: &str) -> Result<DigestAlgorithm, String> {
    DigestAlgorithm::from_name(s).ok_or_else(|| {
        format!(
            "unknown digest '{}' (expected sha256, sha384, sha512 or sha1)",
            s
        )
    })
}

/// Infer the output format from a file extension.
fn infer_format(path: &Path) -> Option<OutputFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pem") => Some(OutputFormat::Pem),
        Some(ext) if ext.eq_ignore_ascii_case("der") => Some(OutputFormat::Der),
        _ => None,
    }
}

fn field_value(cert: &CertificateInfo, field: FieldName, digest: DigestAlgorithm) -> String {
    match field {
        FieldName::Subject => cert.subject_string(),
        FieldName::Issuer => cert.issuer_string(),
        FieldName::Serial => cert.serial_hex().to_string(),
        FieldName::NotBefore => cert.not_before().iso8601.clone(),
        FieldName::NotAfter => cert.not_after().iso8601.clone(),
        FieldName::Fingerprint => format!("{}={}", digest.name(), cert.fingerprint(digest)),
        FieldName::PublicKey => cert.public_key_pem().trim_end().to_string(),
        FieldName::SignatureAlgorithm => cert.signature_algorithm.clone(),
    }
}

fn encode(cert: &CertificateInfo, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Pem => cert.to_pem().into_bytes(),
        OutputFormat::Der => cert.to_der().to_vec(),
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Show { file, der, json } => {
            let cert = load(file.as_deref(), der)?;
            if json {
                println!("{}", certpem_lib::to_json(&cert)?);
            } else {
                print!("{}", certpem_lib::display_text(&cert));
            }
        }
        Commands::Field {
            field,
            file,
            der,
            digest,
        } => {
            let cert = load(file.as_deref(), der)?;
            println!("{}", field_value(&cert, field, digest));
        }
        Commands::Convert {
            file,
            output,
            to,
            der,
        } => {
            let format = match (to, output.as_deref()) {
                (Some(format), _) => format,
                (None, Some(path)) => infer_format(path).with_context(|| {
                    format!(
                        "Cannot infer output format from {}; use --to pem or --to der",
                        path.display()
                    )
                })?,
                (None, None) => anyhow::bail!("--to is required when writing to stdout"),
            };
            let cert = load(file.as_deref(), der)?;
            let bytes = encode(&cert, format);
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote certificate");
                }
                None => std::io::stdout()
                    .write_all(&bytes)
                    .context("Failed to write to stdout")?,
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../tests/certs")
            .join(name)
    }

    fn isrg() -> CertificateInfo {
        load(Some(fixture("isrg-root-x1.pem").as_path()), false).unwrap()
    }

    // ---- parse_digest ----

    #[test]
    fn parse_digest_accepts_known_names() {
        assert_eq!(parse_digest("sha256").unwrap(), DigestAlgorithm::Sha256);
        assert_eq!(parse_digest("SHA-384").unwrap(), DigestAlgorithm::Sha384);
        assert_eq!(parse_digest("sha512").unwrap(), DigestAlgorithm::Sha512);
        assert_eq!(parse_digest("sha1").unwrap(), DigestAlgorithm::Sha1);
    }

    #[test]
    fn parse_digest_rejects_unknown_names() {
        assert!(parse_digest("md5").is_err());
        assert!(parse_digest("").is_err());
    }

    // ---- infer_format ----

    #[test]
    fn infer_format_from_extension() {
        assert_eq!(infer_format(Path::new("out.pem")), Some(OutputFormat::Pem));
        assert_eq!(infer_format(Path::new("out.DER")), Some(OutputFormat::Der));
        assert_eq!(infer_format(Path::new("out.crt")), None);
        assert_eq!(infer_format(Path::new("out")), None);
    }

    // ---- input handling ----

    #[test]
    fn load_pem_and_der_agree() {
        let from_der = load(Some(fixture("isrg-root-x1.der").as_path()), true).unwrap();
        assert_eq!(isrg(), from_der);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(load(Some(fixture("does-not-exist.pem").as_path()), false).is_err());
    }

    #[test]
    fn read_capped_accepts_input_at_the_limit() {
        let input = std::io::repeat(b'A').take(MAX_INPUT_BYTES);
        assert_eq!(read_capped(input).unwrap().len() as u64, MAX_INPUT_BYTES);
    }

    #[test]
    fn read_capped_rejects_oversized_input() {
        let err = read_capped(std::io::repeat(b'A')).unwrap_err();
        assert!(err.to_string().contains("too large"), "{}", err);
    }

    #[test]
    fn der_bytes_are_not_accepted_as_pem() {
        let der = std::fs::read(fixture("isrg-root-x1.der")).unwrap();
        assert!(parse_input(&der, false).is_err());
    }

    // ---- field output ----

    #[test]
    fn field_values() {
        let cert = isrg();
        let sha = DigestAlgorithm::Sha256;
        assert_eq!(
            field_value(&cert, FieldName::Subject, sha),
            "C = US, O = Internet Security Research Group, CN = ISRG Root X1"
        );
        assert_eq!(
            field_value(&cert, FieldName::Serial, sha),
            "82:10:CF:B0:D2:40:E3:59:44:63:E0:BB:63:82:8B:00"
        );
        assert_eq!(
            field_value(&cert, FieldName::NotAfter, sha),
            "2035-06-04T11:04:38Z"
        );
        assert_eq!(
            field_value(&cert, FieldName::SignatureAlgorithm, sha),
            "sha256WithRSAEncryption"
        );
        assert!(field_value(&cert, FieldName::Fingerprint, DigestAlgorithm::Sha1)
            .starts_with("SHA-1=CA:BD:2A:79"));
        assert!(field_value(&cert, FieldName::PublicKey, sha).ends_with("-----END PUBLIC KEY-----"));
    }

    // ---- convert ----

    #[test]
    fn encode_der_matches_fixture() {
        let der = std::fs::read(fixture("isrg-root-x1.der")).unwrap();
        assert_eq!(encode(&isrg(), OutputFormat::Der), der);
    }

    #[test]
    fn encode_pem_matches_fixture() {
        let pem = std::fs::read(fixture("isrg-root-x1.pem")).unwrap();
        assert_eq!(encode(&isrg(), OutputFormat::Pem), pem);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
