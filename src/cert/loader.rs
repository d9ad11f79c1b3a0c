//! Certificate encoding and loading.
//!
//! Certificates are held as parsed `x509_cert::Certificate` values and
//! stored on disk as PEM.

use crate::error::{PkiError, Result};
use der::{Decode, Encode};
use rustls_pemfile::Item;
use std::io::Cursor;
use x509_cert::Certificate;

/// Load the first certificate from a PEM document.
///
/// # Example
///
/// ```rust,no_run
/// use eaa_pki::cert::loader::load_certificate_from_pem;
///
/// # fn example() -> eaa_pki::error::Result<()> {
/// let pem = std::fs::read_to_string("rootCA.pem").unwrap();
/// let cert = load_certificate_from_pem(&pem)?;
/// # Ok(())
/// # }
/// ```
pub fn load_certificate_from_pem(pem_str: &str) -> Result<Certificate> {
    let mut cursor = Cursor::new(pem_str.as_bytes());

    match rustls_pemfile::read_one(&mut cursor)
        .map_err(|e| PkiError::PemError(format!("Failed to read PEM: {}", e)))?
    {
        Some(Item::X509Certificate(cert_der)) => cert_from_der(cert_der.as_ref()),
        Some(_) => Err(PkiError::PemError(
            "PEM file does not contain a certificate".to_string(),
        )),
        None => Err(PkiError::PemError("Empty PEM file".to_string())),
    }
}

/// Decode a DER-encoded certificate.
pub fn cert_from_der(der: &[u8]) -> Result<Certificate> {
    Certificate::from_der(der)
        .map_err(|e| PkiError::CertificateError(format!("Failed to decode certificate: {}", e)))
}

/// Encode a certificate as DER.
pub fn cert_to_der(cert: &Certificate) -> Result<Vec<u8>> {
    cert.to_der()
        .map_err(|e| PkiError::CertificateError(format!("Failed to encode certificate: {}", e)))
}

/// Encode a certificate as PEM.
pub fn cert_to_pem(cert: &Certificate) -> Result<String> {
    let der = cert_to_der(cert)?;
    Ok(pem::encode(&pem::Pem::new("CERTIFICATE", der)))
}
