//! Root CA certificate operations.
//!
//! This module provides the function that self-signs the root CA.

use crate::cert::builder::root_ca_params;
use crate::cert::loader::cert_from_der;
use crate::config::IdentityProfile;
use crate::crypto::ecdsa::random_serial_number;
use crate::error::{PkiError, Result};
use rcgen::KeyPair;
use time::OffsetDateTime;
use x509_cert::Certificate;

/// Create a self-signed root CA certificate for `key`.
///
/// The serial number is drawn from the OS random source.
///
/// # Example
///
/// ```
/// use eaa_pki::cert::ca::create_root_ca;
/// use eaa_pki::config::IdentityProfile;
/// use eaa_pki::crypto::ecdsa::generate_p256_keypair;
///
/// # fn example() -> eaa_pki::error::Result<()> {
/// let key = generate_p256_keypair()?;
/// let cert = create_root_ca(&key, &IdentityProfile::default())?;
/// assert_eq!(cert.tbs_certificate.issuer, cert.tbs_certificate.subject);
/// # Ok(())
/// # }
/// ```
pub fn create_root_ca(key: &KeyPair, profile: &IdentityProfile) -> Result<Certificate> {
    let serial = random_serial_number()?;
    let params = root_ca_params(profile, serial, OffsetDateTime::now_utc());

    let cert = params
        .self_signed(key)
        .map_err(|e| PkiError::CertificateError(format!("unable to create CA certificate: {}", e)))?;

    cert_from_der(cert.der())
}
