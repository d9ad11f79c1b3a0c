//! Service certificate operations.
//!
//! This module issues the service certificate, signed by the root CA.

use crate::cert::builder::service_params;
use crate::cert::loader::{cert_from_der, cert_to_pem};
use crate::config::IdentityProfile;
use crate::error::{PkiError, Result};
use rcgen::{CertificateParams, KeyPair};
use time::OffsetDateTime;
use x509_cert::Certificate;

/// Issue a service certificate for `service_key`, signed by the root CA.
///
/// The issuer name is taken from `root_cert` and the signature is made with
/// `root_key`. The subject public key is the service key's, not the root's.
///
/// # Example
///
/// ```
/// use eaa_pki::cert::ca::create_root_ca;
/// use eaa_pki::cert::entity::create_service_cert;
/// use eaa_pki::config::IdentityProfile;
/// use eaa_pki::crypto::ecdsa::generate_p256_keypair;
///
/// # fn example() -> eaa_pki::error::Result<()> {
/// let profile = IdentityProfile::default();
/// let root_key = generate_p256_keypair()?;
/// let root_cert = create_root_ca(&root_key, &profile)?;
///
/// let service_key = generate_p256_keypair()?;
/// let cert = create_service_cert(&service_key, &root_cert, &root_key, &profile)?;
/// assert_eq!(cert.tbs_certificate.issuer, root_cert.tbs_certificate.subject);
/// # Ok(())
/// # }
/// ```
pub fn create_service_cert(
    service_key: &KeyPair,
    root_cert: &Certificate,
    root_key: &KeyPair,
    profile: &IdentityProfile,
) -> Result<Certificate> {
    let issuer = issuer_from_root(root_cert, root_key)?;
    let params = service_params(profile, OffsetDateTime::now_utc());

    let cert = params
        .signed_by(service_key, &issuer, root_key)
        .map_err(|e| PkiError::CertificateError(format!("Unable to create EAA cert data: {}", e)))?;

    cert_from_der(cert.der())
}

/// Rebuild an rcgen issuer from a stored root certificate.
///
/// rcgen only reads the issuer's name and key identifier when signing, so
/// re-signing the imported parameters with the root key yields an issuer
/// equivalent to the stored one.
fn issuer_from_root(root_cert: &Certificate, root_key: &KeyPair) -> Result<rcgen::Certificate> {
    let root_pem = cert_to_pem(root_cert)?;
    let params = CertificateParams::from_ca_cert_pem(&root_pem)
        .map_err(|e| PkiError::CertificateError(format!("Unable to parse root CA: {}", e)))?;

    params
        .self_signed(root_key)
        .map_err(|e| PkiError::CertificateError(format!("Unable to rebuild root CA issuer: {}", e)))
}
