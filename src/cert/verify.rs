//! Certificate integrity checks.

use crate::crypto::ecdsa::public_key_spki_der;
use crate::error::{PkiError, Result};
use const_oid::db::rfc5912::ECDSA_WITH_SHA_256;
use der::Encode;
use rcgen::KeyPair;
use ring::signature::{UnparsedPublicKey, ECDSA_P256_SHA256_ASN1};
use x509_cert::Certificate;

/// Check that `cert` was issued for `key`.
///
/// Compares the certificate's SubjectPublicKeyInfo with the DER public key
/// derived from `key`, byte for byte.
pub fn verify_key_matches(cert: &Certificate, key: &KeyPair) -> Result<()> {
    let cert_spki = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| PkiError::CertificateError(format!("Failed to encode public key: {}", e)))?;

    if cert_spki != public_key_spki_der(key) {
        return Err(PkiError::VerificationError(
            "certificate public key does not match the private key".to_string(),
        ));
    }

    Ok(())
}

/// Check that `cert` names `issuer` as its issuer and carries a valid
/// ECDSA P-256/SHA-256 signature made with the issuer's key.
pub fn verify_issued_by(cert: &Certificate, issuer: &Certificate) -> Result<()> {
    if cert.tbs_certificate.issuer != issuer.tbs_certificate.subject {
        return Err(PkiError::VerificationError(format!(
            "issuer '{}' does not match '{}'",
            cert.tbs_certificate.issuer, issuer.tbs_certificate.subject
        )));
    }

    if cert.signature_algorithm.oid != ECDSA_WITH_SHA_256 {
        return Err(PkiError::VerificationError(format!(
            "unsupported signature algorithm {}",
            cert.signature_algorithm.oid
        )));
    }

    let tbs = cert
        .tbs_certificate
        .to_der()
        .map_err(|e| PkiError::CertificateError(format!("Failed to encode TBS: {}", e)))?;
    let signature = cert.signature.as_bytes().ok_or_else(|| {
        PkiError::VerificationError("signature is not octet aligned".to_string())
    })?;
    let public_key = issuer
        .tbs_certificate
        .subject_public_key_info
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| {
            PkiError::VerificationError("issuer public key is not octet aligned".to_string())
        })?;

    UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, public_key)
        .verify(&tbs, signature)
        .map_err(|_| {
            PkiError::VerificationError(
                "signature does not verify under the issuer public key".to_string(),
            )
        })
}

/// Check that `cert` is signed by its own key.
pub fn verify_self_signed(cert: &Certificate) -> Result<()> {
    verify_issued_by(cert, cert)
}
