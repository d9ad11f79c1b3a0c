//! ECDSA P-256 key operations.

use crate::error::{PkiError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use rcgen::{KeyPair, SerialNumber, PKCS_ECDSA_P256_SHA256};

/// Generate a new ECDSA P-256 key pair.
///
/// # Example
///
/// ```
/// use eaa_pki::crypto::ecdsa::{generate_p256_keypair, is_p256};
///
/// let key = generate_p256_keypair().unwrap();
/// assert!(is_p256(&key));
/// ```
pub fn generate_p256_keypair() -> Result<KeyPair> {
    KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256)
        .map_err(|e| PkiError::KeyGenerationError(format!("P-256 key generation failed: {}", e)))
}

/// DER-encoded SubjectPublicKeyInfo of the key's public half.
pub fn public_key_spki_der(key: &KeyPair) -> Vec<u8> {
    key.public_key_der()
}

/// Whether the key pair signs with ECDSA P-256 / SHA-256.
pub fn is_p256(key: &KeyPair) -> bool {
    key.algorithm() == &PKCS_ECDSA_P256_SHA256
}

/// Draw a positive, non-zero 63-bit serial number from the OS CSPRNG.
pub fn random_serial_number() -> Result<SerialNumber> {
    Ok(SerialNumber::from(random_serial_u64()?))
}

fn random_serial_u64() -> Result<u64> {
    let mut bytes = [0u8; 8];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| PkiError::KeyGenerationError(format!("Entropy source failed: {}", e)))?;
    bytes[0] &= 0x7F; // Ensure positive

    Ok(u64::from_be_bytes(bytes).max(1))
}
