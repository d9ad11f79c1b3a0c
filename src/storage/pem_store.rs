//! PEM file storage for keys and certificates.

use crate::cert::loader::{cert_to_pem, load_certificate_from_pem};
use crate::crypto::ecdsa::is_p256;
use crate::error::{PkiError, Result};
use crate::storage::KeyCertStore;
use rcgen::KeyPair;
use std::fs;
use std::io::Write;
use std::path::Path;
use x509_cert::Certificate;

/// Permissions applied to private key files.
pub const KEY_FILE_MODE: u32 = 0o600;

/// Stores keys as PKCS#8 PEM and certificates as PEM, one file each.
///
/// Only ECDSA P-256 keys are accepted on load; any other key is reported
/// as invalid.
#[derive(Debug, Clone, Copy, Default)]
pub struct PemFileStore;

impl PemFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl KeyCertStore for PemFileStore {
    fn load_key(&self, path: &Path) -> Result<KeyPair> {
        let pem = read_to_string(path)?;
        let key = KeyPair::from_pem(&pem).map_err(|e| {
            PkiError::InvalidKeyError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        if !is_p256(&key) {
            return Err(PkiError::InvalidKeyError(format!(
                "{} is not an ECDSA P-256 key",
                path.display()
            )));
        }

        Ok(key)
    }

    fn save_key(&self, key: &KeyPair, path: &Path) -> Result<()> {
        write_private(path, key.serialize_pem().as_bytes())
    }

    fn load_cert(&self, path: &Path) -> Result<Certificate> {
        let pem = read_to_string(path)?;
        load_certificate_from_pem(&pem)
    }

    fn save_cert(&self, path: &Path, cert: &Certificate) -> Result<()> {
        let pem = cert_to_pem(cert)?;
        fs::write(path, pem).map_err(|source| PkiError::StorageError {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| PkiError::StorageError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let storage_err = |source| PkiError::StorageError {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(KEY_FILE_MODE)
        .open(path)
        .map_err(storage_err)?;

    // mode() only applies to newly created files
    fs::set_permissions(path, fs::Permissions::from_mode(KEY_FILE_MODE)).map_err(|source| {
        PkiError::PermissionError {
            path: path.to_path_buf(),
            source,
        }
    })?;

    file.write_all(contents).map_err(storage_err)?;
    file.sync_all().map_err(storage_err)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = fs::File::create(path).map_err(|source| PkiError::StorageError {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(contents)
        .map_err(|source| PkiError::StorageError {
            path: path.to_path_buf(),
            source,
        })
}
