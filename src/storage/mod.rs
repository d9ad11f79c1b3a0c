//! Key and certificate storage module.
//!
//! The provisioners talk to storage only through [`KeyCertStore`].
//! [`PemFileStore`] keeps each key and certificate in its own PEM file.

pub mod dirs;
pub mod pem_store;

pub use pem_store::PemFileStore;

use crate::error::Result;
use rcgen::KeyPair;
use std::path::Path;
use x509_cert::Certificate;

/// Durable storage for private keys and certificates.
///
/// Any load error means "not usable"; the provisioners respond by
/// generating fresh material. Save errors are fatal.
pub trait KeyCertStore {
    /// Load a private key from `path`.
    fn load_key(&self, path: &Path) -> Result<KeyPair>;

    /// Persist `key` to `path`, replacing any existing file.
    fn save_key(&self, key: &KeyPair, path: &Path) -> Result<()>;

    /// Load a certificate from `path`.
    fn load_cert(&self, path: &Path) -> Result<Certificate>;

    /// Persist `cert` to `path`, replacing any existing file.
    fn save_cert(&self, path: &Path, cert: &Certificate) -> Result<()>;
}
