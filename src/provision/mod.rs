//! First-boot provisioning of the root CA and the service identity.
//!
//! [`Provisioner::ensure_root_ca`] must succeed before
//! [`Provisioner::ensure_service_cert`] can, since the service certificate is
//! signed with the stored root key. Both are idempotent: material already
//! on disk is loaded and checked, never regenerated.
//!
//! Nothing here locks the target files. Running two provisioners against
//! the same paths at the same time must be prevented by the deployment.
//!
//! # Example
//!
//! ```rust,no_run
//! use eaa_pki::config::CertsPaths;
//! use eaa_pki::provision::Provisioner;
//!
//! # fn example() -> eaa_pki::error::Result<()> {
//! let paths = CertsPaths::in_dir("/var/lib/eaa/certs");
//! let provisioner = Provisioner::new();
//!
//! let root = provisioner.ensure_root_ca(&paths)?;
//! let service = provisioner.ensure_service_cert(&paths)?;
//! # Ok(())
//! # }
//! ```

pub mod observer;
mod root;
mod service;

pub use observer::{Artifact, NoopObserver, ProvisionEvent, ProvisionObserver, TracingObserver};

use crate::cert::loader::{cert_to_der, cert_to_pem};
use crate::config::{CertsPaths, IdentityProfile};
use crate::error::{Result, ResultExt};
use crate::storage::dirs::ensure_parent_dir;
use crate::storage::{KeyCertStore, PemFileStore};
use rcgen::KeyPair;
use std::fmt;
use std::path::{Path, PathBuf};
use x509_cert::Certificate;

/// A certificate bound to the private key it was issued for.
pub struct CertKeyPair {
    certificate: Certificate,
    key: KeyPair,
}

impl CertKeyPair {
    pub fn new(certificate: Certificate, key: KeyPair) -> Self {
        Self { certificate, key }
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn key(&self) -> &KeyPair {
        &self.key
    }

    /// DER encoding of the certificate, for handing to a TLS stack.
    pub fn cert_der(&self) -> Result<Vec<u8>> {
        cert_to_der(&self.certificate)
    }

    pub fn cert_pem(&self) -> Result<String> {
        cert_to_pem(&self.certificate)
    }

    /// PKCS#8 DER encoding of the private key.
    pub fn key_der(&self) -> Vec<u8> {
        self.key.serialize_der()
    }

    pub fn into_parts(self) -> (Certificate, KeyPair) {
        (self.certificate, self.key)
    }
}

impl fmt::Debug for CertKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertKeyPair")
            .field("subject", &self.certificate.tbs_certificate.subject.to_string())
            .field("issuer", &self.certificate.tbs_certificate.issuer.to_string())
            .finish_non_exhaustive()
    }
}

/// Loads or generates the root CA and service identities.
#[derive(Debug, Clone)]
pub struct Provisioner<S = PemFileStore, O = TracingObserver> {
    store: S,
    observer: O,
    profile: IdentityProfile,
}

impl Provisioner {
    /// PEM files on disk, `tracing` notifications, default profile.
    pub fn new() -> Self {
        Self::with_parts(PemFileStore, TracingObserver, IdentityProfile::default())
    }
}

impl Default for Provisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, O> Provisioner<S, O> {
    pub fn with_parts(store: S, observer: O, profile: IdentityProfile) -> Self {
        Self {
            store,
            observer,
            profile,
        }
    }

    /// Replace the identity profile used for newly generated certificates.
    pub fn with_profile(mut self, profile: IdentityProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn profile(&self) -> &IdentityProfile {
        &self.profile
    }
}

impl<S: KeyCertStore, O: ProvisionObserver> Provisioner<S, O> {
    /// Ensure the root CA and then the service identity.
    pub fn ensure_all(&self, paths: &CertsPaths) -> Result<(CertKeyPair, CertKeyPair)> {
        let root = self.ensure_root_ca(paths)?;
        let service = self.ensure_service_cert(paths)?;
        Ok((root, service))
    }

    fn persist_key(&self, key: &KeyPair, path: &Path, artifact: Artifact) -> Result<()> {
        self.store
            .save_key(key, path)
            .context(format!("Unable to store {}", artifact))?;

        self.observer.generated(&ProvisionEvent::new(artifact, path));
        Ok(())
    }

    fn persist_cert(&self, cert: &Certificate, path: &Path, artifact: Artifact) -> Result<()> {
        self.store
            .save_cert(path, cert)
            .context(format!("Unable to store {}", artifact))?;

        self.observer.generated(&ProvisionEvent::new(artifact, path));
        Ok(())
    }
}

/// Create the directories holding `files` and force them to owner-only
/// access. Runs on every provisioning call, not only when generating.
fn harden_dirs(files: &[&PathBuf]) -> Result<()> {
    for file in files {
        ensure_parent_dir(file).context("Unable to create directory")?;
    }
    Ok(())
}

/// Ensure the root CA with PEM files and `tracing` notifications.
pub fn ensure_root_ca(paths: &CertsPaths) -> Result<CertKeyPair> {
    Provisioner::new().ensure_root_ca(paths)
}

/// Ensure the service identity with PEM files and `tracing` notifications.
pub fn ensure_service_cert(paths: &CertsPaths) -> Result<CertKeyPair> {
    Provisioner::new().ensure_service_cert(paths)
}
