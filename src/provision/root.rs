//! Root CA provisioning.

use super::{harden_dirs, Artifact, CertKeyPair, ProvisionObserver, Provisioner};
use crate::cert::ca::create_root_ca;
use crate::cert::verify::verify_key_matches;
use crate::config::CertsPaths;
use crate::crypto::ecdsa::generate_p256_keypair;
use crate::error::{Result, ResultExt};
use crate::storage::KeyCertStore;
use tracing::{debug, warn};

impl<S: KeyCertStore, O: ProvisionObserver> Provisioner<S, O> {
    /// Load the root CA key and certificate, generating whichever is missing.
    ///
    /// Key and certificate are handled independently, so a surviving key is
    /// reused when only the certificate was lost. The certificate must carry
    /// the public half of the key; a mismatch is returned as a verification
    /// error and nothing on disk is touched.
    pub fn ensure_root_ca(&self, paths: &CertsPaths) -> Result<CertKeyPair> {
        let key_path = &paths.root_key_path;
        let cert_path = &paths.root_cert_path;
        harden_dirs(&[key_path, cert_path])?;

        let key = match self.store.load_key(key_path) {
            Ok(key) => {
                debug!(path = %key_path.display(), "Loaded existing CA key");
                key
            }
            Err(err) => {
                warn!(path = %key_path.display(), error = %err, "CA key unavailable, generating");
                let key = generate_p256_keypair().context("Unable to generate CA key")?;
                self.persist_key(&key, key_path, Artifact::RootKey)?;
                key
            }
        };

        let cert = match self.store.load_cert(cert_path) {
            Ok(cert) => {
                debug!(path = %cert_path.display(), "Loaded existing CA certificate");
                cert
            }
            Err(err) => {
                warn!(path = %cert_path.display(), error = %err, "CA certificate unavailable, generating");
                let cert =
                    create_root_ca(&key, &self.profile).context("unable to generate root CA")?;
                self.persist_cert(&cert, cert_path, Artifact::RootCertificate)?;
                cert
            }
        };

        verify_key_matches(&cert, &key).context(format!(
            "Verification of root CA {} against {} failed",
            cert_path.display(),
            key_path.display()
        ))?;

        Ok(CertKeyPair::new(cert, key))
    }
}
