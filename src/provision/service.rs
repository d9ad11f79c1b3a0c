//! Service (EAA) certificate provisioning.

use super::{harden_dirs, Artifact, CertKeyPair, ProvisionObserver, Provisioner};
use crate::cert::entity::create_service_cert;
use crate::cert::verify::{verify_issued_by, verify_key_matches};
use crate::config::CertsPaths;
use crate::crypto::ecdsa::generate_p256_keypair;
use crate::error::{PkiError, Result, ResultExt};
use crate::storage::KeyCertStore;
use rcgen::KeyPair;
use tracing::{debug, warn};
use x509_cert::Certificate;

impl<S: KeyCertStore, O: ProvisionObserver> Provisioner<S, O> {
    /// Load the service key and certificate, generating whichever is missing.
    ///
    /// The root CA key and certificate must already be loadable; they are
    /// never generated here, and must belong together. A certificate that
    /// does not carry the service key's public half, or that does not verify
    /// under the root CA, is returned as a verification error. Nothing is
    /// written when the root pair is inconsistent, and a newly issued
    /// certificate is checked before it is stored.
    pub fn ensure_service_cert(&self, paths: &CertsPaths) -> Result<CertKeyPair> {
        let root_cert = self
            .store
            .load_cert(&paths.root_cert_path)
            .map_err(|source| PkiError::RootUnavailable {
                path: paths.root_cert_path.clone(),
                source: Box::new(source),
            })
            .context("Unable to load Root CA Cert")?;

        let root_key = self
            .store
            .load_key(&paths.root_key_path)
            .map_err(|source| PkiError::RootUnavailable {
                path: paths.root_key_path.clone(),
                source: Box::new(source),
            })
            .context("Unable to load Root CA Private Key")?;

        verify_key_matches(&root_cert, &root_key).context(format!(
            "Verification of root CA {} against {} failed",
            paths.root_cert_path.display(),
            paths.root_key_path.display()
        ))?;

        let key_path = &paths.service_key_path;
        let cert_path = &paths.service_cert_path;
        harden_dirs(&[key_path, cert_path])?;

        let key = match self.store.load_key(key_path) {
            Ok(key) => {
                debug!(path = %key_path.display(), "Loaded existing EAA key");
                key
            }
            Err(err) => {
                warn!(path = %key_path.display(), error = %err, "EAA key unavailable, generating");
                let key = generate_p256_keypair().context("Unable to create EAA private key")?;
                self.persist_key(&key, key_path, Artifact::ServiceKey)?;
                key
            }
        };

        let cert = match self.store.load_cert(cert_path) {
            Ok(cert) => {
                debug!(path = %cert_path.display(), "Loaded existing EAA certificate");
                check_service_cert(&cert, &key, &root_cert, paths)?;
                cert
            }
            Err(err) => {
                warn!(path = %cert_path.display(), error = %err, "EAA certificate unavailable, generating");
                let cert = create_service_cert(&key, &root_cert, &root_key, &self.profile)
                    .context("Unable to create EAA cert")?;
                check_service_cert(&cert, &key, &root_cert, paths)?;
                self.persist_cert(&cert, cert_path, Artifact::ServiceCertificate)?;
                cert
            }
        };

        Ok(CertKeyPair::new(cert, key))
    }
}

/// The service certificate must carry the service key and chain to the root.
fn check_service_cert(
    cert: &Certificate,
    key: &KeyPair,
    root_cert: &Certificate,
    paths: &CertsPaths,
) -> Result<()> {
    verify_key_matches(cert, key).context(format!(
        "Verification of EAA certificate {} against {} failed",
        paths.service_cert_path.display(),
        paths.service_key_path.display()
    ))?;
    verify_issued_by(cert, root_cert).context(format!(
        "Verification of EAA certificate {} against root CA {} failed",
        paths.service_cert_path.display(),
        paths.root_cert_path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::FlakyStore;
    use super::super::{NoopObserver, ProvisionEvent};
    use super::*;
    use crate::config::IdentityProfile;
    use crate::storage::PemFileStore;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    fn quiet() -> Provisioner<PemFileStore, NoopObserver> {
        Provisioner::with_parts(PemFileStore, NoopObserver, IdentityProfile::default())
    }

    #[test]
    fn test_requires_root() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());

        let err = quiet().ensure_service_cert(&paths).unwrap_err();

        assert!(err.to_string().starts_with("Unable to load Root CA Cert"));
        assert!(matches!(err.root_cause(), PkiError::RootUnavailable { .. }));
        assert!(!paths.service_key_path.exists());
        assert!(!paths.root_key_path.exists());
    }

    #[test]
    fn test_requires_root_key() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());
        let provisioner = quiet();
        provisioner.ensure_root_ca(&paths).unwrap();
        fs::remove_file(&paths.root_key_path).unwrap();

        let err = provisioner.ensure_service_cert(&paths).unwrap_err();

        assert!(err
            .to_string()
            .starts_with("Unable to load Root CA Private Key"));
        assert!(!paths.root_key_path.exists());
    }

    #[test]
    fn test_issues_and_reuses() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());
        let provisioner = quiet();
        let root = provisioner.ensure_root_ca(&paths).unwrap();

        let first = provisioner.ensure_service_cert(&paths).unwrap();
        let cert_bytes = fs::read(&paths.service_cert_path).unwrap();
        let second = provisioner.ensure_service_cert(&paths).unwrap();

        assert_eq!(fs::read(&paths.service_cert_path).unwrap(), cert_bytes);
        assert_eq!(first.certificate(), second.certificate());
        assert_eq!(
            first.certificate().tbs_certificate.issuer,
            root.certificate().tbs_certificate.subject
        );
        verify_issued_by(first.certificate(), root.certificate()).unwrap();
    }

    #[test]
    fn test_missing_cert_reissued_for_existing_key() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());
        let provisioner = quiet();
        provisioner.ensure_root_ca(&paths).unwrap();
        provisioner.ensure_service_cert(&paths).unwrap();

        let key_bytes = fs::read(&paths.service_key_path).unwrap();
        fs::remove_file(&paths.service_cert_path).unwrap();

        let service = provisioner.ensure_service_cert(&paths).unwrap();
        assert_eq!(fs::read(&paths.service_key_path).unwrap(), key_bytes);
        verify_key_matches(service.certificate(), service.key()).unwrap();
    }

    #[test]
    fn test_cert_from_replaced_root_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());
        let provisioner = quiet();
        provisioner.ensure_root_ca(&paths).unwrap();
        provisioner.ensure_service_cert(&paths).unwrap();

        fs::remove_file(&paths.root_key_path).unwrap();
        fs::remove_file(&paths.root_cert_path).unwrap();
        provisioner.ensure_root_ca(&paths).unwrap();

        let cert_bytes = fs::read(&paths.service_cert_path).unwrap();
        let err = provisioner.ensure_service_cert(&paths).unwrap_err();

        assert!(err.is_verification());
        assert_eq!(fs::read(&paths.service_cert_path).unwrap(), cert_bytes);
    }

    #[test]
    fn test_service_key_mismatch_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());
        let provisioner = quiet();
        provisioner.ensure_root_ca(&paths).unwrap();
        provisioner.ensure_service_cert(&paths).unwrap();

        let other_key = generate_p256_keypair().unwrap();
        fs::write(&paths.service_key_path, other_key.serialize_pem()).unwrap();

        let err = provisioner.ensure_service_cert(&paths).unwrap_err();
        assert!(err.is_verification());
    }

    #[test]
    fn test_inconsistent_root_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());
        let provisioner = quiet();
        provisioner.ensure_root_ca(&paths).unwrap();
        let root_cert_bytes = fs::read(&paths.root_cert_path).unwrap();

        let other_dir = TempDir::new().unwrap();
        let other_paths = CertsPaths::in_dir(other_dir.path());
        provisioner.ensure_root_ca(&other_paths).unwrap();
        fs::copy(&other_paths.root_cert_path, &paths.root_cert_path).unwrap();

        let err = provisioner.ensure_service_cert(&paths).unwrap_err();
        assert!(err.is_verification());
        assert!(err.to_string().starts_with("Verification of root CA"));
        assert!(!paths.service_key_path.exists());
        assert!(!paths.service_cert_path.exists());

        fs::write(&paths.root_cert_path, root_cert_bytes).unwrap();
        let service = provisioner.ensure_service_cert(&paths).unwrap();
        verify_key_matches(service.certificate(), service.key()).unwrap();
        assert!(paths.service_cert_path.exists());
    }

    #[test]
    fn test_events_emitted_only_on_generation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());
        quiet().ensure_root_ca(&paths).unwrap();

        let seen = RefCell::new(Vec::new());
        let provisioner = Provisioner::with_parts(
            PemFileStore,
            |event: &ProvisionEvent| seen.borrow_mut().push((event.artifact, event.path.clone())),
            IdentityProfile::default(),
        );

        provisioner.ensure_service_cert(&paths).unwrap();
        provisioner.ensure_service_cert(&paths).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (Artifact::ServiceKey, paths.service_key_path.clone()),
                (Artifact::ServiceCertificate, paths.service_cert_path.clone()),
            ]
        );
    }

    #[test]
    fn test_cert_save_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());
        quiet().ensure_root_ca(&paths).unwrap();

        let store = FlakyStore {
            fail_cert_saves: true,
            ..FlakyStore::default()
        };
        let provisioner = Provisioner::with_parts(store, NoopObserver, IdentityProfile::default());

        let err = provisioner.ensure_service_cert(&paths).unwrap_err();
        assert!(err.to_string().starts_with("Unable to store EAA certificate"));
        assert!(paths.service_key_path.exists());
        assert!(!paths.service_cert_path.exists());
        assert_eq!(
            *provisioner.store().saves.borrow(),
            vec![paths.service_key_path.clone()]
        );
    }

    #[test]
    fn test_custom_profile_applied() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CertsPaths::in_dir(temp_dir.path());
        let profile = IdentityProfile {
            service_organization: "Edge Node 7".to_string(),
            ..IdentityProfile::default()
        };
        let provisioner = quiet().with_profile(profile);
        provisioner.ensure_root_ca(&paths).unwrap();

        let service = provisioner.ensure_service_cert(&paths).unwrap();
        assert_eq!(
            service.certificate().tbs_certificate.subject.to_string(),
            "O=Edge Node 7"
        );
    }
}
