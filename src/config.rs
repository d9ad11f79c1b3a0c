//! Provisioning configuration.
//!
//! [`CertsPaths`] is the only input the provisioners read. [`IdentityProfile`]
//! carries the names and fixed values stamped into generated certificates.

use crate::error::{PkiError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default file names used by [`CertsPaths::in_dir`].
pub const ROOT_KEY_FILENAME: &str = "rootCA.key";
pub const ROOT_CERT_FILENAME: &str = "rootCA.pem";
pub const SERVICE_KEY_FILENAME: &str = "server.key";
pub const SERVICE_CERT_FILENAME: &str = "server.pem";

/// Locations of the root CA and service key/certificate files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertsPaths {
    #[serde(alias = "caRootKeyPath")]
    pub root_key_path: PathBuf,

    #[serde(alias = "caRootPath")]
    pub root_cert_path: PathBuf,

    #[serde(alias = "serverKeyPath")]
    pub service_key_path: PathBuf,

    #[serde(alias = "serverCertPath")]
    pub service_cert_path: PathBuf,
}

impl CertsPaths {
    /// Place all four files in one directory under their default names.
    ///
    /// # Example
    ///
    /// ```
    /// use eaa_pki::config::CertsPaths;
    ///
    /// let paths = CertsPaths::in_dir("/var/lib/eaa/certs");
    /// assert!(paths.root_key_path.ends_with("rootCA.key"));
    /// ```
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            root_key_path: dir.join(ROOT_KEY_FILENAME),
            root_cert_path: dir.join(ROOT_CERT_FILENAME),
            service_key_path: dir.join(SERVICE_KEY_FILENAME),
            service_cert_path: dir.join(SERVICE_CERT_FILENAME),
        }
    }

    fn validate(&self) -> Result<()> {
        let entries = [
            ("root key", &self.root_key_path),
            ("root certificate", &self.root_cert_path),
            ("service key", &self.service_key_path),
            ("service certificate", &self.service_cert_path),
        ];
        for (name, path) in entries {
            if path.as_os_str().is_empty() {
                return Err(PkiError::ConfigError(format!("{} path is empty", name)));
            }
        }
        Ok(())
    }
}

/// Names and fixed values written into generated certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityProfile {
    /// Organization of the self-signed root CA.
    pub root_organization: String,

    /// Organization of the service certificate.
    pub service_organization: String,

    /// Serial number stamped into every service certificate.
    pub service_serial: u64,

    /// Subject key identifier of the service certificate.
    pub service_key_id: Vec<u8>,
}

impl Default for IdentityProfile {
    fn default() -> Self {
        Self {
            root_organization: "Appliance Root CA Authority".to_string(),
            service_organization: "Appliance Authority".to_string(),
            service_serial: 1658,
            service_key_id: vec![1, 2, 3, 4, 6],
        }
    }
}

/// Configuration file layout used by the `eaa-pki` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PkiConfig {
    #[serde(alias = "certsInfo")]
    pub paths: CertsPaths,

    #[serde(default)]
    pub profile: IdentityProfile,
}

impl PkiConfig {
    /// Configuration with default file names under `dir` and the default profile.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            paths: CertsPaths::in_dir(dir),
            profile: IdentityProfile::default(),
        }
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| PkiError::StorageError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PkiConfig = serde_json::from_str(json)?;
        config.paths.validate()?;
        if config.profile.service_serial == 0 {
            return Err(PkiError::ConfigError(
                "service serial number must be positive".to_string(),
            ));
        }
        Ok(config)
    }
}
