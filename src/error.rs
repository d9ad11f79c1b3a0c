//! Error types for the EAA PKI library.
//!
//! Every failure carries enough context to tell which provisioning stage
//! failed and, for filesystem failures, which path was involved.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for provisioning operations.
#[derive(Error, Debug)]
pub enum PkiError {
    /// Key pair generation failed
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Invalid key format or content
    #[error("Invalid key: {0}")]
    InvalidKeyError(String),

    /// Certificate generation, signing or decoding failed
    #[error("Certificate error: {0}")]
    CertificateError(String),

    /// PEM encoding/decoding error
    #[error("PEM error: {0}")]
    PemError(String),

    /// Reading or writing a key/certificate file failed
    #[error("Storage I/O error at {}: {source}", path.display())]
    StorageError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating a directory failed
    #[error("Unable to create {} directory: {source}", path.display())]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Setting directory or file permissions failed
    #[error("Failed to set permissions on {}: {source}", path.display())]
    PermissionError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A certificate does not belong to the key it was paired with, or does
    /// not chain to its issuer.
    #[error("Verification failed: {0}")]
    VerificationError(String),

    /// The root CA key or certificate could not be loaded while issuing the
    /// service certificate.
    #[error("Root CA material unavailable at {}: {source}", path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: Box<PkiError>,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A lower-level error annotated with the provisioning stage it came from
    #[error("{stage}: {source}")]
    Context {
        stage: String,
        #[source]
        source: Box<PkiError>,
    },
}

impl PkiError {
    /// Returns true if this error, or any error it wraps, is an integrity
    /// verification failure.
    pub fn is_verification(&self) -> bool {
        match self {
            PkiError::VerificationError(_) => true,
            PkiError::Context { source, .. } | PkiError::RootUnavailable { source, .. } => {
                source.is_verification()
            }
            _ => false,
        }
    }

    /// The innermost error, skipping stage annotations.
    pub fn root_cause(&self) -> &PkiError {
        match self {
            PkiError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A specialized Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, PkiError>;

/// Attach a human-readable stage description to an error.
pub trait ResultExt<T> {
    fn context(self, stage: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, stage: impl Into<String>) -> Result<T> {
        self.map_err(|source| PkiError::Context {
            stage: stage.into(),
            source: Box::new(source),
        })
    }
}
