//! EAA PKI: self-bootstrapping root CA and service certificate provisioning
//!
//! This library makes sure a node-local service has a TLS identity before
//! any external PKI is reachable. On every start it:
//!
//! - Loads the root CA key and certificate, generating and storing them on
//!   first run, and checks that the certificate belongs to the key
//! - Loads the service key and certificate, issuing a certificate signed by
//!   the root CA when none exists
//!
//! # Architecture
//!
//! Key material goes through the [`storage::KeyCertStore`] trait, so the
//! provisioners never touch files directly. Every generated artifact is
//! reported to a [`provision::ProvisionObserver`]. All operations return
//! `Result` types; the caller decides whether a failure aborts the process.
//!
//! # Example
//!
//! ```rust,no_run
//! use eaa_pki::config::CertsPaths;
//! use eaa_pki::error::Result;
//! use eaa_pki::provision::{ensure_root_ca, ensure_service_cert};
//!
//! fn example() -> Result<()> {
//!     let paths = CertsPaths::in_dir("/var/lib/eaa/certs");
//!     let root = ensure_root_ca(&paths)?;
//!     let service = ensure_service_cert(&paths)?;
//!     println!("Serving as {:?}, issued by {:?}", service, root);
//!     Ok(())
//! }
//! ```

pub mod cert;
pub mod config;
pub mod crypto;
pub mod error;
pub mod provision;
pub mod storage;

// Re-export commonly used types
pub use config::{CertsPaths, IdentityProfile};
pub use error::{PkiError, Result};
pub use provision::{ensure_root_ca, ensure_service_cert, CertKeyPair, Provisioner};
