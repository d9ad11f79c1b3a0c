//! Cryptographic primitives for provisioning.
//!
//! This module wraps ECDSA P-256 key generation and the secure random
//! source used for certificate serial numbers.
//!
//! # Example
//!
//! ```rust
//! use eaa_pki::crypto::ecdsa::{generate_p256_keypair, public_key_spki_der};
//!
//! # fn example() -> eaa_pki::error::Result<()> {
//! let key = generate_p256_keypair()?;
//! assert!(!public_key_spki_der(&key).is_empty());
//! # Ok(())
//! # }
//! ```

pub mod ecdsa;
