//! Certificate generation module.
//!
//! This module builds the self-signed root CA and the service certificate it
//! issues, converts certificates to and from PEM, and checks that a
//! certificate belongs to a key and chains to its issuer.

pub mod builder;
pub mod ca;
pub mod entity;
pub mod loader;
pub mod verify;
