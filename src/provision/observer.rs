//! Notifications for generated key material.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// The four files managed by the provisioners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    RootKey,
    RootCertificate,
    ServiceKey,
    ServiceCertificate,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::RootKey => "CA key",
            Artifact::RootCertificate => "CA certificate",
            Artifact::ServiceKey => "EAA key",
            Artifact::ServiceCertificate => "EAA certificate",
        };
        f.write_str(name)
    }
}

/// An artifact was generated and written to `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionEvent {
    pub artifact: Artifact,
    pub path: PathBuf,
}

impl ProvisionEvent {
    pub fn new(artifact: Artifact, path: &Path) -> Self {
        Self {
            artifact,
            path: path.to_path_buf(),
        }
    }
}

/// Receives an event each time an artifact is generated and stored.
///
/// Closures taking `&ProvisionEvent` implement this trait.
pub trait ProvisionObserver {
    fn generated(&self, event: &ProvisionEvent);
}

impl<F> ProvisionObserver for F
where
    F: Fn(&ProvisionEvent),
{
    fn generated(&self, event: &ProvisionEvent) {
        self(event)
    }
}

/// Logs every event at `info` level through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProvisionObserver for TracingObserver {
    fn generated(&self, event: &ProvisionEvent) {
        info!(
            artifact = %event.artifact,
            path = %event.path.display(),
            "Generated and stored {} at: {}",
            event.artifact,
            event.path.display()
        );
    }
}

/// Discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProvisionObserver for NoopObserver {
    fn generated(&self, _event: &ProvisionEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_artifact_display() {
        assert_eq!(Artifact::RootKey.to_string(), "CA key");
        assert_eq!(Artifact::ServiceCertificate.to_string(), "EAA certificate");
    }

    #[test]
    fn test_closure_observer() {
        let seen = RefCell::new(Vec::new());
        let observer = |event: &ProvisionEvent| seen.borrow_mut().push(event.clone());

        observer.generated(&ProvisionEvent::new(
            Artifact::ServiceKey,
            Path::new("/certs/server.key"),
        ));

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].artifact, Artifact::ServiceKey);
        assert_eq!(seen[0].path, PathBuf::from("/certs/server.key"));
    }
}
