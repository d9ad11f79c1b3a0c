//! Certificate template utilities.
//!
//! This module fills in rcgen parameters for the two certificate kinds the
//! provisioners issue. Both share the same validity policy.

use crate::config::IdentityProfile;
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose,
    IsCa, KeyIdMethod, KeyUsagePurpose, SerialNumber,
};
use time::{Duration, OffsetDateTime};

/// Backdating applied to `not_before` to tolerate clock skew between peers.
pub const CLOCK_SKEW_TOLERANCE: Duration = Duration::seconds(15);

/// Lifetime of both the root CA and the service certificate.
pub const CERT_LIFETIME: Duration = Duration::days(3 * 365);

/// Compute `(not_before, not_after)` for a certificate issued at `now`.
pub fn validity_window(now: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    (now - CLOCK_SKEW_TOLERANCE, now + CERT_LIFETIME)
}

/// Distinguished name carrying only an organization attribute.
pub fn organization_name(organization: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, organization);
    dn
}

/// Template for the self-signed root CA.
///
/// The root may sign end-entity certificates only (path length 0).
pub fn root_ca_params(
    profile: &IdentityProfile,
    serial: SerialNumber,
    now: OffsetDateTime,
) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name = organization_name(&profile.root_organization);
    params.serial_number = Some(serial);
    params.is_ca = IsCa::Ca(BasicConstraints::Constrained(0));
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::Any];

    let (not_before, not_after) = validity_window(now);
    params.not_before = not_before;
    params.not_after = not_after;

    params
}

/// Template for the service certificate issued by the root CA.
pub fn service_params(profile: &IdentityProfile, now: OffsetDateTime) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name = organization_name(&profile.service_organization);
    params.serial_number = Some(SerialNumber::from(profile.service_serial));
    params.is_ca = IsCa::NoCa;
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::Any];
    params.key_identifier_method = KeyIdMethod::PreSpecified(profile.service_key_id.clone());

    let (not_before, not_after) = validity_window(now);
    params.not_before = not_before;
    params.not_after = not_after;

    params
}
