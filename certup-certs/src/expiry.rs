use crate::{error::*, log::*};
use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use x509_parser::pem::parse_x509_pem;

/// Read the `notAfter` timestamp of the first certificate in a PEM file
pub fn not_after(cert_path: &Path) -> Result<DateTime<Utc>> {
  let pem_bytes = std::fs::read(cert_path)?;
  let (_, pem) = parse_x509_pem(&pem_bytes).map_err(|e| CertupCertError::InvalidCertificate(e.to_string()))?;
  let cert = pem
    .parse_x509()
    .map_err(|e| CertupCertError::InvalidCertificate(e.to_string()))?;
  let timestamp = cert.validity().not_after.timestamp();
  DateTime::<Utc>::from_timestamp(timestamp, 0)
    .ok_or_else(|| CertupCertError::InvalidCertificate("notAfter timestamp out of range".to_string()))
}

/// Decide whether the certificate at `cert_path` must be renewed.
///
/// With `margin_days == 0` renewal triggers only once `notAfter` is strictly
/// in the past; a `notAfter` equal to the current instant still counts as
/// valid. A non-zero margin moves the threshold that many days before
/// expiry. A missing file means nothing was issued yet and reads as "needs
/// renewal" so the caller re-issues.
pub fn needs_renewal(cert_path: &Path, margin_days: u32) -> Result<bool> {
  if !cert_path.exists() {
    debug!("No certificate at {}, issuance required", cert_path.display());
    return Ok(true);
  }
  let not_after = not_after(cert_path)?;
  let expired = needs_renewal_at(not_after, Utc::now(), margin_days);
  if expired {
    info!("Certificate at {} has passed its renewal threshold", cert_path.display());
  } else {
    debug!("Certificate at {} is valid until {}", cert_path.display(), not_after);
  }
  Ok(expired)
}

/// Renew when `not_after` is strictly before `now + margin`
fn needs_renewal_at(not_after: DateTime<Utc>, now: DateTime<Utc>, margin_days: u32) -> bool {
  let threshold = now + Duration::days(i64::from(margin_days));
  not_after < threshold
}

/* ------------------------------------------------ */
