use thiserror::Error;

pub type Result<T> = std::result::Result<T, CertupCertError>;

#[derive(Error, Debug)]
/// Error type for certificate inspection
pub enum CertupCertError {
  /// IO error
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  /// Unparsable or out-of-range certificate data
  #[error("Invalid certificate: {0}")]
  InvalidCertificate(String),
}
