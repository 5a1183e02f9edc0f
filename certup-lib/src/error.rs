use thiserror::Error;

pub type Result<T> = std::result::Result<T, CertupError>;

/// Describes things that can go wrong in the certificate workflow.
/// Every variant is fatal for the current run; there is no retry or
/// partial-state rollback at this layer.
#[derive(Debug, Error)]
pub enum CertupError {
  /// Host OS family has no installer strategy
  #[error("Unsupported platform: {0}")]
  UnsupportedPlatform(String),

  #[error("Failed to install {tool}: {detail}")]
  ToolInstall { tool: String, detail: String },

  #[error("IAM binding for EAB key creation denied: {0}")]
  PermissionDenied(String),

  #[error("EAB key request failed: {0}")]
  EabRequest(String),

  #[error("Malformed EAB credential response: {0}")]
  CredentialParse(String),

  #[error("Key/CSR generation failed: {0}")]
  Keygen(String),

  #[error("ACME account registration failed: {0}")]
  Registration(String),

  #[error("Certificate issuance failed: {0}")]
  Issuance(String),

  #[error("DNS-01 challenge was not completed within {0} secs")]
  ChallengeTimeout(u64),

  #[error("Invalid url: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}
