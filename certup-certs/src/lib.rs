mod error;
mod expiry;

#[allow(unused_imports)]
mod log {
  pub(super) use tracing::{debug, error, info, warn};
}

pub use error::{CertupCertError, Result};
pub use expiry::{needs_renewal, not_after};
