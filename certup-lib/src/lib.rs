mod constants;
mod error;
mod installer;
mod issuer;
mod keygen;
mod layout;
mod provisioner;
mod registrar;
mod runner;
mod workflow;

#[allow(unused_imports)]
mod log {
  pub(super) use tracing::{debug, error, info, warn};
}

/// Re-exports of types appearing in this crate's public API
pub mod reexports {
  pub use url::Url;
}

pub use constants::{CERTBOT_BIN, GCLOUD_BIN, OPENSSL_BIN};
pub use error::{CertupError, Result};
pub use installer::{ensure_prerequisites, PlatformFamily};
pub use issuer::{issue, renew, CertBundle};
pub use keygen::{generate_keypair, SubjectDn, SubjectDnBuilder, SubjectDnBuilderError};
pub use layout::EnvLayout;
pub use provisioner::{enable_service, grant_eab_permission, request_eab_key, EabCredential};
pub use registrar::{ensure_registered, AccountState};
pub use runner::{CommandOutput, CommandRunner, ExecRunner};
pub use workflow::{run_issuance, WorkflowContext};
