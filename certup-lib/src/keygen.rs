use crate::{constants::OPENSSL_BIN, error::*, layout::EnvLayout, log::*, runner::CommandRunner};
use derive_builder::Builder;
use std::path::PathBuf;

/* ------------------------------------------------ */
/// X.509 subject distinguished name for the CSR
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(setter(into))]
pub struct SubjectDn {
  pub country: String,
  pub state: String,
  pub locality: String,
  pub organization: String,
  pub org_unit: String,
  pub common_name: String,
  pub email: String,
}

impl SubjectDn {
  /// Render in the TLS toolkit's `-subj` format. Field order is fixed:
  /// C, ST, L, O, OU, CN, emailAddress.
  pub fn to_subj_arg(&self) -> String {
    format!(
      "/C={}/ST={}/L={}/O={}/OU={}/CN={}/emailAddress={}",
      self.country, self.state, self.locality, self.organization, self.org_unit, self.common_name, self.email
    )
  }
}

/* ------------------------------------------------ */
/// Generate a fresh RSA private key and CSR under the environment directory.
///
/// Overwrites any existing pair at the same paths: every issuance gets a new
/// key, an old key is never reused. The caller loses the previous key
/// material on re-issuance, which is the intended policy.
pub async fn generate_keypair(
  runner: &dyn CommandRunner,
  subject: &SubjectDn,
  key_size: u32,
  layout: &EnvLayout,
) -> Result<(PathBuf, PathBuf)> {
  tokio::fs::create_dir_all(layout.dir()).await?;

  let key_path = layout.private_key();
  let csr_path = layout.csr();
  let key_arg = key_path.display().to_string();
  let csr_arg = csr_path.display().to_string();
  let newkey_arg = format!("rsa:{key_size}");
  let subj_arg = subject.to_subj_arg();

  info!(
    "Generating {key_size}-bit RSA key and CSR for {}",
    subject.common_name
  );
  let out = runner
    .run(
      OPENSSL_BIN,
      &[
        "req", "-new", "-newkey", &newkey_arg, "-nodes", "-keyout", &key_arg, "-out", &csr_arg, "-subj", &subj_arg,
      ],
    )
    .await?;
  if !out.success {
    return Err(CertupError::Keygen(out.stderr.trim().to_string()));
  }

  #[cfg(unix)]
  if key_path.exists() {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(&key_path, std::fs::Permissions::from_mode(0o600)).await?;
  }

  info!("Key and CSR written under {}", layout.dir().display());
  Ok((key_path, csr_path))
}

/* ------------------------------------------------ */
