use crate::{
  constants::{CERTBOT_BIN, ISSUED_CERT_FILE, ISSUED_CHAIN_FILE, ISSUED_FULL_CHAIN_FILE},
  error::*,
  layout::EnvLayout,
  log::*,
  runner::CommandRunner,
};
use std::path::{Path, PathBuf};
use tokio::time::{timeout, Duration};
use url::Url;

/* ------------------------------------------------ */
/// Issued certificate bundle, env-tagged paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertBundle {
  pub leaf: PathBuf,
  pub intermediate: PathBuf,
  pub full_chain: PathBuf,
}

/* ------------------------------------------------ */
/// Request a certificate for the CSR through the manual dns-01 flow.
///
/// The ACME client prints the `_acme-challenge` TXT record name and value on
/// its own stdio (inherited here) and blocks until the operator has published
/// the record and confirmed. Without a `challenge_timeout` this wait is
/// indefinite; with one, an unanswered challenge fails the run.
pub async fn issue(
  runner: &dyn CommandRunner,
  server: &Url,
  csr_path: &Path,
  layout: &EnvLayout,
  challenge_timeout: Option<Duration>,
) -> Result<CertBundle> {
  info!("Requesting certificate via manual dns-01 challenge");
  info!("A TXT record shown by the ACME client must be published before validation can proceed");

  let csr_arg = csr_argument(csr_path, layout)?;
  let args = [
    "certonly",
    "--manual",
    "--preferred-challenges",
    "dns",
    "--server",
    server.as_str(),
    "--csr",
    csr_arg.as_str(),
  ];
  let request = runner.run_interactive(CERTBOT_BIN, &args, layout.dir());
  let success = match challenge_timeout {
    Some(limit) => timeout(limit, request)
      .await
      .map_err(|_| CertupError::ChallengeTimeout(limit.as_secs()))??,
    None => request.await?,
  };
  if !success {
    return Err(CertupError::Issuance(
      "certificate request did not complete".to_string(),
    ));
  }

  finalize_bundle(layout).await
}

/// CSR argument handed to the ACME client. The client runs with the
/// environment directory as its working directory and resolves relative
/// paths against that, not against ours, so a CSR inside the environment
/// directory is passed relative to it and anything else is absolutized.
fn csr_argument(csr_path: &Path, layout: &EnvLayout) -> Result<String> {
  match csr_path.strip_prefix(layout.dir()) {
    Ok(relative) => Ok(relative.display().to_string()),
    Err(_) => Ok(std::fs::canonicalize(csr_path)?.display().to_string()),
  }
}

/// Move the client's generic sequential outputs into the env-tagged layout so
/// repeated runs and coexisting environments cannot collide.
pub(crate) async fn finalize_bundle(layout: &EnvLayout) -> Result<CertBundle> {
  let bundle = CertBundle {
    leaf: layout.certificate(),
    intermediate: layout.intermediate_cert(),
    full_chain: layout.full_cert(),
  };
  let renames = [
    (ISSUED_CERT_FILE, &bundle.leaf),
    (ISSUED_CHAIN_FILE, &bundle.intermediate),
    (ISSUED_FULL_CHAIN_FILE, &bundle.full_chain),
  ];
  for (generic_name, tagged_path) in renames {
    let generic_path = layout.dir().join(generic_name);
    if !generic_path.exists() {
      return Err(CertupError::Issuance(format!(
        "expected issuance output {} is missing",
        generic_path.display()
      )));
    }
    tokio::fs::rename(&generic_path, tagged_path).await?;
  }
  info!("Certificate bundle written under {}", layout.dir().display());
  Ok(bundle)
}

/// Force re-issuance of certificates the ACME client manages.
///
/// Renewal relies on the client's own challenge configuration. The manual
/// dns-01 prompt used for initial issuance is not replayed here, so automated
/// challenge completion must be configured out-of-band for unattended
/// renewal to succeed.
pub async fn renew(runner: &dyn CommandRunner) -> Result<()> {
  info!("Renewing certificates with forced re-issuance");
  let out = runner.run(CERTBOT_BIN, &["renew", "--force-renewal"]).await?;
  if !out.success {
    return Err(CertupError::Issuance(format!(
      "renewal failed: {}",
      out.stderr.trim()
    )));
  }
  info!("Renewal completed");
  Ok(())
}

/* ------------------------------------------------ */
