use crate::{
  constants::{CERTBOT_BIN, NO_ACCOUNT_MARKER},
  error::*,
  log::*,
  provisioner::EabCredential,
  runner::CommandRunner,
};
use url::Url;

/* ------------------------------------------------ */
/// Remote account existence for (server, local ACME client identity)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
  NoAccount,
  HasAccount,
}

impl AccountState {
  /// Classify the account-status query output for the given server.
  ///
  /// The ACME client offers no structured status query, so this matches the
  /// human-readable "not found" marker it prints. The contract is brittle
  /// against upstream wording changes, which is why the match lives in this
  /// one constructor and nowhere else.
  pub fn from_status_output(output: &str, server: &Url) -> Self {
    if output.contains(NO_ACCOUNT_MARKER) && output.contains(server.as_str()) {
      Self::NoAccount
    } else {
      Self::HasAccount
    }
  }
}

/* ------------------------------------------------ */
/// Ensure exactly one account is registered against the server with the
/// given EAB credential.
///
/// The EAB key is single-use for registration, so a stale account must be
/// unregistered before the fresh key can bind. Unregistering is destructive:
/// it invalidates the old account's authorizations for future renewals, and
/// the automated path performs it without further confirmation.
pub async fn ensure_registered(
  runner: &dyn CommandRunner,
  server: &Url,
  email: &str,
  credential: &EabCredential,
) -> Result<()> {
  match query_state(runner, server).await? {
    AccountState::NoAccount => {
      info!("No existing ACME account for {server}, registering");
    }
    AccountState::HasAccount => {
      warn!("Existing ACME account found for {server}, unregistering it before re-registration");
      unregister(runner, server).await?;
    }
  }
  register(runner, server, email, credential).await
}

async fn query_state(runner: &dyn CommandRunner, server: &Url) -> Result<AccountState> {
  let out = runner
    .run(CERTBOT_BIN, &["show_account", "--server", server.as_str()])
    .await?;
  // the client reports the no-account case on stderr with a non-zero status,
  // so classification happens on the merged streams, not the status code
  Ok(AccountState::from_status_output(&out.combined(), server))
}

async fn unregister(runner: &dyn CommandRunner, server: &Url) -> Result<()> {
  let out = runner
    .run(
      CERTBOT_BIN,
      &["unregister", "--server", server.as_str(), "--non-interactive"],
    )
    .await?;
  if !out.success {
    return Err(CertupError::Registration(format!(
      "unregister failed: {}",
      out.stderr.trim()
    )));
  }
  Ok(())
}

async fn register(runner: &dyn CommandRunner, server: &Url, email: &str, credential: &EabCredential) -> Result<()> {
  let out = runner
    .run(
      CERTBOT_BIN,
      &[
        "register",
        "--email",
        email,
        "--no-eff-email",
        "--agree-tos",
        "--non-interactive",
        "--server",
        server.as_str(),
        "--eab-kid",
        &credential.key_id,
        "--eab-hmac-key",
        &credential.b64_mac_key,
      ],
    )
    .await?;
  if !out.success {
    return Err(CertupError::Registration(out.stderr.trim().to_string()));
  }
  info!("ACME account registered for {server}");
  Ok(())
}

/* ------------------------------------------------ */
